//! Mcp9808 Async API

#[cfg(feature = "embedded-sensors-hal-async")]
use embedded_sensors_hal_async::sensor;
#[cfg(feature = "embedded-sensors-hal-async")]
use embedded_sensors_hal_async::temperature::{DegreesCelsius, TemperatureSensor};

use super::{
    celsius_to_fahrenheit, check_device, check_manufacturer, conversion_time_ms, decode_temperature, encode_limit, Address,
    Configuration, DeviceIdentity, Error, Register, Resolution, CONFIG_SHUTDOWN, SHUTDOWN_WAKE_OK,
};

/// MCP9808 asynchronous device driver
pub struct Mcp9808<I2C: embedded_hal_async::i2c::I2c> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    /// The I2C address.
    pub(crate) addr: Address,
}

impl<I2C: embedded_hal_async::i2c::I2c> Mcp9808<I2C> {
    /// Create a new MCP9808 instance responding to the default address
    /// `0x18`. No bus traffic happens until the first operation.
    ///
    /// The bus must already be set up. Pass `&mut bus` to keep ownership.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            addr: Address::default(),
        }
    }

    /// Destroy the driver instance, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Select the device `address` and check that it really is an MCP9808.
    ///
    /// # Errors
    ///
    /// `Error::Bus` when the I2C transaction fails,
    /// `Error::UnexpectedManufacturer` or `Error::UnexpectedDevice` when the
    /// identity registers do not match.
    pub async fn initialize(&mut self, address: Address) -> Result<(), Error<I2C::Error>> {
        self.addr = address;

        check_manufacturer(self.manufacturer_id().await.map_err(Error::Bus)?)?;
        check_device(self.device_identity().await.map_err(Error::Bus)?)
    }

    /// Read ambient temperature in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn temperature(&mut self) -> Result<f32, I2C::Error> {
        let raw = self.read16(Register::AmbientTemperature).await?;
        Ok(decode_temperature(raw))
    }

    /// Read ambient temperature in degrees Fahrenheit
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn temperature_fahrenheit(&mut self) -> Result<f32, I2C::Error> {
        Ok(celsius_to_fahrenheit(self.temperature().await?))
    }

    /// Read ambient temperature in degrees Celsius
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    #[deprecated(note = "use `temperature` instead")]
    pub async fn read_temp_c(&mut self) -> Result<f32, I2C::Error> {
        self.temperature().await
    }

    /// Read resolution register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn resolution(&mut self) -> Result<Resolution, I2C::Error> {
        Ok(Resolution::from(self.resolution_bits().await?))
    }

    /// Read resolution register as its raw value, `0..=3`
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn resolution_bits(&mut self) -> Result<u8, I2C::Error> {
        Ok(self.read8(Register::Resolution).await? & 0b11)
    }

    /// Set resolution register. Raw `u8` values keep only their two lowest
    /// bits.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_resolution<R: Into<Resolution>>(&mut self, resolution: R) -> Result<(), I2C::Error> {
        self.write8(Register::Resolution, resolution.into().bits()).await
    }

    /// Typical conversion time in milliseconds at the current resolution
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn sampling_time_ms(&mut self) -> Result<u8, I2C::Error> {
        Ok(conversion_time_ms(self.resolution_bits().await?))
    }

    /// Read device ID and revision register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn device_identity(&mut self) -> Result<DeviceIdentity, I2C::Error> {
        Ok(DeviceIdentity::from(self.read16(Register::DeviceId).await?))
    }

    /// Read device ID, `0x04` for an MCP9808
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn device_id(&mut self) -> Result<u8, I2C::Error> {
        Ok(self.device_identity().await?.device_id)
    }

    /// Read silicon revision
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn revision(&mut self) -> Result<u8, I2C::Error> {
        Ok(self.device_identity().await?.revision)
    }

    /// Read manufacturer ID register, `0x0054` for Microchip
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn manufacturer_id(&mut self) -> Result<u16, I2C::Error> {
        self.read16(Register::ManufacturerId).await
    }

    /// Read configuration register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn configuration(&mut self) -> Result<Configuration, I2C::Error> {
        Ok(Configuration::from(self.read16(Register::Configuration).await?))
    }

    /// Set configuration register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_configuration(&mut self, config: Configuration) -> Result<(), I2C::Error> {
        self.write16(Register::Configuration, config.into()).await
    }

    /// Place device in Shutdown mode. Ambient temperature stops updating.
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn shutdown(&mut self) -> Result<(), I2C::Error> {
        let config = self.read16(Register::Configuration).await?;
        self.write16(Register::Configuration, config | CONFIG_SHUTDOWN).await
    }

    /// Wake device from Shutdown mode.
    ///
    /// This toggles the shutdown bit rather than clearing it: on a device
    /// that is already awake it enters Shutdown mode instead. Existing users
    /// rely on that, so pair it with [`Self::shutdown`].
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn wakeup(&mut self) -> Result<(), I2C::Error> {
        let config = self.read16(Register::Configuration).await?;
        self.write16(Register::Configuration, config ^ CONFIG_SHUTDOWN).await
    }

    /// Combined shutdown/wake-up: `0` behaves like [`Self::wakeup`], `1` like
    /// [`Self::shutdown`], anything else writes the configuration back
    /// unchanged. Always reports [`SHUTDOWN_WAKE_OK`].
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    #[deprecated(note = "use `shutdown` and `wakeup` instead")]
    pub async fn shutdown_wake(&mut self, selector: u8) -> Result<i32, I2C::Error> {
        let mut config = self.read16(Register::Configuration).await?;

        match selector {
            0 => config ^= CONFIG_SHUTDOWN,
            1 => config |= CONFIG_SHUTDOWN,
            _ => {}
        }

        self.write16(Register::Configuration, config).await?;
        Ok(SHUTDOWN_WAKE_OK)
    }

    /// Read alert upper limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn upper_limit(&mut self) -> Result<f32, I2C::Error> {
        Ok(decode_temperature(self.read16(Register::UpperLimit).await?))
    }

    /// Set alert upper limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_upper_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.write16(Register::UpperLimit, encode_limit(limit)).await
    }

    /// Read alert lower limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn lower_limit(&mut self) -> Result<f32, I2C::Error> {
        Ok(decode_temperature(self.read16(Register::LowerLimit).await?))
    }

    /// Set alert lower limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_lower_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.write16(Register::LowerLimit, encode_limit(limit)).await
    }

    /// Read critical limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn critical_limit(&mut self) -> Result<f32, I2C::Error> {
        Ok(decode_temperature(self.read16(Register::CriticalLimit).await?))
    }

    /// Set critical limit register
    ///
    /// # Errors
    ///
    /// `I2C::Error` when the I2C transaction fails
    pub async fn set_critical_limit(&mut self, limit: f32) -> Result<(), I2C::Error> {
        self.write16(Register::CriticalLimit, encode_limit(limit)).await
    }

    // Reads select the register in one transfer and fetch it in a second one,
    // with a stop condition in between.
    async fn read8(&mut self, reg: Register) -> Result<u8, I2C::Error> {
        let mut bytes = [0; 1];
        self.i2c.write(self.addr.into(), &[reg.into()]).await?;
        self.i2c.read(self.addr.into(), &mut bytes).await?;
        Ok(bytes[0])
    }

    async fn read16(&mut self, reg: Register) -> Result<u16, I2C::Error> {
        let mut bytes = [0; 2];
        self.i2c.write(self.addr.into(), &[reg.into()]).await?;
        self.i2c.read(self.addr.into(), &mut bytes).await?;
        Ok(u16::from_be_bytes(bytes))
    }

    async fn write8(&mut self, reg: Register, value: u8) -> Result<(), I2C::Error> {
        let reg: u8 = reg.into();
        trace!("write {:#x} <- {:#x}", reg, value);
        self.i2c.write(self.addr.into(), &[reg, value]).await
    }

    async fn write16(&mut self, reg: Register, value: u16) -> Result<(), I2C::Error> {
        let mut data = [0; 3];

        data[0] = reg.into();
        data[1..].copy_from_slice(&value.to_be_bytes());

        trace!("write {:#x} <- {:#x}", data[0], value);
        self.i2c.write(self.addr.into(), &data).await
    }
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<I2C: embedded_hal_async::i2c::I2c> sensor::ErrorType for Mcp9808<I2C> {
    type Error = Error<I2C::Error>;
}

#[cfg(feature = "embedded-sensors-hal-async")]
impl<I2C: embedded_hal_async::i2c::I2c> TemperatureSensor for Mcp9808<I2C> {
    async fn temperature(&mut self) -> Result<DegreesCelsius, Self::Error> {
        self.temperature().await.map_err(Error::Bus)
    }
}
