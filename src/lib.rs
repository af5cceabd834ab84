//! This is a platform-agnostic Rust driver for the MCP9808 temperature sensor
//! based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! For further details of the device architecture and operation, please refer
//! to the official [`Datasheet`].
//!
//! [`Datasheet`]: https://ww1.microchip.com/downloads/en/DeviceDoc/25095A.pdf
//!
//! The driver keeps no copy of any register. Every getter issues a fresh bus
//! transaction, so calls may be made in any order. It does not serialize
//! access either: when several users share a bus, they must arbitrate above
//! this driver.

#![doc(html_root_url = "https://docs.rs/mcp9808/latest")]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// Must come first so the macros are visible to the other modules.
mod fmt;

// The async crate re-exports the blocking `sensor` module, so one error impl
// serves both drivers.
#[cfg(feature = "embedded-sensors-hal")]
use embedded_sensors_hal::sensor;
#[cfg(all(feature = "embedded-sensors-hal-async", not(feature = "embedded-sensors-hal")))]
use embedded_sensors_hal_async::sensor;

mod registers;
pub use registers::*;

#[cfg(feature = "async")]
pub mod asynchronous;

pub mod blocking;

/// Success code returned by the legacy `shutdown_wake` operation.
pub const SHUTDOWN_WAKE_OK: i32 = 0;

/// 7-bit I2C address of the sensor.
///
/// The upper four bits are fixed at `0b0011`; the lower three follow the
/// A2, A1 and A0 strap pins, giving `0x18..=0x1f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    const BASE: u8 = 0x18;

    /// Address for the given strap pin levels (`true` = tied to V+).
    pub fn from_pins(a2: bool, a1: bool, a0: bool) -> Self {
        Self(Self::BASE | (u8::from(a2) << 2) | (u8::from(a1) << 1) | u8::from(a0))
    }
}

impl Default for Address {
    /// All strap pins tied to GND, address `0x18`.
    fn default() -> Self {
        Self(Self::BASE)
    }
}

impl From<u8> for Address {
    fn from(addr: u8) -> Self {
        Self(addr & 0x7f)
    }
}

impl From<Address> for u8 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// Convert degrees Celsius to degrees Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

/// First identity check of `initialize`.
pub(crate) fn check_manufacturer<E>(manufacturer: u16) -> Result<(), Error<E>> {
    if manufacturer != MANUFACTURER_ID {
        warn!("unexpected manufacturer id {:#x}", manufacturer);
        return Err(Error::UnexpectedManufacturer(manufacturer));
    }
    Ok(())
}

/// Second identity check of `initialize`.
pub(crate) fn check_device<E>(identity: DeviceIdentity) -> Result<(), Error<E>> {
    if identity.device_id != DEVICE_ID {
        warn!("unexpected device id {:#x}", identity.device_id);
        return Err(Error::UnexpectedDevice(identity.device_id));
    }

    debug!("MCP9808 revision {}", identity.revision);
    Ok(())
}

/// Mcp9808 Errors
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C Bus Error
    Bus(E),
    /// Manufacturer ID register did not hold `0x0054`.
    UnexpectedManufacturer(u16),
    /// Device ID byte did not hold `0x04`.
    UnexpectedDevice(u8),
}

#[cfg(any(feature = "embedded-sensors-hal", feature = "embedded-sensors-hal-async"))]
impl<E: embedded_hal::i2c::Error> sensor::Error for Error<E> {
    fn kind(&self) -> sensor::ErrorKind {
        match *self {
            Self::Bus(_) => sensor::ErrorKind::Peripheral,
            Self::UnexpectedManufacturer(_) | Self::UnexpectedDevice(_) => sensor::ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn address_from_pins() {
        assert_eq!(u8::from(Address::default()), 0x18);
        assert_eq!(u8::from(Address::from_pins(false, false, true)), 0x19);
        assert_eq!(u8::from(Address::from_pins(true, false, false)), 0x1c);
        assert_eq!(u8::from(Address::from_pins(true, true, true)), 0x1f);
        assert_eq!(u8::from(Address::from(0x98)), 0x18);
    }

    #[test]
    fn fahrenheit_conversion() {
        assert_approx_eq!(celsius_to_fahrenheit(0.0), 32.0, 1e-4);
        assert_approx_eq!(celsius_to_fahrenheit(100.0), 212.0, 1e-4);
        assert_approx_eq!(celsius_to_fahrenheit(-40.0), -40.0, 1e-4);
    }

    #[test]
    fn identity_checks() {
        assert_eq!(check_manufacturer::<()>(0x0054), Ok(()));
        assert_eq!(check_manufacturer::<()>(0x0053), Err(Error::UnexpectedManufacturer(0x0053)));
        assert_eq!(check_device::<()>(DeviceIdentity::from(0x0401)), Ok(()));
        assert_eq!(check_device::<()>(DeviceIdentity::from(0x0500)), Err(Error::UnexpectedDevice(0x05)));
    }

    #[cfg(any(feature = "embedded-sensors-hal", feature = "embedded-sensors-hal-async"))]
    #[test]
    fn sensor_error_kinds() {
        use embedded_hal::i2c::ErrorKind;
        use super::sensor::Error as _;

        assert!(matches!(
            Error::Bus(ErrorKind::Other).kind(),
            sensor::ErrorKind::Peripheral
        ));
        assert!(matches!(
            Error::<ErrorKind>::UnexpectedManufacturer(0x0053).kind(),
            sensor::ErrorKind::Other
        ));
        assert!(matches!(
            Error::<ErrorKind>::UnexpectedDevice(0x05).kind(),
            sensor::ErrorKind::Other
        ));
    }
}
