#![allow(missing_docs)]
use bilge::prelude::*;

/// Register addresses
#[derive(Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Configuration register address.
    Configuration,

    /// Alert upper boundary register address.
    UpperLimit,

    /// Alert lower boundary register address.
    LowerLimit,

    /// Critical temperature register address.
    CriticalLimit,

    /// Ambient temperature register address.
    AmbientTemperature,

    /// Manufacturer ID register address.
    ManufacturerId,

    /// Device ID and revision register address.
    DeviceId,

    /// Resolution register address.
    Resolution,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> Self {
        match reg {
            Register::Configuration => 0x01,
            Register::UpperLimit => 0x02,
            Register::LowerLimit => 0x03,
            Register::CriticalLimit => 0x04,
            Register::AmbientTemperature => 0x05,
            Register::ManufacturerId => 0x06,
            Register::DeviceId => 0x07,
            Register::Resolution => 0x08,
        }
    }
}

/// Shutdown bit of the configuration register.
pub const CONFIG_SHUTDOWN: u16 = 0x0100;

/// Value the manufacturer ID register always holds.
pub const MANUFACTURER_ID: u16 = 0x0054;

/// Value the high byte of the device ID register always holds.
pub const DEVICE_ID: u8 = 0x04;

/// Configuration register.
#[bitsize(16)]
#[derive(DebugBits, FromBits, PartialEq)]
pub struct Configuration {
    /// Alert output mode
    pub alert_mode: AlertMode,

    /// Alert output polarity
    pub alert_polarity: Polarity,

    /// Alert output select
    pub alert_select: AlertSelect,

    /// Alert output control (enable)
    pub alert_control: bool,

    /// Alert output status
    pub alert_status: bool,

    /// Interrupt clear
    pub interrupt_clear: bool,

    /// Upper/lower window lock
    pub window_lock: bool,

    /// Critical limit lock
    pub critical_lock: bool,

    /// Shutdown mode
    pub shutdown: bool,

    /// Limit hysteresis
    pub hysteresis: Hysteresis,

    reserved: u5,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from(0x0000)
    }
}

impl Configuration {
    /// Configure alert output mode.
    #[must_use]
    pub fn with_alert_mode(mut self, mode: AlertMode) -> Self {
        self.set_alert_mode(mode);
        self
    }

    /// Configure alert output polarity.
    #[must_use]
    pub fn with_alert_polarity(mut self, polarity: Polarity) -> Self {
        self.set_alert_polarity(polarity);
        self
    }

    /// Configure which limits drive the alert output.
    #[must_use]
    pub fn with_alert_select(mut self, select: AlertSelect) -> Self {
        self.set_alert_select(select);
        self
    }

    /// Enable or disable the alert output.
    #[must_use]
    pub fn with_alert_control(mut self, enabled: bool) -> Self {
        self.set_alert_control(enabled);
        self
    }

    /// Configure interrupt clear bit.
    #[must_use]
    pub fn with_interrupt_clear(mut self, clear: bool) -> Self {
        self.set_interrupt_clear(clear);
        self
    }

    /// Configure window lock bit. Once set, only a power cycle clears it.
    #[must_use]
    pub fn with_window_lock(mut self, lock: bool) -> Self {
        self.set_window_lock(lock);
        self
    }

    /// Configure critical lock bit. Once set, only a power cycle clears it.
    #[must_use]
    pub fn with_critical_lock(mut self, lock: bool) -> Self {
        self.set_critical_lock(lock);
        self
    }

    /// Configure shutdown bit.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: bool) -> Self {
        self.set_shutdown(shutdown);
        self
    }

    /// Configure limit hysteresis.
    #[must_use]
    pub fn with_hysteresis(mut self, hyst: Hysteresis) -> Self {
        self.set_hysteresis(hyst);
        self
    }
}

/// Alert output mode.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum AlertMode {
    /// Comparator output (power-up default).
    Comparator,

    /// Interrupt output.
    Interrupt,
}

/// Alert output polarity.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum Polarity {
    /// Active low (default).
    ActiveLow,

    /// Active high.
    ActiveHigh,
}

/// Alert output select.
#[bitsize(1)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum AlertSelect {
    /// Alert on upper, lower and critical limits (default).
    AllLimits,

    /// Alert on the critical limit only.
    CriticalOnly,
}

/// Limit hysteresis.
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum Hysteresis {
    /// 0℃ Hysteresis (default)
    ZeroCelsius,

    /// 1.5℃ Hysteresis
    OneAndHalfCelsius,

    /// 3℃ Hysteresis
    ThreeCelsius,

    /// 6℃ Hysteresis
    SixCelsius,
}

/// Measurement resolution.
///
/// Higher resolutions take longer per conversion:
///
/// | bits | step      | typical conversion |
/// |------|-----------|--------------------|
/// | `00` | 0.5℃     | 30 ms              |
/// | `01` | 0.25℃    | 65 ms              |
/// | `10` | 0.125℃   | 130 ms             |
/// | `11` | 0.0625℃  | 250 ms             |
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, PartialOrd)]
pub enum Resolution {
    /// 0.5℃ per step.
    Half,

    /// 0.25℃ per step.
    Quarter,

    /// 0.125℃ per step.
    Eighth,

    /// 0.0625℃ per step (power-up default).
    Sixteenth,
}

impl From<u8> for Resolution {
    /// Only the two lowest bits are kept, higher bits are discarded.
    fn from(bits: u8) -> Self {
        Self::from(u2::new(bits & 0b11))
    }
}

impl Resolution {
    /// Raw register value, `0..=3`.
    pub fn bits(self) -> u8 {
        u2::from(self).value()
    }

    /// Temperature step in degrees Celsius.
    pub fn step_celsius(self) -> f32 {
        match self {
            Self::Half => 0.5,
            Self::Quarter => 0.25,
            Self::Eighth => 0.125,
            Self::Sixteenth => 0.0625,
        }
    }

    /// Typical conversion time in milliseconds.
    pub fn conversion_time_ms(self) -> u8 {
        conversion_time_ms(self.bits())
    }
}

/// Typical conversion time in milliseconds for raw resolution bits. Anything
/// outside `0..=3` yields 0.
pub fn conversion_time_ms(bits: u8) -> u8 {
    match bits {
        0 => 30,
        1 => 65,
        2 => 130,
        3 => 250,
        _ => 0,
    }
}

/// Contents of the device ID and revision register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// High byte, always `0x04` on a genuine part.
    pub device_id: u8,

    /// Low byte, silicon revision. `0x00` is the first revision.
    pub revision: u8,
}

impl From<u16> for DeviceIdentity {
    fn from(raw: u16) -> Self {
        let [device_id, revision] = raw.to_be_bytes();
        Self { device_id, revision }
    }
}

/// Decode a temperature register into degrees Celsius.
///
/// Bits 15..=13 carry the critical/upper/lower comparison flags and are
/// dropped. The remaining 13 bits are two's complement in 1/16℃ units.
pub fn decode_temperature(raw: u16) -> f32 {
    let [hi, lo] = raw.to_be_bytes();

    #[allow(clippy::cast_possible_wrap)]
    let mut value = u16::from_be_bytes([hi & 0x1f, lo]) as i16;
    if value > 4095 {
        value -= 8192;
    }

    f32::from(value) / 16.0
}

/// Encode degrees Celsius into the limit register format.
///
/// Limits have 0.25℃ granularity in bits 12..=2; finer fractions are
/// truncated towards zero. Input is clamped to the representable range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_limit(celsius: f32) -> u16 {
    let quarters = (celsius.clamp(-256.0, 255.75) * 4.0) as i16;
    ((quarters << 2) as u16) & 0x1ffc
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn register_addresses() {
        assert_eq!(u8::from(Register::Configuration), 0x01);
        assert_eq!(u8::from(Register::AmbientTemperature), 0x05);
        assert_eq!(u8::from(Register::Resolution), 0x08);
    }

    #[test]
    fn default_configuration() {
        let cfg = Configuration::default();
        assert_eq!(cfg.value, 0x0000);
        assert!(!cfg.shutdown());
    }

    #[test]
    fn modify_shutdown() {
        let cfg = Configuration::default().with_shutdown(true);
        assert_eq!(cfg.value, CONFIG_SHUTDOWN);
    }

    #[test]
    fn modify_alert_bits() {
        let cfg = Configuration::default()
            .with_alert_mode(AlertMode::Interrupt)
            .with_alert_polarity(Polarity::ActiveHigh)
            .with_alert_select(AlertSelect::CriticalOnly)
            .with_alert_control(true);
        assert_eq!(cfg.value, 0x000f);
    }

    #[test]
    fn modify_locks() {
        let cfg = Configuration::default()
            .with_interrupt_clear(true)
            .with_window_lock(true)
            .with_critical_lock(true);
        assert_eq!(cfg.value, 0x00e0);
    }

    #[test]
    fn modify_hysteresis() {
        let cfg = Configuration::default().with_hysteresis(Hysteresis::SixCelsius);
        assert_eq!(cfg.value, 0x0600);
    }

    #[test]
    fn reserved_bits_survive() {
        let cfg = Configuration::from(0xf800).with_shutdown(true);
        assert_eq!(cfg.value, 0xf900);
    }

    #[test]
    fn resolution_masks_high_bits() {
        assert_eq!(Resolution::from(0b101_u8), Resolution::Quarter);
        assert_eq!(Resolution::from(0xff_u8), Resolution::Sixteenth);
        assert_eq!(Resolution::from(0xff_u8).bits(), 0x03);
    }

    #[test]
    fn resolution_lookup() {
        assert_eq!(Resolution::Half.conversion_time_ms(), 30);
        assert_eq!(Resolution::Quarter.conversion_time_ms(), 65);
        assert_eq!(Resolution::Eighth.conversion_time_ms(), 130);
        assert_eq!(Resolution::Sixteenth.conversion_time_ms(), 250);
        assert_approx_eq!(Resolution::Eighth.step_celsius(), 0.125, 1e-6);
        assert_eq!(conversion_time_ms(4), 0);
    }

    #[test]
    fn device_identity_split() {
        let id = DeviceIdentity::from(0x0400);
        assert_eq!(id.device_id, 0x04);
        assert_eq!(id.revision, 0x00);
    }

    #[test]
    fn decode_ambient() {
        let cases = [
            (0x0190, 25.0),
            (0x1ff0, -1.0),
            (0xc190, 25.0),
            (0x0000, 0.0),
            (0x0001, 0.0625),
            (0x0fff, 255.9375),
            (0x1000, -256.0),
            (0x1e70, -25.0),
        ];

        for (raw, t) in cases {
            assert_approx_eq!(decode_temperature(raw), t, 1e-4);
        }
    }

    #[test]
    fn encode_limits() {
        assert_eq!(encode_limit(25.0), 0x0190);
        assert_eq!(encode_limit(-1.0), 0x1ff0);
        assert_eq!(encode_limit(0.3), 0x0004);
        assert_eq!(encode_limit(1000.0), 0x0ffc);
        assert_approx_eq!(decode_temperature(encode_limit(-20.5)), -20.5, 1e-4);
    }
}
