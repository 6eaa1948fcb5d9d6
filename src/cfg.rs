/// Timeout applied to every register operation unless overridden
pub const DEFAULT_TIMEOUT_MS: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Upper bound for a single register operation, `None` waits forever
    pub timeout_ms: Option<u32>,
    /// Only used over I2C
    pub i2c_address: I2cAddress,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            i2c_address: I2cAddress::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum I2cAddress {
    /// Base address of the chip, `SA0`/`SDO` pin low
    #[default]
    SaLow,
    /// Base address with bit 0 set, `SA0`/`SDO` pin high
    SaHigh,
    /// In case the module is strapped to something else
    Any(u8),
}

impl From<u8> for I2cAddress {
    fn from(address: u8) -> Self {
        I2cAddress::Any(address)
    }
}

impl I2cAddress {
    /// Resolve against the chip's base address
    pub const fn resolve(&self, base: u8) -> u8 {
        match self {
            I2cAddress::SaLow => base,
            I2cAddress::SaHigh => base | 0x01,
            I2cAddress::Any(a) => *a,
        }
    }
}
