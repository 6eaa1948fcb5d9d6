//! Compile-time descriptions of the supported chips.
//!
//! A [`Descriptor`] holds everything the session needs to bring a chip up and
//! to turn its data registers into physical values. Custom descriptors can be
//! declared the same way for other parts sharing the protocol.

pub mod lis2mdl;
pub mod lps22hb;
pub mod lsm6dso32;

pub use lis2mdl::LIS2MDL;
pub use lps22hb::{LPS22HB_I2C, LPS22HB_SPI};
pub use lsm6dso32::LSM6DSO32;

use crate::decode::{Layout, Scale};
use crate::protocol::AddressEncoding;

/// Physical quantity a chip can report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measurement {
    /// hPa
    Pressure,
    /// °C
    Temperature,
    /// µT, X/Y/Z
    MagneticField,
    /// g, X/Y/Z
    Acceleration,
    /// degrees/s, X/Y/Z
    AngularRate,
}

/// Identity register and the value it must hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub register: u8,
    pub expected: u8,
}

/// One configuration step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setup {
    /// Overwrite the whole register
    Write { register: u8, value: u8 },
    /// Read the register and replace only the bits in `mask`
    Modify { register: u8, value: u8, mask: u8 },
}

impl Setup {
    pub const fn register(&self) -> u8 {
        match *self {
            Setup::Write { register, .. } | Setup::Modify { register, .. } => register,
        }
    }
}

/// Where a quantity lives and how to scale it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quantity {
    pub measurement: Measurement,
    /// Lowest data register of the sample
    pub register: u8,
    pub layout: Layout,
    pub scale: Scale,
    /// Added after scaling
    pub offset: f32,
    /// Data-ready bit(s) in the status register
    pub ready_mask: u8,
}

#[derive(Debug)]
pub struct Descriptor {
    pub name: &'static str,
    /// SPI address encoding; ignored over I2C
    pub encoding: AddressEncoding,
    pub identity: Identity,
    /// 7-bit I2C address with the SA0/SDO pin low
    pub i2c_address: u8,
    pub status_register: u8,
    /// Applied before the identity check, for bits that must be set before
    /// the chip answers correctly on the current bus
    pub preamble: &'static [Setup],
    /// Applied in order once the identity matched
    pub setup: &'static [Setup],
    /// Multi-byte samples can be fetched in one burst
    pub auto_increment: bool,
    pub quantities: &'static [Quantity],
}

impl Descriptor {
    pub fn quantity(&self, measurement: Measurement) -> Option<Quantity> {
        self.quantities
            .iter()
            .find(|q| q.measurement == measurement)
            .copied()
    }

    pub fn supports(&self, measurement: Measurement) -> bool {
        self.quantity(measurement).is_some()
    }
}
