//! LSM6DSO32 accelerometer + gyroscope.

use super::{Descriptor, Identity, Measurement, Quantity, Setup};
use crate::decode::{Layout, Scale};
use crate::protocol::AddressEncoding;
use crate::reg::Lsm6dso32;

pub const WHO_AM_I: u8 = 0x6C;

/// CTRL3_C bits
pub const BDU: u8 = 1 << 6;
pub const IF_INC: u8 = 1 << 2;

/// STATUS_REG bits
pub const XLDA: u8 = 1 << 0;
pub const GDA: u8 = 1 << 1;
pub const TDA: u8 = 1 << 2;

/// Output data rate shared by accelerometer and gyroscope, bits 7:4
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Odr {
    PowerDown = 0,
    Hz12_5 = 1,
    Hz26 = 2,
    Hz52 = 3,
    Hz104 = 4,
    Hz208 = 5,
    Hz416 = 6,
    Hz833 = 7,
    Hz1660 = 8,
    Hz3330 = 9,
    Hz6660 = 10,
}

/// Range / sensitivity of accelerometer in Gs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccRange {
    Gs4 = 0b00,
    Gs32 = 0b01,
    Gs8 = 0b10,
    Gs16 = 0b11,
}

impl AccRange {
    /// g per LSB
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Gs4 => 0.000122,
            Self::Gs8 => 0.000244,
            Self::Gs16 => 0.000488,
            Self::Gs32 => 0.000976,
        }
    }
}

/// Range / sentivity of gyroscope in degrees/second
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GyrRange {
    Dps250 = 0b00,
    Dps500 = 0b01,
    Dps1000 = 0b10,
    Dps2000 = 0b11,
}

impl GyrRange {
    /// dps per LSB
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps250 => 0.00875,
            Self::Dps500 => 0.0175,
            Self::Dps1000 => 0.035,
            Self::Dps2000 => 0.07,
        }
    }
}

pub const fn ctrl1_xl(odr: Odr, range: AccRange) -> u8 {
    (odr as u8) << 4 | (range as u8) << 2
}

pub const fn ctrl2_g(odr: Odr, range: GyrRange) -> u8 {
    (odr as u8) << 4 | (range as u8) << 2
}

pub const ACC_RANGE: AccRange = AccRange::Gs8;
pub const GYR_RANGE: GyrRange = GyrRange::Dps2000;

pub static LSM6DSO32: Descriptor = Descriptor {
    name: "LSM6DSO32",
    encoding: AddressEncoding::MsbReadFlag,
    identity: Identity {
        register: Lsm6dso32::WhoAmI as u8,
        expected: WHO_AM_I,
    },
    i2c_address: 0x6A,
    status_register: Lsm6dso32::StatusReg as u8,
    preamble: &[],
    setup: &[
        Setup::Write {
            register: Lsm6dso32::Ctrl1Xl as u8,
            value: ctrl1_xl(Odr::Hz104, ACC_RANGE),
        },
        Setup::Write {
            register: Lsm6dso32::Ctrl2G as u8,
            value: ctrl2_g(Odr::Hz104, GYR_RANGE),
        },
        Setup::Write {
            register: Lsm6dso32::Ctrl3C as u8,
            value: BDU | IF_INC,
        },
    ],
    auto_increment: true,
    quantities: &[
        Quantity {
            measurement: Measurement::Acceleration,
            register: Lsm6dso32::OutXLA as u8,
            layout: Layout::Axes,
            scale: Scale::Sensitivity(ACC_RANGE.sensitivity()),
            offset: 0.0,
            ready_mask: XLDA,
        },
        Quantity {
            measurement: Measurement::AngularRate,
            register: Lsm6dso32::OutXLG as u8,
            layout: Layout::Axes,
            scale: Scale::Sensitivity(GYR_RANGE.sensitivity()),
            offset: 0.0,
            ready_mask: GDA,
        },
        // 256 LSB/°C, zero at 25 °C
        Quantity {
            measurement: Measurement::Temperature,
            register: Lsm6dso32::OutTempL as u8,
            layout: Layout::I16,
            scale: Scale::Divisor(256.0),
            offset: 25.0,
            ready_mask: TDA,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bytes() {
        assert_eq!(ctrl1_xl(Odr::Hz104, AccRange::Gs8), 0x48);
        assert_eq!(ctrl2_g(Odr::Hz104, GyrRange::Dps2000), 0x4C);
        assert_eq!(BDU | IF_INC, 0x44);
        assert_eq!(ctrl1_xl(Odr::Hz1660, AccRange::Gs4), 0x80);
    }

    #[test]
    fn setup_order() {
        let registers: [u8; 3] = core::array::from_fn(|i| LSM6DSO32.setup[i].register());
        assert_eq!(registers, [0x10, 0x11, 0x12]);
    }
}
