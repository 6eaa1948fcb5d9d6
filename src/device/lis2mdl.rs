//! LIS2MDL magnetometer.
//!
//! On the flight board the chip sits behind an SPI wiring that expects the
//! register index shifted up one bit with the read flag in bit 0, so it uses
//! [`AddressEncoding::ShiftedReadFlag`]. It powers up in 3-wire SPI mode; the
//! 4-wire bit has to be set before the identity register reads back.

use super::{Descriptor, Identity, Measurement, Quantity, Setup};
use crate::decode::{Layout, Scale};
use crate::protocol::AddressEncoding;
use crate::reg::Lis2mdl;

pub const WHO_AM_I: u8 = 0x40;

/// CFG_REG_C bits
pub const BDU: u8 = 1 << 4;
pub const FOUR_WIRE_SPI: u8 = 1 << 2;

/// STATUS_REG bits
pub const ZYXDA: u8 = 1 << 3;

/// 1.5 mgauss/LSB
pub const MICROTESLA_PER_LSB: f32 = 0.15;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Odr {
    Hz10 = 0b00,
    Hz20 = 0b01,
    Hz50 = 0b10,
    Hz100 = 0b11,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Continuous = 0b00,
    Single = 0b01,
    Idle = 0b11,
}

/// Build CFG_REG_A
pub const fn cfg_reg_a(odr: Odr, mode: Mode, temp_compensation: bool) -> u8 {
    (temp_compensation as u8) << 7 | (odr as u8) << 2 | mode as u8
}

/// Continuous 10 Hz with temperature compensation
pub const CFG_REG_A: u8 = cfg_reg_a(Odr::Hz10, Mode::Continuous, true);

pub static LIS2MDL: Descriptor = Descriptor {
    name: "LIS2MDL",
    encoding: AddressEncoding::ShiftedReadFlag,
    identity: Identity {
        register: Lis2mdl::WhoAmI as u8,
        expected: WHO_AM_I,
    },
    i2c_address: 0x1E,
    status_register: Lis2mdl::Status as u8,
    preamble: &[Setup::Modify {
        register: Lis2mdl::CfgRegC as u8,
        value: FOUR_WIRE_SPI,
        mask: FOUR_WIRE_SPI,
    }],
    setup: &[
        Setup::Write {
            register: Lis2mdl::CfgRegA as u8,
            value: CFG_REG_A,
        },
        Setup::Modify {
            register: Lis2mdl::CfgRegC as u8,
            value: BDU,
            mask: BDU,
        },
    ],
    auto_increment: true,
    quantities: &[Quantity {
        measurement: Measurement::MagneticField,
        register: Lis2mdl::OutXL as u8,
        layout: Layout::Axes,
        scale: Scale::Sensitivity(MICROTESLA_PER_LSB),
        offset: 0.0,
        ready_mask: ZYXDA,
    }],
};
