//! LPS22HB barometer. Pressure is a 24-bit word at 4096 LSB/hPa, temperature
//! a 16-bit word at 100 LSB/°C.

use super::{Descriptor, Identity, Measurement, Quantity, Setup};
use crate::decode::{Layout, Scale};
use crate::protocol::AddressEncoding;
use crate::reg::Lps22hb;

pub const WHO_AM_I: u8 = 0xB1;

/// CTRL_REG2 bits
pub const IF_ADD_INC: u8 = 1 << 4;
pub const I2C_DIS: u8 = 1 << 3;
pub const SWRESET: u8 = 1 << 2;

/// STATUS bits
pub const P_DA: u8 = 1 << 0;
pub const T_DA: u8 = 1 << 1;

/// Output data rate, CTRL_REG1 bits 6:4
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Odr {
    PowerDown = 0b000,
    Hz1 = 0b001,
    Hz10 = 0b010,
    Hz25 = 0b011,
    Hz50 = 0b100,
    Hz75 = 0b101,
}

/// Pressure low-pass filter, CTRL_REG1 bits 3:2
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LowPass {
    Disabled = 0b00,
    OdrDiv9 = 0b10,
    OdrDiv20 = 0b11,
}

/// Build CTRL_REG1 (SIM left at 4-wire SPI)
pub const fn ctrl_reg1(odr: Odr, lpf: LowPass, bdu: bool) -> u8 {
    (odr as u8) << 4 | (lpf as u8) << 2 | (bdu as u8) << 1
}

/// 50 Hz, LPF at ODR/20, block data update
pub const CTRL_REG1: u8 = ctrl_reg1(Odr::Hz50, LowPass::OdrDiv20, true);

const QUANTITIES: [Quantity; 2] = [
    Quantity {
        measurement: Measurement::Pressure,
        register: Lps22hb::PressOutXL as u8,
        layout: Layout::I24,
        scale: Scale::Divisor(4096.0),
        offset: 0.0,
        ready_mask: P_DA,
    },
    Quantity {
        measurement: Measurement::Temperature,
        register: Lps22hb::TempOutL as u8,
        layout: Layout::I16,
        scale: Scale::Divisor(100.0),
        offset: 0.0,
        ready_mask: T_DA,
    },
];

/// LPS22HB on 4-wire SPI. Address auto-increment stays off, so samples are
/// fetched one register at a time.
pub static LPS22HB_SPI: Descriptor = Descriptor {
    name: "LPS22HB",
    encoding: AddressEncoding::MsbReadFlag,
    identity: Identity {
        register: Lps22hb::WhoAmI as u8,
        expected: WHO_AM_I,
    },
    i2c_address: 0x5C,
    status_register: Lps22hb::Status as u8,
    preamble: &[],
    setup: &[
        Setup::Write {
            register: Lps22hb::CtrlReg1 as u8,
            value: CTRL_REG1,
        },
        Setup::Write {
            register: Lps22hb::CtrlReg2 as u8,
            value: I2C_DIS | SWRESET,
        },
    ],
    auto_increment: false,
    quantities: &QUANTITIES,
};

/// LPS22HB on I2C with register auto-increment enabled.
pub static LPS22HB_I2C: Descriptor = Descriptor {
    name: "LPS22HB",
    encoding: AddressEncoding::MsbReadFlag,
    identity: Identity {
        register: Lps22hb::WhoAmI as u8,
        expected: WHO_AM_I,
    },
    i2c_address: 0x5C,
    status_register: Lps22hb::Status as u8,
    preamble: &[],
    setup: &[
        Setup::Write {
            register: Lps22hb::CtrlReg1 as u8,
            value: CTRL_REG1,
        },
        Setup::Write {
            register: Lps22hb::CtrlReg2 as u8,
            value: IF_ADD_INC,
        },
    ],
    auto_increment: true,
    quantities: &QUANTITIES,
};
