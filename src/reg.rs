//! Register maps of the supported chips. Only the registers the drivers touch
//! plus their immediate neighbours are listed.

/// Bit 7 of a logical register index belongs to the SPI address encoding.
pub const RESERVED_ADDRESS_BIT: u8 = 0x80;

#[allow(unused)]
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Lps22hb {
    InterruptCfg = 0x0B,
    ThsPL = 0x0C,
    ThsPH = 0x0D,
    WhoAmI = 0x0F,
    CtrlReg1 = 0x10,
    CtrlReg2 = 0x11,
    CtrlReg3 = 0x12,
    FifoCtrl = 0x14,
    RefPXL = 0x15,
    RefPL = 0x16,
    RefPH = 0x17,
    RpdsL = 0x18,
    RpdsH = 0x19,
    ResConf = 0x1A,
    IntSource = 0x25,
    FifoStatus = 0x26,
    Status = 0x27,
    PressOutXL = 0x28,
    PressOutL = 0x29,
    PressOutH = 0x2A,
    TempOutL = 0x2B,
    TempOutH = 0x2C,
    LpfpRes = 0x33,
}

#[allow(unused)]
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Lis2mdl {
    OffsetXRegL = 0x45,
    OffsetXRegH = 0x46,
    OffsetYRegL = 0x47,
    OffsetYRegH = 0x48,
    OffsetZRegL = 0x49,
    OffsetZRegH = 0x4A,
    WhoAmI = 0x4F,
    CfgRegA = 0x60,
    CfgRegB = 0x61,
    CfgRegC = 0x62,
    IntCtrlReg = 0x63,
    IntSourceReg = 0x64,
    IntThsL = 0x65,
    IntThsH = 0x66,
    Status = 0x67,
    OutXL = 0x68,
    OutXH = 0x69,
    OutYL = 0x6A,
    OutYH = 0x6B,
    OutZL = 0x6C,
    OutZH = 0x6D,
    TempOutL = 0x6E,
    TempOutH = 0x6F,
}

#[allow(unused)]
#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Lsm6dso32 {
    FuncCfgAccess = 0x01,
    PinCtrl = 0x02,
    FifoCtrl1 = 0x07,
    FifoCtrl2 = 0x08,
    FifoCtrl3 = 0x09,
    FifoCtrl4 = 0x0A,
    Int1Ctrl = 0x0D,
    Int2Ctrl = 0x0E,
    WhoAmI = 0x0F,
    Ctrl1Xl = 0x10,
    Ctrl2G = 0x11,
    Ctrl3C = 0x12,
    Ctrl4C = 0x13,
    Ctrl5C = 0x14,
    Ctrl6C = 0x15,
    Ctrl7G = 0x16,
    Ctrl8Xl = 0x17,
    Ctrl9Xl = 0x18,
    Ctrl10C = 0x19,
    StatusReg = 0x1E,
    OutTempL = 0x20,
    OutTempH = 0x21,
    OutXLG = 0x22,
    OutXHG = 0x23,
    OutYLG = 0x24,
    OutYHG = 0x25,
    OutZLG = 0x26,
    OutZHG = 0x27,
    OutXLA = 0x28,
    OutXHA = 0x29,
    OutYLA = 0x2A,
    OutYHA = 0x2B,
    OutZLA = 0x2C,
    OutZHA = 0x2D,
}

/// Anything that names a logical register.
pub trait Register: Copy {
    fn reg(self) -> u8;
}

impl Register for u8 {
    fn reg(self) -> u8 {
        self
    }
}

macro_rules! impl_register {
    ($($chip:ident),*) => {
        $(
            impl Register for $chip {
                fn reg(self) -> u8 {
                    self as u8
                }
            }
        )*
    };
}

impl_register!(Lps22hb, Lis2mdl, Lsm6dso32);
