//! Register access protocol shared by all transports.

/// Direction of a register access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Read,
    Write,
}

/// How a logical register index is turned into the address byte clocked out
/// over SPI. I2C carries the direction in the transaction and sends the
/// register unmodified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressEncoding {
    /// Bit 7 set for reads, cleared for writes. Used by most ST parts.
    MsbReadFlag,
    /// Address shifted left by one, bit 0 set for reads (LIS2MDL wiring).
    ShiftedReadFlag,
}

impl AddressEncoding {
    /// Encode `reg` for the given direction.
    pub const fn encode(self, reg: u8, direction: Direction) -> u8 {
        match (self, direction) {
            (Self::MsbReadFlag, Direction::Read) => reg | 0x80,
            (Self::MsbReadFlag, Direction::Write) => reg & 0x7F,
            (Self::ShiftedReadFlag, Direction::Read) => (reg << 1) | 0x01,
            (Self::ShiftedReadFlag, Direction::Write) => (reg << 1) & 0xFE,
        }
    }
}

/// Trait to allow for generic register access across I2c or Spi usage
#[allow(async_fn_in_trait)]
pub trait RegisterBus {
    type Error;
    type Inner;

    /// Release the underlying bus resources.
    fn destroy(self) -> Self::Inner;

    /// Read `buf.len()` bytes starting at `reg`.
    async fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `data` starting at `reg`.
    async fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error>;
}
