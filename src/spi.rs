use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use crate::protocol::{AddressEncoding, Direction, RegisterBus};

/// Error raised by [`SpiInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<S, P> {
    /// The SPI peripheral failed to transmit or receive
    Spi(S),
    /// The chip-select pin could not be driven
    ChipSelect(P),
}

/// Register access over a raw SPI bus with a dedicated chip-select pin.
///
/// The chip-select line is active low. It is asserted by [`SpiInterface::select`]
/// and released when the returned guard goes out of scope, whichever way the
/// transfer ends.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
    encoding: AddressEncoding,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    pub fn new(spi: SPI, cs: CS, encoding: AddressEncoding) -> Self {
        Self { spi, cs, encoding }
    }

    pub fn encoding(&self) -> AddressEncoding {
        self.encoding
    }
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Assert chip-select for the duration of the returned guard.
    pub fn select(&mut self) -> Result<Selected<'_, SPI, CS>, SpiError<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(SpiError::ChipSelect)?;
        Ok(Selected {
            iface: self,
            released: false,
        })
    }
}

/// An asserted chip-select. Dropping it deasserts the line.
pub struct Selected<'a, SPI, CS>
where
    CS: OutputPin,
{
    iface: &'a mut SpiInterface<SPI, CS>,
    released: bool,
}

impl<SPI, CS> Selected<'_, SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub async fn transmit(&mut self, bytes: &[u8]) -> Result<(), SpiError<SPI::Error, CS::Error>> {
        self.iface.spi.write(bytes).await.map_err(SpiError::Spi)
    }

    pub async fn receive(&mut self, buf: &mut [u8]) -> Result<(), SpiError<SPI::Error, CS::Error>> {
        self.iface.spi.read(buf).await.map_err(SpiError::Spi)
    }

    /// Wait for the bus to go idle, then release chip-select. A pin that
    /// refuses to go high is reported, not retried on drop.
    pub async fn finish(mut self) -> Result<(), SpiError<SPI::Error, CS::Error>> {
        self.iface.spi.flush().await.map_err(SpiError::Spi)?;
        self.released = true;
        self.iface.cs.set_high().map_err(SpiError::ChipSelect)
    }
}

impl<SPI, CS> Drop for Selected<'_, SPI, CS>
where
    CS: OutputPin,
{
    fn drop(&mut self) {
        // Error and cancellation exits only; nothing to report to here.
        if !self.released {
            let _ = self.iface.cs.set_high();
        }
    }
}

impl<SPI, CS> RegisterBus for SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = SpiError<SPI::Error, CS::Error>;
    type Inner = (SPI, CS);

    fn destroy(self) -> Self::Inner {
        (self.spi, self.cs)
    }

    async fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        let address = self.encoding.encode(reg, Direction::Read);
        trace!("spi read reg {=u8:#x} (wire {=u8:#x}) len {=usize}", reg, address, buf.len());

        let mut selected = self.select()?;
        selected.transmit(&[address]).await?;
        selected.receive(buf).await?;
        selected.finish().await
    }

    async fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let address = self.encoding.encode(reg, Direction::Write);
        trace!("spi write reg {=u8:#x} (wire {=u8:#x}) data {=[u8]}", reg, address, data);

        let mut selected = self.select()?;
        selected.transmit(&[address]).await?;
        selected.transmit(data).await?;
        selected.finish().await
    }
}
