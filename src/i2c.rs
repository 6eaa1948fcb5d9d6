use embedded_hal_async::i2c::{I2c, Operation};

use crate::protocol::RegisterBus;

/// Register access over I2C. The register index goes out as the first written
/// byte; reads use a repeated start.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C> RegisterBus for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;
    type Inner = I2C;

    fn destroy(self) -> Self::Inner {
        self.i2c
    }

    async fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        trace!("i2c {=u8:#x} read reg {=u8:#x} len {=usize}", self.address, reg, buf.len());
        self.i2c.write_read(self.address, &[reg], buf).await
    }

    async fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        trace!("i2c {=u8:#x} write reg {=u8:#x} data {=[u8]}", self.address, reg, data);
        self.i2c
            .transaction(self.address, &mut [Operation::Write(&[reg]), Operation::Write(data)])
            .await
    }
}
