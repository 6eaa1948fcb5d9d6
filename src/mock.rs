//! Test doubles: a register file reachable over SPI (with chip select) or I2C.

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::{digital, i2c::Operation, spi};
use embedded_hal_async::{delay::DelayNs, i2c::I2c, spi::SpiBus};

use crate::protocol::{AddressEncoding, Direction};

/// Bus activity as seen by the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    /// Chip select refused to go high
    DeselectFailed,
    Transmit(Vec<u8>),
    Receive(usize),
    Flush,
    I2cWrite(u8, Vec<u8>),
    I2cRead(u8, usize),
}

struct Inner {
    encoding: AddressEncoding,
    registers: [u8; 256],
    events: Vec<Event>,
    writes: Vec<(u8, u8)>,
    selected: bool,
    pointer: Option<(u8, Direction)>,
    remaining_ops: Option<usize>,
    stalled: bool,
    stuck_select: bool,
}

impl Inner {
    /// Count one bus operation against the failure budget.
    fn step(&mut self) -> bool {
        match self.remaining_ops.as_mut() {
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
            None => true,
        }
    }

    fn store(&mut self, reg: u8, value: u8) {
        self.registers[reg as usize] = value;
        self.writes.push((reg, value));
    }
}

/// Logical register and direction carried by an SPI address byte.
fn decode_address(encoding: AddressEncoding, wire: u8) -> (u8, Direction) {
    match encoding {
        AddressEncoding::MsbReadFlag => {
            let direction = if wire & 0x80 != 0 {
                Direction::Read
            } else {
                Direction::Write
            };
            (wire & 0x7F, direction)
        }
        AddressEncoding::ShiftedReadFlag => {
            let direction = if wire & 0x01 != 0 {
                Direction::Read
            } else {
                Direction::Write
            };
            (wire >> 1, direction)
        }
    }
}

/// Handle shared by the SPI, chip-select and I2C halves of the mock.
#[derive(Clone)]
pub struct MockBus {
    inner: Rc<RefCell<Inner>>,
}

impl MockBus {
    pub fn new(encoding: AddressEncoding) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                encoding,
                registers: [0; 256],
                events: Vec::new(),
                writes: Vec::new(),
                selected: false,
                pointer: None,
                remaining_ops: None,
                stalled: false,
                stuck_select: false,
            })),
        }
    }

    pub fn spi(&self) -> MockSpi {
        MockSpi { bus: self.clone() }
    }

    pub fn cs(&self) -> MockCs {
        MockCs { bus: self.clone() }
    }

    pub fn i2c(&self) -> MockI2c {
        MockI2c { bus: self.clone() }
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.inner.borrow_mut().registers[reg as usize] = value;
    }

    pub fn set_registers(&self, reg: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            self.set_register(reg.wrapping_add(offset as u8), *value);
        }
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.inner.borrow().registers[reg as usize]
    }

    /// Let `ops` bus operations succeed, fail every one after that.
    pub fn fail_after(&self, ops: usize) {
        self.inner.borrow_mut().remaining_ops = Some(ops);
    }

    /// Make the chip-select pin fail every attempt to deselect.
    pub fn fail_deselect(&self) {
        self.inner.borrow_mut().stuck_select = true;
    }

    /// Make every following bus operation hang forever.
    pub fn stall(&self) {
        self.inner.borrow_mut().stalled = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.borrow().events.clone()
    }

    /// Every (register, value) pair the chip received, in order.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.inner.borrow().writes.clone()
    }

    pub fn clear_events(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.events.clear();
        inner.writes.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.inner.borrow().selected
    }

    /// True when every select was followed by exactly one deselect.
    pub fn selects_are_paired(&self) -> bool {
        let mut selected = false;
        for event in self.inner.borrow().events.iter() {
            match event {
                Event::Select if selected => return false,
                Event::Select => selected = true,
                Event::Deselect if !selected => return false,
                Event::Deselect => selected = false,
                _ => {}
            }
        }
        !selected
    }

    async fn wait_if_stalled(&self) {
        let stalled = self.inner.borrow().stalled;
        if stalled {
            core::future::pending::<()>().await;
        }
    }
}

pub struct MockSpi {
    bus: MockBus,
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl MockSpi {
    fn spi_write(&mut self, words: &[u8]) -> Result<(), spi::ErrorKind> {
        let mut inner = self.bus.inner.borrow_mut();
        if !inner.step() {
            return Err(spi::ErrorKind::Other);
        }
        inner.events.push(Event::Transmit(words.to_vec()));

        let mut words = words.iter().copied();
        if inner.pointer.is_none() {
            if let Some(address) = words.next() {
                let encoding = inner.encoding;
                inner.pointer = Some(decode_address(encoding, address));
            }
        }
        for word in words {
            if let Some((reg, Direction::Write)) = inner.pointer {
                inner.store(reg, word);
                inner.pointer = Some((reg.wrapping_add(1), Direction::Write));
            }
        }
        Ok(())
    }

    fn spi_read(&mut self, words: &mut [u8]) -> Result<(), spi::ErrorKind> {
        let mut inner = self.bus.inner.borrow_mut();
        if !inner.step() {
            return Err(spi::ErrorKind::Other);
        }
        inner.events.push(Event::Receive(words.len()));

        if let Some((mut reg, Direction::Read)) = inner.pointer {
            for word in words.iter_mut() {
                *word = inner.registers[reg as usize];
                reg = reg.wrapping_add(1);
            }
            inner.pointer = Some((reg, Direction::Read));
        }
        Ok(())
    }
}

impl SpiBus for MockSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        self.spi_read(words)
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        self.spi_write(words)
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        self.spi_write(write)?;
        self.spi_read(read)
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        let out = words.to_vec();
        self.spi_write(&out)?;
        self.spi_read(words)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        let mut inner = self.bus.inner.borrow_mut();
        if !inner.step() {
            return Err(spi::ErrorKind::Other);
        }
        inner.events.push(Event::Flush);
        Ok(())
    }
}

pub struct MockCs {
    bus: MockBus,
}

impl digital::ErrorType for MockCs {
    type Error = digital::ErrorKind;
}

impl digital::OutputPin for MockCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.bus.inner.borrow_mut();
        inner.selected = true;
        inner.pointer = None;
        inner.events.push(Event::Select);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.bus.inner.borrow_mut();
        if inner.stuck_select {
            inner.events.push(Event::DeselectFailed);
            return Err(digital::ErrorKind::Other);
        }
        inner.selected = false;
        inner.pointer = None;
        inner.events.push(Event::Deselect);
        Ok(())
    }
}

pub struct MockI2c {
    bus: MockBus,
}

impl embedded_hal::i2c::ErrorType for MockI2c {
    type Error = embedded_hal::i2c::ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.bus.wait_if_stalled().await;
        let mut inner = self.bus.inner.borrow_mut();
        if !inner.step() {
            return Err(embedded_hal::i2c::ErrorKind::Bus);
        }

        let mut pointer: Option<u8> = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    inner.events.push(Event::I2cWrite(address, bytes.to_vec()));
                    for byte in bytes.iter().copied() {
                        match pointer {
                            None => pointer = Some(byte),
                            Some(reg) => {
                                inner.store(reg, byte);
                                pointer = Some(reg.wrapping_add(1));
                            }
                        }
                    }
                }
                Operation::Read(buf) => {
                    inner.events.push(Event::I2cRead(address, buf.len()));
                    let mut reg = pointer.unwrap_or(0);
                    for byte in buf.iter_mut() {
                        *byte = inner.registers[reg as usize];
                        reg = reg.wrapping_add(1);
                    }
                    pointer = Some(reg);
                }
            }
        }
        Ok(())
    }
}

/// Delay that completes immediately.
pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_byte_decodes_per_encoding() {
        assert_eq!(
            decode_address(AddressEncoding::MsbReadFlag, 0xA8),
            (0x28, Direction::Read)
        );
        assert_eq!(
            decode_address(AddressEncoding::ShiftedReadFlag, 0xC4),
            (0x62, Direction::Write)
        );
    }
}
