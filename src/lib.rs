#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the other modules.
mod fmt;

mod cfg;
pub mod decode;
pub mod device;
mod error;
pub mod flight;
mod i2c;
pub mod protocol;
pub mod reg;
mod spi;

#[cfg(test)]
mod mock;

use core::future::Future;

use embassy_futures::select::{select, Either};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, i2c::I2c, spi::SpiBus};
use nalgebra::Vector3;

pub use crate::cfg::*;
pub use crate::decode::{PhysicalValue, RawSample, Sample};
pub use crate::device::{Descriptor, Measurement, Setup};
pub use crate::error::{Error, InitError};
pub use crate::flight::FlightControl;
pub use crate::i2c::I2cInterface;
pub use crate::protocol::{AddressEncoding, RegisterBus};
pub use crate::spi::{Selected, SpiError, SpiInterface};

use crate::decode::{to_physical, MAX_SAMPLE_LEN};
use crate::device::Quantity;
use crate::reg::{Register, RESERVED_ADDRESS_BIT};

/// Progress of the init sequence
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Identity not checked yet
    Unverified,
    /// Identity matched, configuration not (fully) applied
    Verified,
    /// Ready for sample reads
    Configured,
    /// Last init attempt failed
    Failed,
}

/// One sensor chip behind one transport.
pub struct Sensor<BUS, DELAY> {
    bus: BUS,
    delay: DELAY,
    config: Config,
    descriptor: &'static Descriptor,
    state: State,
}

impl<SPI, CS, DELAY> Sensor<SpiInterface<SPI, CS>, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
{
    /// Creates an uninitialized sensor with the given config.
    #[must_use]
    pub fn new_spi_from_cfg(
        spi: SPI,
        cs: CS,
        descriptor: &'static Descriptor,
        cfg: Config,
        delay: DELAY,
    ) -> Self {
        Self {
            bus: SpiInterface::new(spi, cs, descriptor.encoding),
            delay,
            config: cfg,
            descriptor,
            state: State::Unverified,
        }
    }

    /// Creates an uninitialized sensor with a default config.
    #[must_use]
    pub fn new_spi(spi: SPI, cs: CS, descriptor: &'static Descriptor, delay: DELAY) -> Self {
        Self::new_spi_from_cfg(spi, cs, descriptor, Config::default(), delay)
    }
}

impl<I2C, DELAY> Sensor<I2cInterface<I2C>, DELAY>
where
    I2C: I2c,
    DELAY: DelayNs,
{
    /// Creates an uninitialized sensor with the given config.
    #[must_use]
    pub fn new_i2c_from_cfg(
        i2c: I2C,
        descriptor: &'static Descriptor,
        cfg: Config,
        delay: DELAY,
    ) -> Self {
        let address = cfg.i2c_address.resolve(descriptor.i2c_address);
        Self {
            bus: I2cInterface::new(i2c, address),
            delay,
            config: cfg,
            descriptor,
            state: State::Unverified,
        }
    }

    /// Creates an uninitialized sensor with a default config.
    #[must_use]
    pub fn new_i2c(i2c: I2C, descriptor: &'static Descriptor, delay: DELAY) -> Self {
        Self::new_i2c_from_cfg(i2c, descriptor, Config::default(), delay)
    }

    /// Set I2C address of the sensor. See `I2cAddress` for defaults, otherwise `u8` implements `Into<I2cAddress>`
    #[must_use]
    pub fn set_address(self, address: impl Into<I2cAddress>) -> Self {
        let config = Config {
            i2c_address: address.into(),
            ..self.config
        };
        let i2c = self.bus.destroy();
        Self {
            bus: I2cInterface::new(i2c, config.i2c_address.resolve(self.descriptor.i2c_address)),
            config,
            state: State::Unverified,
            ..self
        }
    }
}

impl<BUS, DELAY> Sensor<BUS, DELAY> {
    /// Bound every register operation to `timeout_ms`, or wait forever with `None`
    #[must_use]
    pub fn timeout(self, timeout_ms: Option<u32>) -> Self {
        Sensor {
            config: Config {
                timeout_ms,
                ..self.config
            },
            ..self
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// True once the identity matched and every setup step was applied
    pub fn is_ready(&self) -> bool {
        self.state == State::Configured
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        self.descriptor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<BUS: RegisterBus, DELAY> Sensor<BUS, DELAY> {
    /// Consumes the `Sensor` and releases the bus back to the user
    #[must_use]
    pub fn destroy(self) -> BUS::Inner {
        self.bus.destroy()
    }
}

impl<BUS, DELAY> Sensor<BUS, DELAY>
where
    BUS: RegisterBus,
    DELAY: DelayNs,
{
    /*
        Register primitives
    */

    /// Read `buf.len()` consecutive registers starting at `reg`
    pub async fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        check_range(reg, buf.len())?;
        bounded(
            &mut self.delay,
            self.config.timeout_ms,
            self.bus.read_register(reg, buf),
        )
        .await
    }

    /// Write `data` to consecutive registers starting at `reg`
    pub async fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<BUS::Error>> {
        check_range(reg, data.len())?;
        bounded(
            &mut self.delay,
            self.config.timeout_ms,
            self.bus.write_register(reg, data),
        )
        .await
    }

    /// Read a single register
    pub async fn read_byte(&mut self, reg: impl Register) -> Result<u8, Error<BUS::Error>> {
        let mut byte = [0u8];
        self.read_register(reg.reg(), &mut byte).await?;
        Ok(byte[0])
    }

    /// Write a single register
    pub async fn write_byte(&mut self, reg: impl Register, value: u8) -> Result<(), Error<BUS::Error>> {
        self.write_register(reg.reg(), &[value]).await
    }

    /// Write to a register, but only overwrite the parts corresponding to the mask byte
    pub async fn modify_register(
        &mut self,
        reg: impl Register,
        value: u8,
        mask: u8,
    ) -> Result<(), Error<BUS::Error>> {
        let current = self.read_byte(reg).await?;
        self.write_byte(reg, (current & !mask) | (value & mask))
            .await
    }

    /// Apply one configuration step
    pub async fn apply(&mut self, step: Setup) -> Result<(), Error<BUS::Error>> {
        match step {
            Setup::Write { register, value } => self.write_byte(register, value).await,
            Setup::Modify {
                register,
                value,
                mask,
            } => self.modify_register(register, value, mask).await,
        }
    }

    /// Raw content of the identity register
    pub async fn who_am_i(&mut self) -> Result<u8, Error<BUS::Error>> {
        self.read_byte(self.descriptor.identity.register).await
    }

    /// Raw content of the status register
    pub async fn read_status(&mut self) -> Result<u8, Error<BUS::Error>> {
        self.read_byte(self.descriptor.status_register).await
    }

    /// Whether a new sample of `measurement` is available according to the status register
    pub async fn data_ready(&mut self, measurement: Measurement) -> Result<bool, Error<BUS::Error>> {
        let quantity = self
            .descriptor
            .quantity(measurement)
            .ok_or(Error::InvalidArgument)?;
        let status = self.read_status().await?;
        Ok(status & quantity.ready_mask != 0)
    }

    /*
        Initialization
    */

    /// Check the identity of the chip and apply its configuration.
    ///
    /// Can be called again at any time, the whole sequence is re-run. On
    /// failure the sensor refuses sample reads until a later call succeeds.
    pub async fn init(&mut self) -> Result<(), InitError<BUS::Error>> {
        self.state = State::Unverified;
        match self.run_init().await {
            Ok(()) => {
                self.state = State::Configured;
                info!("{=str}: configured", self.descriptor.name);
                Ok(())
            }
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    async fn run_init(&mut self) -> Result<(), InitError<BUS::Error>> {
        let descriptor = self.descriptor;

        if !descriptor.preamble.is_empty() {
            debug!("{=str}: interface preamble", descriptor.name);
            self.apply_all(descriptor.preamble).await?;
        }

        let found = self.who_am_i().await?;
        let expected = descriptor.identity.expected;
        if found != expected {
            error!(
                "{=str}: who am i {=u8:#x}, expected {=u8:#x}",
                descriptor.name,
                found,
                expected
            );
            return Err(InitError::IdentityMismatch { expected, found });
        }
        self.state = State::Verified;
        debug!("{=str}: identity verified", descriptor.name);

        self.apply_all(descriptor.setup).await
    }

    /// Apply steps in order, stopping at the first failure
    async fn apply_all(&mut self, steps: &[Setup]) -> Result<(), InitError<BUS::Error>> {
        for step in steps {
            if let Err(source) = self.apply(*step).await {
                warn!(
                    "{=str}: configuring register {=u8:#x} failed",
                    self.descriptor.name,
                    step.register()
                );
                return Err(InitError::ConfigurationFailed {
                    register: step.register(),
                    source,
                });
            }
        }
        Ok(())
    }

    /*
        Sample reads
    */

    /// Get the raw bytes of one sample of `measurement`
    pub async fn read_raw(&mut self, measurement: Measurement) -> Result<RawSample, Error<BUS::Error>> {
        let quantity = self.ready_quantity(measurement)?;

        let mut buf = [0u8; MAX_SAMPLE_LEN];
        let bytes = &mut buf[..quantity.layout.len()];
        if self.descriptor.auto_increment {
            self.read_register(quantity.register, bytes).await?;
        } else {
            // One register at a time, in increasing address order
            for (offset, byte) in bytes.iter_mut().enumerate() {
                let reg = quantity.register.wrapping_add(offset as u8);
                self.read_register(reg, core::slice::from_mut(byte)).await?;
            }
        }

        RawSample::new(quantity.layout, bytes).ok_or(Error::InvalidArgument)
    }

    /// Samples are only served once configured
    fn ready_quantity(&self, measurement: Measurement) -> Result<Quantity, Error<BUS::Error>> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        self.descriptor
            .quantity(measurement)
            .ok_or(Error::InvalidArgument)
    }

    /// Get one scaled sample of `measurement`
    pub async fn read_physical(
        &mut self,
        measurement: Measurement,
    ) -> Result<PhysicalValue, Error<BUS::Error>> {
        let quantity = self.ready_quantity(measurement)?;
        let raw = self.read_raw(measurement).await?;
        Ok(to_physical(raw.decode(), quantity.scale, quantity.offset))
    }

    async fn read_scalar(&mut self, measurement: Measurement) -> Result<f32, Error<BUS::Error>> {
        self.read_physical(measurement)
            .await?
            .scalar()
            .ok_or(Error::InvalidArgument)
    }

    async fn read_vector(
        &mut self,
        measurement: Measurement,
    ) -> Result<Vector3<f32>, Error<BUS::Error>> {
        self.read_physical(measurement)
            .await?
            .vector()
            .ok_or(Error::InvalidArgument)
    }

    async fn read_axes_unscaled(
        &mut self,
        measurement: Measurement,
    ) -> Result<Vector3<i16>, Error<BUS::Error>> {
        match self.read_raw(measurement).await?.decode() {
            Sample::Axes(axes) => Ok(axes),
            Sample::Scalar(_) => Err(Error::InvalidArgument),
        }
    }

    async fn read_scalar_unscaled(
        &mut self,
        measurement: Measurement,
    ) -> Result<i32, Error<BUS::Error>> {
        match self.read_raw(measurement).await?.decode() {
            Sample::Scalar(value) => Ok(value),
            Sample::Axes(_) => Err(Error::InvalidArgument),
        }
    }

    /// Get pressure in hPa
    pub async fn read_pressure(&mut self) -> Result<f32, Error<BUS::Error>> {
        self.read_scalar(Measurement::Pressure).await
    }

    /// Get unscaled 24-bit pressure
    pub async fn read_pressure_unscaled(&mut self) -> Result<i32, Error<BUS::Error>> {
        self.read_scalar_unscaled(Measurement::Pressure).await
    }

    /// Get temperature in °C
    pub async fn read_temperature(&mut self) -> Result<f32, Error<BUS::Error>> {
        self.read_scalar(Measurement::Temperature).await
    }

    /// Get unscaled temperature
    pub async fn read_temperature_unscaled(&mut self) -> Result<i32, Error<BUS::Error>> {
        self.read_scalar_unscaled(Measurement::Temperature).await
    }

    /// Get vector of scaled magnetometer values, unit is micro tesla
    pub async fn read_magnetic_field(&mut self) -> Result<Vector3<f32>, Error<BUS::Error>> {
        self.read_vector(Measurement::MagneticField).await
    }

    /// Get vector of unscaled magnetometer values
    pub async fn read_magnetic_field_unscaled(&mut self) -> Result<Vector3<i16>, Error<BUS::Error>> {
        self.read_axes_unscaled(Measurement::MagneticField).await
    }

    /// Get vector of scaled accelerometer values, unit is g
    pub async fn read_acceleration(&mut self) -> Result<Vector3<f32>, Error<BUS::Error>> {
        self.read_vector(Measurement::Acceleration).await
    }

    /// Get vector of unscaled accelerometer values
    pub async fn read_acceleration_unscaled(&mut self) -> Result<Vector3<i16>, Error<BUS::Error>> {
        self.read_axes_unscaled(Measurement::Acceleration).await
    }

    /// Get vector of scaled gyroscope values, unit is degrees/s
    pub async fn read_angular_rate(&mut self) -> Result<Vector3<f32>, Error<BUS::Error>> {
        self.read_vector(Measurement::AngularRate).await
    }

    /// Get vector of unscaled gyroscope values
    pub async fn read_angular_rate_unscaled(&mut self) -> Result<Vector3<i16>, Error<BUS::Error>> {
        self.read_axes_unscaled(Measurement::AngularRate).await
    }
}

/// Reject empty transfers and anything reaching into the address flag bit
fn check_range<E>(reg: u8, len: usize) -> Result<(), Error<E>> {
    if len == 0 || reg & RESERVED_ADDRESS_BIT != 0 {
        return Err(Error::InvalidArgument);
    }
    if usize::from(reg) + len > usize::from(RESERVED_ADDRESS_BIT) {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

/// Race a bus operation against the configured timeout. The losing operation
/// is dropped, which releases the SPI chip-select.
async fn bounded<T, E>(
    delay: &mut impl DelayNs,
    timeout_ms: Option<u32>,
    operation: impl Future<Output = Result<T, E>>,
) -> Result<T, Error<E>> {
    let Some(ms) = timeout_ms else {
        return operation.await.map_err(Error::Bus);
    };
    match select(operation, delay.delay_ms(ms)).await {
        Either::First(result) => result.map_err(Error::Bus),
        Either::Second(()) => {
            warn!("bus operation timed out after {=u32} ms", ms);
            Err(Error::Timeout)
        }
    }
}
