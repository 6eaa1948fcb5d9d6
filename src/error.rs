use core::fmt;

/// Error of a single register operation or sample read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Register index or buffer rejected before touching the bus
    InvalidArgument,
    /// The transport reported an error
    Bus(E),
    /// The operation did not complete within the configured timeout
    Timeout,
    /// The session has not been (successfully) initialized
    NotReady,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid register or buffer"),
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Error::Timeout => f.write_str("bus operation timed out"),
            Error::NotReady => f.write_str("sensor not initialized"),
        }
    }
}

/// Error raised by [`Sensor::init`](crate::Sensor::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// Identity register (or preamble) could not be accessed
    Bus(Error<E>),
    /// An incorrect 'Who Am I' value was returned
    IdentityMismatch { expected: u8, found: u8 },
    /// A configuration step failed
    ConfigurationFailed { register: u8, source: Error<E> },
}

impl<E> From<Error<E>> for InitError<E> {
    fn from(error: Error<E>) -> Self {
        InitError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Bus(e) => write!(f, "identity check failed: {e}"),
            InitError::IdentityMismatch { expected, found } => write!(
                f,
                "unexpected identity {found:#04x}, expected {expected:#04x}"
            ),
            InitError::ConfigurationFailed { register, source } => {
                write!(f, "configuring register {register:#04x} failed: {source}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn display_names_the_register() {
        let error: InitError<()> = InitError::ConfigurationFailed {
            register: 0x10,
            source: Error::Timeout,
        };
        assert_eq!(
            error.to_string(),
            "configuring register 0x10 failed: bus operation timed out"
        );

        let error: InitError<()> = InitError::IdentityMismatch {
            expected: 0x40,
            found: 0xFF,
        };
        assert_eq!(error.to_string(), "unexpected identity 0xff, expected 0x40");
    }
}
