//! Error types for the potentiometer driver.

use core::fmt;

/// Errors that can occur when driving the potentiometer.
#[derive(Debug, Clone, PartialEq)]
pub enum Ad5272Error<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// The last presence check failed (or none has succeeded yet).
    DeviceUnavailable,

    /// Target resistance outside `[0, max_resistance]`, or a wiper position
    /// above 1023.
    OutOfRange,

    /// The write-enable bit could not be set, or did not read back as set.
    /// Carries the bus error when a transaction failed, `None` when the
    /// readback showed the bit clear.
    UnlockFailed(Option<E>),

    /// The RDAC write transaction failed.
    WriteFailed(E),

    /// The wiper did not read back as written. `read` is `None` when the
    /// readback itself failed.
    VerificationFailed { expected: u16, read: Option<u16> },
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for Ad5272Error<E> {
    fn from(error: E) -> Self {
        Ad5272Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Ad5272Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ad5272Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Ad5272Error::DeviceUnavailable => write!(f, "Device not available"),
            Ad5272Error::OutOfRange => write!(f, "Value out of range"),
            Ad5272Error::UnlockFailed(Some(e)) => write!(f, "RDAC unlock failed: {:?}", e),
            Ad5272Error::UnlockFailed(None) => write!(f, "RDAC unlock failed (enable bit clear)"),
            Ad5272Error::WriteFailed(e) => write!(f, "RDAC write failed: {:?}", e),
            Ad5272Error::VerificationFailed { expected, read: Some(read) } => {
                write!(f, "Write verification failed (expected {}, read {})", expected, read)
            }
            Ad5272Error::VerificationFailed { expected, read: None } => {
                write!(f, "Write verification failed (expected {}, readback error)", expected)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Ad5272Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Ad5272Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Ad5272Error::DeviceUnavailable => defmt::write!(f, "Device not available"),
            Ad5272Error::OutOfRange => defmt::write!(f, "Value out of range"),
            Ad5272Error::UnlockFailed(e) => defmt::write!(f, "RDAC unlock failed: {}", e),
            Ad5272Error::WriteFailed(e) => defmt::write!(f, "RDAC write failed: {}", e),
            Ad5272Error::VerificationFailed { expected, read } => {
                defmt::write!(f, "Write verification failed (expected {}, read {})", expected, read)
            }
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Max resistance is not finite or lies outside 1 kΩ–100 kΩ.
    MaxResistanceOutOfRange,
    /// Address does not fit in 7 bits.
    InvalidAddress,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MaxResistanceOutOfRange => {
                write!(f, "Max resistance out of range (1000-100000 ohms)")
            }
            ConfigError::InvalidAddress => write!(f, "I2C address must be 7-bit"),
        }
    }
}
