//! Driver configuration.

use embassy_time::Duration;

use crate::error::ConfigError;
use crate::registers::{
    ADDRESS_FLOAT, ADDRESS_GND, ADDRESS_VDD, DEFAULT_ADDRESS, HEALTH_CHECK_INTERVAL_SECS,
};

/// Smallest accepted full-scale resistance (ohms).
pub const MIN_MAX_RESISTANCE: f32 = 1_000.0;

/// Largest accepted full-scale resistance (ohms).
pub const MAX_MAX_RESISTANCE: f32 = 100_000.0;

/// Full-scale resistance of the common 20 kΩ variant.
pub const DEFAULT_MAX_RESISTANCE: f32 = 20_000.0;

/// How the ADDR pin is strapped on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressPin {
    Gnd,
    Vdd,
    /// Only valid with a unipolar supply.
    Float,
}

impl AddressPin {
    /// 7-bit I2C address selected by this strapping.
    pub const fn address(self) -> u8 {
        match self {
            AddressPin::Gnd => ADDRESS_GND,
            AddressPin::Vdd => ADDRESS_VDD,
            AddressPin::Float => ADDRESS_FLOAT,
        }
    }
}

/// Construction-time settings for [`Ad5272`](crate::Ad5272).
///
/// Fixed once the driver is built; there is no way to change the
/// full-scale resistance afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ad5272Config {
    /// 7-bit I2C address.
    pub address: u8,
    /// End-to-end resistance of the part in ohms.
    pub max_resistance: f32,
    /// Minimum time between presence re-checks in [`poll`](crate::Ad5272::poll).
    pub health_check_interval: Duration,
}

impl Default for Ad5272Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            max_resistance: DEFAULT_MAX_RESISTANCE,
            health_check_interval: Duration::from_secs(HEALTH_CHECK_INTERVAL_SECS),
        }
    }
}

impl Ad5272Config {
    /// Default settings with the given full-scale resistance.
    pub fn with_max_resistance(max_resistance: f32) -> Self {
        Self {
            max_resistance,
            ..Self::default()
        }
    }

    /// Replace the address with the one selected by `pin`.
    pub fn with_address_pin(mut self, pin: AddressPin) -> Self {
        self.address = pin.address();
        self
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    /// * [`ConfigError::MaxResistanceOutOfRange`] unless the max resistance
    ///   is finite and within 1 kΩ–100 kΩ
    /// * [`ConfigError::InvalidAddress`] if the address exceeds 7 bits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_RESISTANCE..=MAX_MAX_RESISTANCE).contains(&self.max_resistance) {
            return Err(ConfigError::MaxResistanceOutOfRange);
        }
        if self.address > 0x7F {
            return Err(ConfigError::InvalidAddress);
        }
        Ok(())
    }
}
