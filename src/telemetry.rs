//! Telemetry adapters that poll a shared [`Ad5272`] and forward readings.
//!
//! All four channels (resistance, wiper position, availability, status
//! text) go through a single dispatch, [`Ad5272::observe`], so an observer
//! is just a [`Observable`] tag plus a reference to the driver.
//!
//! ```text
//! host cadence ──► TelemetryObserver::poll ──► Mutex<Ad5272>::observe ──► TelemetrySink
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::ad5272::Ad5272;

/// Which driver accessor an observer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Observable {
    Resistance,
    WiperPosition,
    Availability,
    StatusText,
}

/// One published value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Ohms.
    Resistance(f32),
    WiperPosition(u16),
    Availability(bool),
    Status(&'static str),
}

/// Consumer of published readings (a numeric, boolean or text sensor on
/// the host side).
pub trait TelemetrySink {
    fn publish(&mut self, reading: Reading);
}

impl<F> TelemetrySink for F
where
    F: FnMut(Reading),
{
    fn publish(&mut self, reading: Reading) {
        self(reading)
    }
}

impl<I2C, D> Ad5272<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Read the value behind `kind`.
    ///
    /// Resistance and wiper position go through the stale-read fallback of
    /// [`current_resistance`](Self::current_resistance) and
    /// [`current_wiper_position`](Self::current_wiper_position). Returns
    /// `None` for a resistance while the device is unavailable (the `NaN`
    /// sentinel is never published).
    pub async fn observe(&mut self, kind: Observable) -> Option<Reading> {
        match kind {
            Observable::Resistance => {
                let ohms = self.current_resistance().await;
                if ohms.is_nan() {
                    None
                } else {
                    Some(Reading::Resistance(ohms))
                }
            }
            Observable::WiperPosition => {
                Some(Reading::WiperPosition(self.current_wiper_position().await))
            }
            Observable::Availability => Some(Reading::Availability(self.is_available())),
            Observable::StatusText => Some(Reading::Status(self.status_message())),
        }
    }
}

/// Polls one channel of a shared driver.
///
/// Holds a borrowed, optional reference; it never owns the driver and
/// cannot outlive it. A detached observer polls as a no-op.
pub struct TelemetryObserver<'a, M: RawMutex, I2C, D> {
    driver: Option<&'a Mutex<M, Ad5272<I2C, D>>>,
    kind: Observable,
}

impl<'a, M, I2C, D> TelemetryObserver<'a, M, I2C, D>
where
    M: RawMutex,
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(driver: &'a Mutex<M, Ad5272<I2C, D>>, kind: Observable) -> Self {
        Self {
            driver: Some(driver),
            kind,
        }
    }

    /// An observer with no driver attached yet.
    pub fn detached(kind: Observable) -> Self {
        Self { driver: None, kind }
    }

    pub fn attach(&mut self, driver: &'a Mutex<M, Ad5272<I2C, D>>) {
        self.driver = Some(driver);
    }

    pub fn kind(&self) -> Observable {
        self.kind
    }

    /// Read the channel and forward it to `sink`.
    ///
    /// Returns `true` if a reading was published. Nothing is published when
    /// the observer is detached or the resistance is unavailable.
    pub async fn poll<S: TelemetrySink>(&self, sink: &mut S) -> bool {
        let Some(driver) = self.driver else {
            return false;
        };

        // Release the lock before handing the value to the sink.
        let reading = {
            let mut pot = driver.lock().await;
            pot.observe(self.kind).await
        };

        match reading {
            Some(reading) => {
                sink.publish(reading);
                true
            }
            None => false,
        }
    }
}
