//! Async driver for the AD5272/AD5274 I2C digital potentiometer.
//!
//! This crate provides an `embedded-hal-async` driver for the Analog Devices
//! AD5272 (1024-step) digital rheostat, plus telemetry adapters that
//! publish its resistance, wiper position, availability and status.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private) — command frame transport with the
//!   settling delays the part needs between a command and its response.
//! - **[`protocol`]** — pure encoding/decoding of the 16-bit command frame.
//! - **[`calibration`]** — linear mapping between ohms and wiper steps.
//! - **[`Ad5272`]** (public) — presence tracking, the unlock → write →
//!   verify sequence and the cached wiper position.
//! - **[`telemetry`]** — observers that poll a shared [`Ad5272`] and forward
//!   readings to a sink.
//!
//! # Quick start
//!
//! ```ignore
//! use ad5272_driver::{Ad5272, Ad5272Config};
//!
//! // Construct with any `embedded-hal-async` I2C implementation
//! let mut pot = Ad5272::new(i2c, embassy_time::Delay, Ad5272Config::default())?;
//! pot.init().await;
//!
//! pot.set_resistance(10_000.0).await?;
//! let ohms = pot.current_resistance().await;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and
//!   `defmt::Format` implementations on public types.
//! - **`task`** — periodic [`health_check_task`] and [`telemetry_task`]
//!   loops driven by `embassy-time`.

#![no_std]

pub mod calibration;
pub mod protocol;
pub mod registers;
pub mod telemetry;

#[cfg(feature = "task")]
pub mod task;

mod ad5272;
mod config;
mod driver;
mod error;
mod status;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use ad5272::Ad5272;
pub use config::{AddressPin, Ad5272Config, DEFAULT_MAX_RESISTANCE};
pub use error::{Ad5272Error, ConfigError};
pub use protocol::{Command, WireWord};
pub use registers::{DEFAULT_ADDRESS, WIPER_MAX};
pub use status::{DeviceState, Status};
pub use telemetry::{Observable, Reading, TelemetryObserver, TelemetrySink};

#[cfg(feature = "task")]
pub use task::{health_check_task, telemetry_task};
