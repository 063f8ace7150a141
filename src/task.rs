//! Periodic host loops for the health check and telemetry.
//!
//! These are regular `async fn`s — **not** Embassy `#[task]`s. Embassy tasks
//! cannot be generic, so callers wrap them in a thin concrete task:
//!
//! ```ignore
//! #[embassy_executor::task]
//! async fn pot_health(pot: &'static Mutex<CriticalSectionRawMutex, Ad5272<MyI2c, Delay>>) {
//!     health_check_task(pot, Duration::from_secs(1)).await;
//! }
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::ad5272::Ad5272;
use crate::telemetry::{TelemetryObserver, TelemetrySink};

/// Initialise the driver, then call [`Ad5272::poll`] every `tick`.
///
/// The driver's own `health_check_interval` decides when a presence check
/// actually runs; `tick` only bounds how late it can be. The mutex is held
/// for one poll at a time.
pub async fn health_check_task<M, I2C, D>(
    driver: &Mutex<M, Ad5272<I2C, D>>,
    tick: Duration,
) where
    M: RawMutex,
    I2C: I2c,
    D: DelayNs,
{
    {
        let mut pot = driver.lock().await;
        pot.init().await;
        pot.log_config();
        pot.start_health_interval(Instant::now());
    }

    let mut ticker = Ticker::every(tick);
    loop {
        ticker.next().await;
        driver.lock().await.poll(Instant::now()).await;
    }
}

/// Poll every observer once per `period` and forward readings to `sink`.
pub async fn telemetry_task<M, I2C, D, S>(
    observers: &[TelemetryObserver<'_, M, I2C, D>],
    sink: &mut S,
    period: Duration,
) where
    M: RawMutex,
    I2C: I2c,
    D: DelayNs,
    S: TelemetrySink,
{
    let mut ticker = Ticker::every(period);
    loop {
        ticker.next().await;
        for observer in observers {
            observer.poll(sink).await;
        }
    }
}
