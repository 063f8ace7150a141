//! Driver integration tests — exercise the presence, unlock, write and
//! verify sequences against a scripted I2C bus.
//!
//! Run with: cargo test --test driver

use ad5272_driver::{
    Ad5272, Ad5272Config, Ad5272Error, Command, ConfigError, DeviceState, WIPER_MAX,
};
use std::cell::RefCell;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

const ADDR: u8 = 0x2F;
const MAX_OHMS: f32 = 20_000.0;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Command frame for `command` with `data`, MSB first.
fn frame(command: Command, data: u16) -> Vec<u8> {
    let word = ((command.code() as u16) << 10) | data;
    word.to_be_bytes().to_vec()
}

/// A read command followed by a two-byte response.
fn read_ok(command: Command, response: u16) -> [I2cTransaction; 2] {
    [
        I2cTransaction::write(ADDR, frame(command, 0)),
        I2cTransaction::read(ADDR, response.to_be_bytes().to_vec()),
    ]
}

/// A read command whose response phase fails on the bus.
fn read_err(command: Command) -> [I2cTransaction; 2] {
    [
        I2cTransaction::write(ADDR, frame(command, 0)),
        I2cTransaction::read(ADDR, vec![0, 0]).with_error(ErrorKind::Other),
    ]
}

/// Successful presence check followed by an initial wiper read of `wiper`.
fn init_ok(wiper: u16) -> Vec<I2cTransaction> {
    let mut t = Vec::new();
    t.extend(read_ok(Command::ControlRead, 0x0000));
    t.extend(read_ok(Command::RdacRead, wiper));
    t
}

/// Unlock sequence: enable wiper writes, control readback shows the bit.
fn unlock_ok() -> Vec<I2cTransaction> {
    let mut t = vec![I2cTransaction::write(ADDR, frame(Command::ControlWrite, 0x0002))];
    t.extend(read_ok(Command::ControlRead, 0x0002));
    t
}

fn new_pot(expectations: &[I2cTransaction]) -> Ad5272<I2cMock, NoopDelay> {
    let config = Ad5272Config::with_max_resistance(MAX_OHMS);
    Ad5272::new(I2cMock::new(expectations), NoopDelay, config).unwrap()
}

/// Check every scripted transaction was consumed.
fn finish(pot: Ad5272<I2cMock, NoopDelay>) {
    let (mut i2c, _delay) = pot.release();
    i2c.done();
}

// ---------------------------------------------------------------------------
// Event log shared by a bus and a delay source, to check ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum BusEvent {
    Write(Vec<u8>),
    Read,
    DelayMs(u32),
    DelayNs(u32),
}

type EventLog = Rc<RefCell<Vec<BusEvent>>>;

/// Forwards to the scripted mock and records each transaction.
struct LoggedI2c {
    inner: I2cMock,
    log: EventLog,
}

impl ErrorType for LoggedI2c {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for LoggedI2c {
    async fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(BusEvent::Read);
        embedded_hal_async::i2c::I2c::read(&mut self.inner, address, read).await
    }

    async fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(BusEvent::Write(write.to_vec()));
        embedded_hal_async::i2c::I2c::write(&mut self.inner, address, write).await
    }

    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        embedded_hal_async::i2c::I2c::transaction(&mut self.inner, address, operations).await
    }
}

/// Records every requested delay without waiting.
struct LoggedDelay {
    log: EventLog,
}

impl embedded_hal_async::delay::DelayNs for LoggedDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(BusEvent::DelayNs(ns));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(BusEvent::DelayMs(ms));
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn new_rejects_invalid_config() {
    let mut i2c = I2cMock::new(&[]);
    let config = Ad5272Config::with_max_resistance(500.0);
    let result = Ad5272::new(i2c.clone(), NoopDelay, config);
    assert!(matches!(result, Err(ConfigError::MaxResistanceOutOfRange)));
    i2c.done();
}

#[test]
fn new_generates_no_traffic() {
    let pot = new_pot(&[]);
    assert_eq!(pot.state(), DeviceState::Uninitialized);
    assert_eq!(pot.status_message(), "Initializing...");
    assert!(!pot.is_available());
    assert_eq!(pot.max_resistance(), MAX_OHMS);
    assert_eq!(pot.address(), ADDR);
    finish(pot);
}

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn init_reads_current_wiper() {
    let mut pot = new_pot(&init_ok(300));

    assert_eq!(pot.init().await, DeviceState::Available);
    assert!(pot.is_available());
    assert_eq!(pot.cached_wiper_position(), 300);
    assert_eq!(pot.status_message(), "Initialized Successfully");
    finish(pot);
}

#[tokio::test]
async fn init_falls_back_to_midscale_when_wiper_read_fails() {
    let mut t = Vec::new();
    t.extend(read_ok(Command::ControlRead, 0x0000));
    t.extend(read_err(Command::RdacRead));
    let mut pot = new_pot(&t);

    assert_eq!(pot.init().await, DeviceState::Available);
    assert_eq!(pot.cached_wiper_position(), 512);
    assert_eq!(pot.status_message(), "Initialized Successfully");
    finish(pot);
}

#[tokio::test]
async fn init_without_device_is_unavailable() {
    let t = [I2cTransaction::write(ADDR, frame(Command::ControlRead, 0)).with_error(ErrorKind::Other)];
    let mut pot = new_pot(&t);

    assert_eq!(pot.init().await, DeviceState::Unavailable);
    assert!(!pot.is_available());
    assert_eq!(pot.status_message(), "Device Not Found");

    // Never seen: no bus traffic, sentinel values.
    assert_eq!(pot.current_wiper_position().await, 0);
    assert!(pot.current_resistance().await.is_nan());
    finish(pot);
}

// ---------------------------------------------------------------------------
// set_resistance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_resistance_midscale_scenario() {
    let mut t = init_ok(0);
    t.extend(unlock_ok());
    // 10000 / 20000 * 1023 + 0.5 = 512
    t.push(I2cTransaction::write(ADDR, vec![0x06, 0x00]));
    t.extend(read_ok(Command::RdacRead, 512));
    // current_resistance() re-reads the wiper
    t.extend(read_ok(Command::RdacRead, 512));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.set_resistance(10_000.0).await, Ok(()));
    assert_eq!(pot.cached_wiper_position(), 512);
    assert_eq!(pot.status_message(), "Resistance Set Successfully");

    let ohms = pot.current_resistance().await;
    assert!((ohms - 512.0 / 1023.0 * MAX_OHMS).abs() < 0.01, "got {}", ohms);
    finish(pot);
}

#[tokio::test]
async fn set_resistance_full_scale_writes_1023() {
    let mut t = init_ok(0);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, vec![0x07, 0xFF]));
    t.extend(read_ok(Command::RdacRead, WIPER_MAX));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.set_resistance(MAX_OHMS).await, Ok(()));
    assert_eq!(pot.cached_wiper_position(), WIPER_MAX);
    finish(pot);
}

#[tokio::test]
async fn set_resistance_while_unavailable_fails_without_traffic() {
    let mut pot = new_pot(&[]);
    let before = pot.cached_wiper_position();

    assert_eq!(
        pot.set_resistance(1_000.0).await,
        Err(Ad5272Error::DeviceUnavailable)
    );
    assert_eq!(pot.cached_wiper_position(), before);
    assert_eq!(pot.status_message(), "Device Not Available");
    finish(pot);
}

#[tokio::test]
async fn set_resistance_out_of_range_never_touches_bus() {
    let mut pot = new_pot(&init_ok(100));
    pot.init().await;

    for target in [-5.0, MAX_OHMS + 1.0, f32::NAN] {
        assert_eq!(pot.set_resistance(target).await, Err(Ad5272Error::OutOfRange));
        assert_eq!(pot.status_message(), "Invalid Resistance Value");
        assert_eq!(pot.cached_wiper_position(), 100);
    }
    finish(pot);
}

#[tokio::test]
async fn unlock_readback_without_enable_bit_fails() {
    let mut t = init_ok(100);
    t.push(I2cTransaction::write(ADDR, frame(Command::ControlWrite, 0x0002)));
    t.extend(read_ok(Command::ControlRead, 0x0000));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.set_resistance(5_000.0).await, Err(Ad5272Error::UnlockFailed(None)));
    assert_eq!(pot.status_message(), "RDAC Unlock Failed");
    assert_eq!(pot.cached_wiper_position(), 100);
    // A failed write does not revoke presence.
    assert!(pot.is_available());
    finish(pot);
}

#[tokio::test]
async fn unlock_write_error_fails() {
    let mut t = init_ok(100);
    t.push(
        I2cTransaction::write(ADDR, frame(Command::ControlWrite, 0x0002))
            .with_error(ErrorKind::Other),
    );
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(
        pot.set_resistance(5_000.0).await,
        Err(Ad5272Error::UnlockFailed(Some(ErrorKind::Other)))
    );
    assert_eq!(pot.status_message(), "RDAC Unlock Failed");
    finish(pot);
}

#[tokio::test]
async fn unlock_readback_error_carries_bus_error() {
    let mut t = init_ok(100);
    t.push(I2cTransaction::write(ADDR, frame(Command::ControlWrite, 0x0002)));
    t.extend(read_err(Command::ControlRead));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(
        pot.set_resistance(5_000.0).await,
        Err(Ad5272Error::UnlockFailed(Some(ErrorKind::Other)))
    );
    assert_eq!(pot.cached_wiper_position(), 100);
    finish(pot);
}

#[tokio::test]
async fn rdac_write_error_reports_write_failed() {
    let mut t = init_ok(100);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, vec![0x06, 0x00]).with_error(ErrorKind::Other));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(
        pot.set_resistance(10_000.0).await,
        Err(Ad5272Error::WriteFailed(ErrorKind::Other))
    );
    assert_eq!(pot.status_message(), "Write Failed");
    assert_eq!(pot.cached_wiper_position(), 100);
    finish(pot);
}

#[tokio::test]
async fn verification_mismatch_keeps_previous_position() {
    let mut t = init_ok(100);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, vec![0x06, 0x00]));
    t.extend(read_ok(Command::RdacRead, 511));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(
        pot.set_resistance(10_000.0).await,
        Err(Ad5272Error::VerificationFailed {
            expected: 512,
            read: Some(511)
        })
    );
    assert_eq!(pot.status_message(), "Write Verification Failed");
    assert_eq!(pot.cached_wiper_position(), 100);
    finish(pot);
}

#[tokio::test]
async fn verification_read_error_fails() {
    let mut t = init_ok(100);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, vec![0x06, 0x00]));
    t.extend(read_err(Command::RdacRead));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(
        pot.set_resistance(10_000.0).await,
        Err(Ad5272Error::VerificationFailed {
            expected: 512,
            read: None
        })
    );
    assert_eq!(pot.cached_wiper_position(), 100);
    finish(pot);
}

#[tokio::test]
async fn settling_delays_precede_dependent_reads() {
    let mut t = init_ok(0);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, vec![0x06, 0x00]));
    t.extend(read_ok(Command::RdacRead, 512));

    let log = EventLog::default();
    let i2c = LoggedI2c {
        inner: I2cMock::new(&t),
        log: log.clone(),
    };
    let delay = LoggedDelay { log: log.clone() };
    let config = Ad5272Config::with_max_resistance(MAX_OHMS);
    let mut pot = Ad5272::new(i2c, delay, config).unwrap();

    pot.init().await;
    log.borrow_mut().clear();

    assert_eq!(pot.set_resistance(10_000.0).await, Ok(()));
    assert_eq!(
        *log.borrow(),
        vec![
            // unlock: enable wiper writes, then read back the control register
            BusEvent::Write(vec![0x1C, 0x02]),
            BusEvent::Write(vec![0x20, 0x00]),
            BusEvent::DelayMs(1),
            BusEvent::Read,
            // wiper write, settle, then verify
            BusEvent::Write(vec![0x06, 0x00]),
            BusEvent::DelayMs(10),
            BusEvent::Write(vec![0x08, 0x00]),
            BusEvent::DelayMs(1),
            BusEvent::Read,
        ]
    );

    let (mut i2c, _delay) = pot.release();
    i2c.inner.done();
}

// ---------------------------------------------------------------------------
// set_wiper_position
// ---------------------------------------------------------------------------

#[tokio::test]
async fn set_wiper_position_writes_raw_step() {
    let mut t = init_ok(0);
    t.extend(unlock_ok());
    t.push(I2cTransaction::write(ADDR, frame(Command::RdacWrite, 42)));
    t.extend(read_ok(Command::RdacRead, 42));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.set_wiper_position(42).await, Ok(()));
    assert_eq!(pot.cached_wiper_position(), 42);
    finish(pot);
}

#[tokio::test]
async fn set_wiper_position_rejects_eleven_bit_values() {
    let mut pot = new_pot(&init_ok(7));
    pot.init().await;

    assert_eq!(pot.set_wiper_position(1024).await, Err(Ad5272Error::OutOfRange));
    assert_eq!(pot.status_message(), "Invalid Wiper Position");
    assert_eq!(pot.cached_wiper_position(), 7);
    finish(pot);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reads_update_cache_and_fall_back_on_error() {
    let mut t = init_ok(100);
    t.extend(read_ok(Command::RdacRead, 200));
    t.extend(read_err(Command::RdacRead));
    t.extend(read_err(Command::RdacRead));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.current_wiper_position().await, 200);
    // Stale but valid: the failed read returns the cache.
    assert_eq!(pot.current_wiper_position().await, 200);
    let ohms = pot.current_resistance().await;
    assert!((ohms - 200.0 / 1023.0 * MAX_OHMS).abs() < 0.01);
    finish(pot);
}

#[tokio::test]
async fn strict_read_surfaces_errors() {
    let mut t = init_ok(100);
    t.extend(read_err(Command::RdacRead));
    t.extend(read_ok(Command::RdacRead, 0x3FF));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.read_wiper_position().await, Err(Ad5272Error::I2c(ErrorKind::Other)));
    assert_eq!(pot.cached_wiper_position(), 100);
    assert_eq!(pot.read_wiper_position().await, Ok(0x3FF));
    assert_eq!(pot.cached_wiper_position(), 0x3FF);
    finish(pot);
}

#[tokio::test]
async fn strict_read_requires_availability() {
    let mut pot = new_pot(&[]);
    assert_eq!(pot.read_wiper_position().await, Err(Ad5272Error::DeviceUnavailable));
    finish(pot);
}

#[tokio::test]
async fn response_bits_above_ten_are_ignored() {
    let mut t = init_ok(100);
    t.push(I2cTransaction::write(ADDR, frame(Command::RdacRead, 0)));
    t.push(I2cTransaction::read(ADDR, vec![0xFC, 0x05]));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert_eq!(pot.current_wiper_position().await, 5);
    finish(pot);
}

// ---------------------------------------------------------------------------
// Health checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn started_interval_skips_the_first_poll() {
    let mut t = init_ok(300);
    t.extend(read_ok(Command::ControlRead, 0x0000));
    let mut pot = new_pot(&t);
    pot.init().await;

    let t0 = Instant::from_secs(5);
    pot.start_health_interval(t0);
    assert!(!pot.poll(t0).await);
    assert!(!pot.poll(t0 + Duration::from_secs(30)).await);
    assert!(pot.poll(t0 + Duration::from_secs(31)).await);
    assert!(pot.is_available());
    finish(pot);
}

#[tokio::test]
async fn poll_respects_interval_and_detects_disconnect() {
    let mut t = init_ok(300);
    // First poll always checks.
    t.extend(read_ok(Command::ControlRead, 0x0000));
    // Poll after the interval: device gone.
    t.extend(read_err(Command::ControlRead));
    let mut pot = new_pot(&t);
    pot.init().await;

    let t0 = Instant::from_secs(100);
    assert!(pot.poll(t0).await);
    assert!(!pot.poll(t0 + Duration::from_secs(10)).await);
    assert!(!pot.poll(t0 + Duration::from_secs(30)).await);
    assert!(pot.is_available());

    assert!(pot.poll(t0 + Duration::from_secs(31)).await);
    assert_eq!(pot.state(), DeviceState::Unavailable);
    assert_eq!(pot.status_message(), "Device Disconnected");

    // Previously seen: cached value, no bus traffic.
    assert_eq!(pot.current_wiper_position().await, 300);
    assert!(pot.current_resistance().await.is_nan());
    finish(pot);
}

#[tokio::test]
async fn health_check_is_idempotent_and_recovers() {
    let mut t = init_ok(300);
    t.extend(read_ok(Command::ControlRead, 0x0000));
    t.extend(read_err(Command::ControlRead));
    t.extend(read_err(Command::ControlRead));
    t.extend(read_ok(Command::ControlRead, 0x0000));
    let mut pot = new_pot(&t);
    pot.init().await;

    assert!(pot.check_health().await);
    assert_eq!(pot.status_message(), "Initialized Successfully");
    assert_eq!(pot.cached_wiper_position(), 300);

    assert!(!pot.check_health().await);
    assert!(!pot.check_health().await);
    assert_eq!(pot.status_message(), "Device Disconnected");
    assert_eq!(pot.cached_wiper_position(), 300);

    assert!(pot.check_health().await);
    assert!(pot.is_available());
    assert_eq!(pot.status_message(), "Device Connected");
    assert_eq!(pot.cached_wiper_position(), 300);
    finish(pot);
}
