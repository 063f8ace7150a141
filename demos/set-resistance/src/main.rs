//! Set-resistance example
//!
//! Demonstrates the ad5272-driver crate on the Raspberry Pi Pico 2. Steps
//! the potentiometer through a few resistances while a health task keeps
//! the availability up to date and a telemetry task logs every channel
//! via defmt.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                        |
//! |-----------|------------|------------------------------|
//! | I2C0 SDA  | GP20       |                              |
//! | I2C0 SCL  | GP21       |                              |
//! | ADDR      | —          | Tied to GND → 0x2F           |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ad5272_driver::{
    health_check_task, telemetry_task, AddressPin, Ad5272, Ad5272Config, Observable, Reading,
    TelemetryObserver, TelemetrySink,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

type PotI2c = I2c<'static, I2C0, i2c::Async>;
type SharedPot = Mutex<CriticalSectionRawMutex, Ad5272<PotI2c, Delay>>;

static POT: StaticCell<SharedPot> = StaticCell::new();

/// Targets stepped through by the main loop (ohms).
const TARGETS: [f32; 4] = [0.0, 5_000.0, 10_000.0, 20_000.0];

// ---------------------------------------------------------------------------
// Telemetry sink
// ---------------------------------------------------------------------------

struct LogSink;

impl TelemetrySink for LogSink {
    fn publish(&mut self, reading: Reading) {
        match reading {
            Reading::Resistance(ohms) => info!("Resistance: {} ohm", ohms),
            Reading::WiperPosition(position) => info!("Wiper position: {}", position),
            Reading::Availability(available) => info!("Device available: {}", available),
            Reading::Status(status) => info!("Status: {}", status),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Concrete wrapper around the generic `health_check_task`.
#[embassy_executor::task]
async fn health_task(pot: &'static SharedPot) {
    health_check_task(pot, Duration::from_secs(1)).await;
}

#[embassy_executor::task]
async fn log_task(pot: &'static SharedPot) {
    let observers = [
        TelemetryObserver::new(pot, Observable::Resistance),
        TelemetryObserver::new(pot, Observable::WiperPosition),
        TelemetryObserver::new(pot, Observable::Availability),
        TelemetryObserver::new(pot, Observable::StatusText),
    ];
    telemetry_task(&observers, &mut LogSink, Duration::from_secs(10)).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    // --- Potentiometer (20 kΩ part, ADDR to GND) ---
    let config = Ad5272Config::with_max_resistance(20_000.0).with_address_pin(AddressPin::Gnd);
    let pot = match Ad5272::new(i2c, Delay, config) {
        Ok(pot) => POT.init(Mutex::new(pot)),
        Err(e) => {
            error!("Invalid potentiometer config: {}", e);
            return;
        }
    };

    // The health task runs init() before its first poll.
    spawner.spawn(health_task(pot)).unwrap();
    spawner.spawn(log_task(pot)).unwrap();

    info!("Set-resistance example started");

    // Main loop: step through the targets, one every 5 s. Failures are
    // logged and the next target is tried; the driver never retries.
    loop {
        for target in TARGETS {
            Timer::after(Duration::from_secs(5)).await;

            let result = pot.lock().await.set_resistance(target).await;
            match result {
                Ok(()) => info!("Set {} ohm", target),
                Err(e) => error!("Set {} ohm failed: {}", target, e),
            }
        }
    }
}
