//! Register, address and timing constants for the AD5272/AD5274.
//!
//! Every transfer is a single 16-bit frame sent MSB first:
//!
//! ```text
//!  15 14 | 13 12 11 10 | 9 8 7 6 5 4 3 2 1 0
//!   0  0 |   command   |        data
//! ```

// ---------------------------------------------------------------------------
// Bus addresses (ADDR pin strapping)
// ---------------------------------------------------------------------------

/// ADDR pin tied to GND.
pub const ADDRESS_GND: u8 = 0x2F;

/// ADDR pin tied to VDD.
pub const ADDRESS_VDD: u8 = 0x2C;

/// ADDR pin left floating (unipolar supply only).
pub const ADDRESS_FLOAT: u8 = 0x2E;

/// Default I2C address used when nothing else is configured.
pub const DEFAULT_ADDRESS: u8 = ADDRESS_GND;

// ---------------------------------------------------------------------------
// Control register bits
// ---------------------------------------------------------------------------

/// Allows programming the 50-TP memory.
pub const CONTROL_OTP_WRITE_ENABLE: u16 = 0x01;

/// Allows updating the wiper position through the RDAC register.
/// Cleared on power-up, so every write sequence must set it first.
pub const CONTROL_RDAC_WRITE_ENABLE: u16 = 0x02;

/// Disables the resistor performance (calibration) mode.
pub const CONTROL_RDAC_CALIBRATION_DISABLE: u16 = 0x04;

/// Set by the device after a successful 50-TP fuse program.
pub const CONTROL_OTP_WRITE_SUCCESS: u16 = 0x08;

// ---------------------------------------------------------------------------
// Frame layout
// ---------------------------------------------------------------------------

/// Mask selecting the 10-bit data field of a frame.
pub const DATA_MASK: u16 = 0x3FF;

/// Bit offset of the 4-bit command field.
pub const COMMAND_SHIFT: u16 = 10;

/// Highest addressable wiper step (1024 taps, 10 bits).
pub const WIPER_MAX: u16 = 1023;

/// Wiper position assumed when the power-on value cannot be read back.
pub const WIPER_MIDSCALE: u16 = 512;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Settling time between a command frame and the read that follows it.
pub const READ_DELAY_MS: u32 = 1;

/// Settling time between an RDAC write and its verification read.
pub const VERIFY_DELAY_MS: u32 = 10;

/// Default interval between presence re-checks.
pub const HEALTH_CHECK_INTERVAL_SECS: u64 = 30;
