//! Command frame encoding and response decoding.
//!
//! Pure transformations only; nothing here touches the bus.

use crate::registers::{COMMAND_SHIFT, DATA_MASK};

/// AD5272/AD5274 command codes (bits 13:10 of a frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    Nop = 0x00,
    RdacWrite = 0x01,
    RdacRead = 0x02,
    OtpWrite = 0x03,
    RdacRefresh = 0x04,
    OtpWiperRead = 0x05,
    OtpLastUsed = 0x06,
    ControlWrite = 0x07,
    ControlRead = 0x08,
    Shutdown = 0x09,
}

impl Command {
    /// Raw 4-bit command code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// A 16-bit command frame: `00 | command(4) | data(10)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WireWord(u16);

impl WireWord {
    /// Build a frame. Data above 10 bits is masked off rather than rejected,
    /// matching how the part itself ignores the excess bits.
    pub const fn new(command: Command, data: u16) -> Self {
        Self(((command as u16) << COMMAND_SHIFT) | (data & DATA_MASK))
    }

    /// Raw 16-bit value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Bytes as sent on the wire (MSB first).
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Encode `command` and `data` into the two bytes sent on the bus.
pub const fn encode(command: Command, data: u16) -> [u8; 2] {
    WireWord::new(command, data).to_bytes()
}

/// Decode a two-byte response into its 10-bit payload.
///
/// Applied to every read regardless of which register was addressed; the
/// caller knows whether the bits are a wiper position or control flags.
pub const fn decode(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes) & DATA_MASK
}

// ── Unit Tests ───────────────────────────────────────────────────────
