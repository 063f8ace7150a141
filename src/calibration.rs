//! Linear mapping between resistance (ohms) and wiper step.
//!
//! The part has a fixed 1024-tap resolution, so both directions are anchored
//! to [`WIPER_MAX`] as the full-scale step.

use crate::registers::WIPER_MAX;

/// Convert a target resistance to the nearest wiper step.
///
/// Rounds half-up and clamps to [`WIPER_MAX`]. Negative targets are
/// expected to be rejected by the caller; if one slips through the float
/// to integer cast saturates it to 0.
pub fn resistance_to_position(target_ohms: f32, max_ohms: f32) -> u16 {
    let ratio = target_ohms / max_ohms;
    let position = (ratio * WIPER_MAX as f32 + 0.5) as u16;
    position.min(WIPER_MAX)
}

/// Convert a wiper step to the resistance it selects.
pub fn position_to_resistance(position: u16, max_ohms: f32) -> f32 {
    (position as f32 / WIPER_MAX as f32) * max_ohms
}

// ── Unit Tests ───────────────────────────────────────────────────────
