//! Device lifecycle state and the human-readable status channel.

/// Presence state of the device as last observed by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// [`init`](crate::Ad5272::init) has not run yet.
    #[default]
    Uninitialized,
    /// The last presence check got no response.
    Unavailable,
    /// The last presence check succeeded.
    Available,
}

/// Status message published on the text telemetry channel.
///
/// Each failure branch of the driver maps to its own variant so observers
/// can tell the causes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    #[default]
    Initializing,
    DeviceNotFound,
    DeviceConnected,
    InitializedSuccessfully,
    DeviceDisconnected,
    DeviceNotAvailable,
    InvalidResistance,
    InvalidPosition,
    UnlockFailed,
    WriteFailed,
    VerificationFailed,
    ResistanceSet,
}

impl Status {
    /// Text form of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Initializing => "Initializing...",
            Status::DeviceNotFound => "Device Not Found",
            Status::DeviceConnected => "Device Connected",
            Status::InitializedSuccessfully => "Initialized Successfully",
            Status::DeviceDisconnected => "Device Disconnected",
            Status::DeviceNotAvailable => "Device Not Available",
            Status::InvalidResistance => "Invalid Resistance Value",
            Status::InvalidPosition => "Invalid Wiper Position",
            Status::UnlockFailed => "RDAC Unlock Failed",
            Status::WriteFailed => "Write Failed",
            Status::VerificationFailed => "Write Verification Failed",
            Status::ResistanceSet => "Resistance Set Successfully",
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 12] = [
        Status::Initializing,
        Status::DeviceNotFound,
        Status::DeviceConnected,
        Status::InitializedSuccessfully,
        Status::DeviceDisconnected,
        Status::DeviceNotAvailable,
        Status::InvalidResistance,
        Status::InvalidPosition,
        Status::UnlockFailed,
        Status::WriteFailed,
        Status::VerificationFailed,
        Status::ResistanceSet,
    ];

    #[test]
    fn messages_are_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str(), "{:?} and {:?} share a message", a, b);
            }
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(Status::default().as_str(), "Initializing...");
        assert_eq!(DeviceState::default(), DeviceState::Uninitialized);
    }
}
