//! Error types for the receiver and bridge
use thiserror::Error;

/// Reasons a universe subscription is rejected.
///
/// Each variant names the field that failed so callers can report or skip the entry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Universe number outside 1-63999
    #[error("invalid universe number: {0}, valid range is 1-63999")]
    InvalidUniverse(u16),

    /// Universe size outside 1-512
    #[error("invalid number of channels: {0}, valid range is 1-512")]
    InvalidChannelCount(u16),

    /// Start channel outside the universe
    #[error("invalid start channel: {start}; valid range is 1-{channels}")]
    InvalidStartChannel { start: u16, channels: u16 },

    /// Window length outside the universe
    #[error("invalid fixture channel count: {length}; valid range is 1-{channels}")]
    InvalidWindowLength { length: u16, channels: u16 },

    /// Window runs past the last channel of the universe
    #[error("start channel {start} with {length} channels ends past channel {channels}")]
    WindowOverflow { start: u16, length: u16, channels: u16 },
}

/// Receiver and fixture errors
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Universe rejected at registration
    #[error("Invalid universe: {0}")]
    Validation(#[from] ValidationError),

    /// Universe is not registered
    #[error("Universe {0} not found")]
    UniverseNotFound(u16),

    /// Transport could not be brought up; the receiver stays idle
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// Transport failed after start
    #[error("Transport error: {0}")]
    TransportError(String),

    /// `start()` called on a receiver that has already left the idle state
    #[error("Receiver already started")]
    AlreadyStarted,

    /// Background worker could not be spawned or panicked
    #[error("Worker error: {0}")]
    WorkerError(String),

    /// Actuator bridge error
    #[error("Bridge error: {0}")]
    BridgeError(String),

    /// Configuration loading error
    #[error("Config error: {0}")]
    ConfigError(#[from] fixture_core::ConfigError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::WindowOverflow {
            start: 510,
            length: 5,
            channels: 512,
        };
        let msg = err.to_string();
        assert!(msg.contains("510"));
        assert!(msg.contains("512"));
    }

    #[test]
    fn test_validation_converts_to_fixture_error() {
        let err: FixtureError = ValidationError::InvalidUniverse(0).into();
        assert!(matches!(
            err,
            FixtureError::Validation(ValidationError::InvalidUniverse(0))
        ));
        assert_eq!(
            err.to_string(),
            "Invalid universe: invalid universe number: 0, valid range is 1-63999"
        );
    }
}
