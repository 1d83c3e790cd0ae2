//! Error types.

use thiserror::Error;

/// Rejected configuration value. Raised by validation, before any query runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be in (0, 1], got {value}")]
    PercentOutOfRange { field: &'static str, value: f32 },

    #[error("{field} must be between {min} and {max} rays per side, got {value}")]
    GridSizeOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("grab_poll_frames must be at least 1")]
    ZeroPollFrames,
}
