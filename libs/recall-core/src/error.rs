//! Error types for recall-core.

use thiserror::Error;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised when scheduler inputs are structurally invalid.
///
/// Out-of-range quality ratings are not errors; they are clamped.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("quality rating is not a number: {0}")]
    InvalidQuality(f64),

    #[error("invalid card schedule: {0}")]
    InvalidSchedule(String),
}
