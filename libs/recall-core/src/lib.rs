//! Core review scheduling library used by the backend.
//!
//! Provides:
//! - SM-2 spaced repetition scheduling
//! - Due-card selection
//! - Review history statistics
//! - Shared types (CardSchedule, Quality, ReviewEvent, etc.)
//!
//! Everything here is pure: no I/O, no shared state.

pub mod algorithm;
pub mod error;
pub mod queue;
pub mod stats;
pub mod types;

pub use algorithm::{
    calculate_next_review, calculate_next_review_at, get_algorithm, Sm2,
    SpacedRepetitionAlgorithm,
};
pub use error::{Result, ScheduleError};
pub use queue::{due_flashcards, Schedulable};
pub use stats::{streak_days, study_statistics};
pub use types::{CardSchedule, Quality, ReviewEvent, ReviewStatistics};
