//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{CardSchedule, Quality};
use chrono::{DateTime, Utc};

pub use sm2::{calculate_next_review, calculate_next_review_at, Sm2};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next schedule after a review graded `quality` at `now`.
    fn schedule(&self, current: &CardSchedule, quality: Quality, now: DateTime<Utc>) -> CardSchedule;

    /// Schedule for a card that has never been reviewed.
    fn initial_schedule(&self) -> CardSchedule;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(Sm2)),
        _ => None,
    }
}
