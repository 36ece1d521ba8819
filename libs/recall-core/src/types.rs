//! Core types for review scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Lowest grade on the review scale (total failure to recall).
pub const MIN_QUALITY: f64 = 0.0;

/// Highest grade on the review scale (perfect, effortless recall).
pub const MAX_QUALITY: f64 = 5.0;

/// Grades below this are lapses.
pub const PASSING_QUALITY: f64 = 3.0;

/// Ease factor floor. Below this the interval growth degenerates.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor given to a card on its first review.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Longest interval the scheduler will hand out, roughly a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// A review grade on the 0-5 scale.
///
/// Construction clamps finite values into range, so every `Quality` is valid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Quality(f64);

impl Quality {
    /// Clamp `value` into `[0, 5]`. NaN is rejected.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(ScheduleError::InvalidQuality(value));
        }
        Ok(Self(value.clamp(MIN_QUALITY, MAX_QUALITY)))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// True when the grade resets the repetition streak.
    pub fn is_lapse(self) -> bool {
        self.0 < PASSING_QUALITY
    }
}

impl TryFrom<f64> for Quality {
    type Error = ScheduleError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for f64 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Scheduling state of one flashcard for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSchedule {
    /// Days until the next review.
    pub interval: u32,
    /// Consecutive passing reviews since the last lapse.
    pub repetitions: u32,
    pub ease_factor: f64,
    /// `None` until the card has been reviewed once.
    pub next_review: Option<DateTime<Utc>>,
}

impl CardSchedule {
    /// State of a card that has never been reviewed.
    pub fn seed() -> Self {
        Self {
            interval: 1,
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            next_review: None,
        }
    }

    /// Check the invariants a persisted schedule must hold.
    ///
    /// A schedule that fails here has been corrupted somewhere upstream and
    /// must not be silently replaced with the seed.
    pub fn validate(&self) -> Result<()> {
        if !self.ease_factor.is_finite() {
            return Err(ScheduleError::InvalidSchedule(format!(
                "ease factor is not finite: {}",
                self.ease_factor
            )));
        }
        if self.ease_factor < MIN_EASE_FACTOR {
            return Err(ScheduleError::InvalidSchedule(format!(
                "ease factor {} is below {}",
                self.ease_factor, MIN_EASE_FACTOR
            )));
        }
        if self.interval == 0 {
            return Err(ScheduleError::InvalidSchedule(
                "interval must be at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CardSchedule {
    fn default() -> Self {
        Self::seed()
    }
}

/// A single past review, as consumed by the statistics aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub quality: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate figures over a learner's review history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatistics {
    pub total: usize,
    /// Mean grade, rounded to two decimals.
    pub average_quality: f64,
    /// Percentage of passing reviews, rounded to the nearest integer.
    pub retention: u32,
    pub streak_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quality_clamps_out_of_range() {
        assert_eq!(Quality::new(7.0).unwrap().value(), 5.0);
        assert_eq!(Quality::new(-2.0).unwrap().value(), 0.0);
        assert_eq!(Quality::new(3.5).unwrap().value(), 3.5);
    }

    #[test]
    fn quality_rejects_nan() {
        assert!(matches!(
            Quality::new(f64::NAN),
            Err(ScheduleError::InvalidQuality(_))
        ));
    }

    #[test]
    fn quality_lapse_threshold() {
        assert!(Quality::new(2.9).unwrap().is_lapse());
        assert!(!Quality::new(3.0).unwrap().is_lapse());
    }

    #[test]
    fn quality_deserializes_with_clamping() {
        let quality: Quality = serde_json::from_str("9").unwrap();
        assert_eq!(quality.value(), 5.0);
        assert!(serde_json::from_str::<Quality>("\"four\"").is_err());
    }

    #[test]
    fn seed_matches_sm2_defaults() {
        let seed = CardSchedule::seed();
        assert_eq!(seed.interval, 1);
        assert_eq!(seed.repetitions, 0);
        assert_eq!(seed.ease_factor, 2.5);
        assert_eq!(seed.next_review, None);
        assert_eq!(CardSchedule::default(), seed);
    }

    #[test]
    fn schedule_serializes_camel_case() {
        let json = serde_json::to_value(CardSchedule::seed()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "interval": 1,
                "repetitions": 0,
                "easeFactor": 2.5,
                "nextReview": null
            })
        );
    }

    #[test]
    fn schedule_missing_field_fails_to_deserialize() {
        let result = serde_json::from_str::<CardSchedule>(r#"{"interval": 1, "repetitions": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_corrupt_schedules() {
        let mut schedule = CardSchedule::seed();
        assert!(schedule.validate().is_ok());

        schedule.ease_factor = f64::INFINITY;
        assert!(schedule.validate().is_err());

        schedule.ease_factor = 1.0;
        assert!(schedule.validate().is_err());

        schedule.ease_factor = 2.5;
        schedule.interval = 0;
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn statistics_default_is_zeroed() {
        let stats = ReviewStatistics::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_quality, 0.0);
        assert_eq!(stats.retention, 0);
        assert_eq!(stats.streak_days, 0);
    }
}
