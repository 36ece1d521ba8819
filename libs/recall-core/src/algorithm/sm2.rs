//! SM-2 spaced repetition algorithm.
//!
//! SuperMemo 2 with its canonical constants. The ease factor is updated on
//! every review, lapses included, so repeated failures keep shrinking future
//! intervals even though the interval itself restarts at one day.

use super::SpacedRepetitionAlgorithm;
use crate::types::{CardSchedule, Quality, MAX_INTERVAL_DAYS, MAX_QUALITY, MIN_EASE_FACTOR};
use chrono::{DateTime, Duration, Utc};

/// Interval after the first passing review.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive passing review.
const SECOND_INTERVAL: u32 = 6;

/// SM-2 scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sm2;

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_schedule(&self) -> CardSchedule {
        CardSchedule::seed()
    }

    fn schedule(&self, current: &CardSchedule, quality: Quality, now: DateTime<Utc>) -> CardSchedule {
        let ease_factor = next_ease_factor(current.ease_factor, quality);

        let (interval, repetitions) = if quality.is_lapse() {
            (FIRST_INTERVAL, 0)
        } else {
            let repetitions = current.repetitions.saturating_add(1);
            let interval = match repetitions {
                1 => FIRST_INTERVAL,
                2 => SECOND_INTERVAL,
                _ => grown_interval(current.interval, ease_factor),
            };
            (interval, repetitions)
        };

        CardSchedule {
            interval,
            repetitions,
            ease_factor,
            next_review: Some(review_date(now, interval)),
        }
    }
}

/// round(interval * EF), capped at [`MAX_INTERVAL_DAYS`].
fn grown_interval(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).round();
    grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
}

/// `now + interval` days, saturating at the latest representable instant.
fn review_date(now: DateTime<Utc>, interval: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let miss = MAX_QUALITY - quality.value();
    (ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Schedule the next review as of now.
pub fn calculate_next_review(quality: Quality, current: &CardSchedule) -> CardSchedule {
    calculate_next_review_at(quality, current, Utc::now())
}

/// Schedule the next review as of `now`.
pub fn calculate_next_review_at(
    quality: Quality,
    current: &CardSchedule,
    now: DateTime<Utc>,
) -> CardSchedule {
    Sm2.schedule(current, quality, now)
}
