//! Review history aggregation.

use chrono::{DateTime, Utc};

use crate::types::{ReviewEvent, ReviewStatistics, PASSING_QUALITY};

/// Summarise a learner's review history as of `now`.
///
/// Events may arrive in any order. Days are UTC calendar days.
pub fn study_statistics(events: &[ReviewEvent], now: DateTime<Utc>) -> ReviewStatistics {
    let total = events.len();
    if total == 0 {
        return ReviewStatistics::default();
    }

    let quality_sum: f64 = events.iter().map(|e| e.quality).sum();
    let average_quality = quality_sum / total as f64;
    let passing = events.iter().filter(|e| e.quality >= PASSING_QUALITY).count();
    let retention = (passing as f64 / total as f64) * 100.0;

    ReviewStatistics {
        total,
        average_quality: (average_quality * 100.0).round() / 100.0,
        retention: retention.round() as u32,
        streak_days: streak_days(events.iter().map(|e| e.created_at), now),
    }
}

/// Consecutive days with at least one review, counting back from today.
///
/// Walks review times newest first. A review on the expected day offset
/// extends the streak, a later offset ends it, and an offset already counted
/// (another review that day, or a future timestamp) is skipped. One timestamp
/// per day is enough input.
pub fn streak_days<I>(reviewed_at: I, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut sorted: Vec<DateTime<Utc>> = reviewed_at.into_iter().collect();
    sorted.sort_by(|a, b| b.cmp(a));

    let today = now.date_naive();
    let mut streak: u32 = 0;

    for at in sorted {
        let offset = (today - at.date_naive()).num_days();
        if offset == i64::from(streak) {
            streak += 1;
        } else if offset > i64::from(streak) {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn event(quality: f64, days_ago: i64) -> ReviewEvent {
        ReviewEvent {
            quality,
            created_at: noon() - Duration::days(days_ago),
        }
    }

    #[test]
    fn empty_history_is_all_zero() {
        assert_eq!(
            study_statistics(&[], noon()),
            ReviewStatistics {
                total: 0,
                average_quality: 0.0,
                retention: 0,
                streak_days: 0,
            }
        );
    }

    #[test]
    fn averages_and_retention() {
        let events = vec![event(5.0, 0), event(4.0, 0), event(2.0, 1)];
        let stats = study_statistics(&events, noon());
        assert_eq!(stats.total, 3);
        // 11 / 3 = 3.666..
        assert_eq!(stats.average_quality, 3.67);
        // 2 / 3 = 66.6..%
        assert_eq!(stats.retention, 67);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let events = vec![event(4.0, 0), event(4.0, 1), event(4.0, 3)];
        assert_eq!(study_statistics(&events, noon()).streak_days, 2);
    }

    #[test]
    fn streak_ignores_input_order_and_repeat_days() {
        let events = vec![
            event(3.0, 2),
            event(5.0, 0),
            event(1.0, 1),
            event(4.0, 0),
            event(4.0, 1),
        ];
        assert_eq!(study_statistics(&events, noon()).streak_days, 3);
    }

    #[test]
    fn streak_is_zero_without_a_review_today() {
        let events = vec![event(4.0, 1), event(4.0, 2)];
        assert_eq!(study_statistics(&events, noon()).streak_days, 0);
    }

    #[test]
    fn streak_uses_calendar_days_not_elapsed_hours() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 0, 30, 0).unwrap();
        let events = vec![
            ReviewEvent {
                quality: 4.0,
                created_at: Utc.with_ymd_and_hms(2026, 3, 14, 0, 10, 0).unwrap(),
            },
            ReviewEvent {
                quality: 4.0,
                created_at: Utc.with_ymd_and_hms(2026, 3, 13, 23, 50, 0).unwrap(),
            },
        ];
        assert_eq!(study_statistics(&events, now).streak_days, 2);
    }

    #[test]
    fn streak_from_one_timestamp_per_day() {
        let days = [0, 1, 2, 4].map(|d| noon() - Duration::days(d));
        assert_eq!(streak_days(days, noon()), 3);
        assert_eq!(streak_days(Vec::new(), noon()), 0);
    }

    #[test]
    fn future_reviews_do_not_break_the_streak() {
        let events = vec![event(4.0, -1), event(4.0, 0)];
        assert_eq!(study_statistics(&events, noon()).streak_days, 1);
    }
}
