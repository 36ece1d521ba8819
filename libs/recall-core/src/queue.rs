//! Due-card selection.

use chrono::{DateTime, Utc};

use crate::types::CardSchedule;

/// Anything that carries a next-review timestamp.
pub trait Schedulable {
    /// When the item is next due, or `None` if it has never been scheduled.
    fn next_review(&self) -> Option<DateTime<Utc>>;

    /// Whether the item should be shown at `now`. Unscheduled items are due.
    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review().map_or(true, |due| due <= now)
    }
}

impl Schedulable for CardSchedule {
    fn next_review(&self) -> Option<DateTime<Utc>> {
        self.next_review
    }
}

impl<T: Schedulable + ?Sized> Schedulable for &T {
    fn next_review(&self) -> Option<DateTime<Utc>> {
        (**self).next_review()
    }
}

/// Cards due at `now`, in their original order.
///
/// The iterator is lazy and can be cloned to walk the selection again.
pub fn due_flashcards<T: Schedulable>(
    cards: &[T],
    now: DateTime<Utc>,
) -> impl Iterator<Item = &T> + Clone + '_ {
    cards.iter().filter(move |card| card.is_due(now))
}
