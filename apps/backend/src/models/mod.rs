//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from recall-core
pub use recall_core::{CardSchedule, Quality, ReviewEvent, ReviewStatistics, Schedulable};

use recall_core::types::MAX_INTERVAL_DAYS;
use recall_core::ScheduleError;

// === Database Entity Types ===

/// Registered learner. Carries the token hash, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Learner {
    pub id: Uuid,
    pub token_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Flashcard stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFlashcard {
    pub id: String,
    pub learner_id: Uuid,
    pub subject: Option<String>,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbFlashcard {
    /// Convert to API flashcard with the seed schedule.
    pub fn to_api_flashcard(&self) -> Flashcard {
        Flashcard {
            id: self.id.clone(),
            subject: self.subject.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
            schedule: CardSchedule::seed(),
        }
    }
}

/// Flashcard joined with its schedule row, which is absent until the first review
#[derive(Debug, Clone, FromRow)]
pub struct DbScheduledFlashcard {
    pub id: String,
    pub subject: Option<String>,
    pub front: String,
    pub back: String,
    pub interval_days: Option<i32>,
    pub repetitions: Option<i32>,
    pub ease_factor: Option<f64>,
    pub next_review: Option<DateTime<Utc>>,
}

impl DbScheduledFlashcard {
    /// Convert to API flashcard, seeding the schedule when none is stored.
    pub fn to_api_flashcard(&self) -> Result<Flashcard, ScheduleError> {
        let schedule = match (self.interval_days, self.repetitions, self.ease_factor) {
            (Some(interval_days), Some(repetitions), Some(ease_factor)) => schedule_from_columns(
                interval_days,
                repetitions,
                ease_factor,
                self.next_review,
            )?,
            (None, None, None) => CardSchedule::seed(),
            _ => {
                return Err(ScheduleError::InvalidSchedule(format!(
                    "card {} has a partial schedule row",
                    self.id
                )))
            }
        };

        Ok(Flashcard {
            id: self.id.clone(),
            subject: self.subject.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
            schedule,
        })
    }
}

/// Card schedule in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardSchedule {
    pub card_id: String,
    pub learner_id: Uuid,
    pub interval_days: i32,
    pub repetitions: i32,
    pub ease_factor: f64,
    pub next_review: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl DbCardSchedule {
    /// Create from recall-core CardSchedule
    pub fn from_core_schedule(card_id: &str, learner_id: Uuid, schedule: &CardSchedule) -> Self {
        Self {
            card_id: card_id.to_string(),
            learner_id,
            interval_days: interval_to_i32(schedule.interval),
            repetitions: clamp_to_i32(schedule.repetitions),
            ease_factor: schedule.ease_factor,
            next_review: schedule.next_review,
            updated_at: Utc::now(),
        }
    }

    /// Convert to recall-core CardSchedule, rejecting corrupt rows.
    pub fn to_core_schedule(&self) -> Result<CardSchedule, ScheduleError> {
        schedule_from_columns(
            self.interval_days,
            self.repetitions,
            self.ease_factor,
            self.next_review,
        )
    }
}

fn schedule_from_columns(
    interval_days: i32,
    repetitions: i32,
    ease_factor: f64,
    next_review: Option<DateTime<Utc>>,
) -> Result<CardSchedule, ScheduleError> {
    let interval = u32::try_from(interval_days).map_err(|_| {
        ScheduleError::InvalidSchedule(format!("negative interval: {interval_days}"))
    })?;
    let repetitions = u32::try_from(repetitions).map_err(|_| {
        ScheduleError::InvalidSchedule(format!("negative repetitions: {repetitions}"))
    })?;

    let schedule = CardSchedule {
        interval,
        repetitions,
        ease_factor,
        next_review,
    };
    schedule.validate()?;
    Ok(schedule)
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Interval column value, held to the same ceiling the scheduler uses.
fn interval_to_i32(interval: u32) -> i32 {
    clamp_to_i32(interval.min(MAX_INTERVAL_DAYS))
}

/// Review record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub card_id: String,
    pub learner_id: Uuid,
    pub quality: f64,
    pub interval_before: i32,
    pub interval_after: i32,
    pub ease_before: f64,
    pub ease_after: f64,
    pub repetitions_after: i32,
    pub created_at: DateTime<Utc>,
}

impl DbReview {
    /// Build the log entry for a review that moved `before` to `after`.
    pub fn from_transition(
        card_id: &str,
        learner_id: Uuid,
        quality: Quality,
        before: &CardSchedule,
        after: &CardSchedule,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id: card_id.to_string(),
            learner_id,
            quality: quality.value(),
            interval_before: interval_to_i32(before.interval),
            interval_after: interval_to_i32(after.interval),
            ease_before: before.ease_factor,
            ease_after: after.ease_factor,
            repetitions_after: clamp_to_i32(after.repetitions),
            created_at: reviewed_at,
        }
    }

    /// Convert to the event shape consumed by the statistics aggregator.
    pub fn to_event(&self) -> ReviewEvent {
        ReviewEvent {
            quality: self.quality,
            created_at: self.created_at,
        }
    }
}

/// Schedule before and after a persisted review
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub before: CardSchedule,
    pub after: CardSchedule,
}

// === API Request/Response Types ===

/// Flashcard with its current schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub subject: Option<String>,
    pub front: String,
    pub back: String,
    pub schedule: CardSchedule,
}

impl Schedulable for Flashcard {
    fn next_review(&self) -> Option<DateTime<Utc>> {
        self.schedule.next_review
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterLearnerRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterLearnerResponse {
    pub learner_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerStatusResponse {
    pub learner_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

// Flashcard types
#[derive(Debug, Serialize, Deserialize)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFlashcardsRequest {
    pub subject: Option<String>,
    pub cards: Vec<NewFlashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardListResponse {
    pub cards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectQuery {
    pub subject: Option<String>,
}

// Review types
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub card_id: String,
    pub quality_rating: Quality,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub success: bool,
    pub next_review: DateTime<Utc>,
    pub schedule: CardSchedule,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCardsResponse {
    pub due_cards: Vec<Flashcard>,
    pub total_cards: usize,
    pub study_streak: u32,
}
