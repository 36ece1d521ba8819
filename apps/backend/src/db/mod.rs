//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use recall_core::SpacedRepetitionAlgorithm;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::services::token::{generate_token, hash_token};

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects when first used
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Learner Repository ===

    /// Create a new learner. Returns the learner and the plaintext token,
    /// which is not recoverable afterwards.
    pub async fn create_learner(&self, name: Option<&str>) -> Result<(Learner, String)> {
        let token = generate_token();
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            INSERT INTO learners (token_hash, name)
            VALUES ($1, $2)
            RETURNING id, token_hash, name, created_at, last_seen_at
            "#,
        )
        .bind(hash_token(&token))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok((learner, token))
    }

    /// Get learner by bearer token
    pub async fn get_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM learners
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Get learner by ID
    pub async fn get_learner(&self, learner_id: Uuid) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, token_hash, name, created_at, last_seen_at
            FROM learners
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }

    /// Update learner last_seen_at timestamp
    pub async fn update_last_seen(&self, learner_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE learners
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(learner_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Flashcard Repository ===

    /// Insert a batch of flashcards for a learner
    pub async fn insert_flashcards(
        &self,
        learner_id: Uuid,
        subject: Option<&str>,
        cards: &[NewFlashcard],
    ) -> Result<Vec<DbFlashcard>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(cards.len());

        for card in cards {
            let row = sqlx::query_as::<_, DbFlashcard>(
                r#"
                INSERT INTO flashcards (id, learner_id, subject, front, back)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, learner_id, subject, front, back, created_at, updated_at
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(learner_id)
            .bind(subject)
            .bind(&card.front)
            .bind(&card.back)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Get a learner's flashcards with schedules, optionally filtered by subject
    pub async fn get_flashcards(
        &self,
        learner_id: Uuid,
        subject: Option<&str>,
    ) -> Result<Vec<DbScheduledFlashcard>> {
        let cards = sqlx::query_as::<_, DbScheduledFlashcard>(
            r#"
            SELECT f.id, f.subject, f.front, f.back,
                   s.interval_days, s.repetitions, s.ease_factor, s.next_review
            FROM flashcards f
            LEFT JOIN card_schedules s ON s.card_id = f.id
            WHERE f.learner_id = $1 AND ($2::TEXT IS NULL OR f.subject = $2)
            ORDER BY f.created_at, f.id
            "#,
        )
        .bind(learner_id)
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Card Schedule Repository ===

    /// Get the stored schedule for a card
    pub async fn get_card_schedule(&self, card_id: &str) -> Result<Option<DbCardSchedule>> {
        let schedule = sqlx::query_as::<_, DbCardSchedule>(
            r#"
            SELECT card_id, learner_id, interval_days, repetitions, ease_factor,
                   next_review, updated_at
            FROM card_schedules
            WHERE card_id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Apply a review to a card: load its schedule, compute the next one and
    /// persist both the schedule and the review log entry.
    ///
    /// The card row is locked for the whole transaction so concurrent reviews
    /// of the same card serialise instead of overwriting each other.
    /// Returns `None` if the learner owns no such card.
    pub async fn review_card(
        &self,
        learner_id: Uuid,
        card_id: &str,
        quality: Quality,
        algorithm: &dyn SpacedRepetitionAlgorithm,
        now: DateTime<Utc>,
    ) -> Result<Option<ReviewOutcome>> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<String> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM flashcards
            WHERE id = $1 AND learner_id = $2
            FOR UPDATE
            "#,
        )
        .bind(card_id)
        .bind(learner_id)
        .fetch_optional(&mut *tx)
        .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let stored = sqlx::query_as::<_, DbCardSchedule>(
            r#"
            SELECT card_id, learner_id, interval_days, repetitions, ease_factor,
                   next_review, updated_at
            FROM card_schedules
            WHERE card_id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&mut *tx)
        .await?;

        let before = match stored {
            Some(row) => row.to_core_schedule()?,
            None => algorithm.initial_schedule(),
        };
        let after = algorithm.schedule(&before, quality, now);

        let row = DbCardSchedule::from_core_schedule(card_id, learner_id, &after);
        sqlx::query(
            r#"
            INSERT INTO card_schedules (card_id, learner_id, interval_days, repetitions,
                                        ease_factor, next_review)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (card_id) DO UPDATE SET
                interval_days = EXCLUDED.interval_days,
                repetitions = EXCLUDED.repetitions,
                ease_factor = EXCLUDED.ease_factor,
                next_review = EXCLUDED.next_review,
                updated_at = NOW()
            "#,
        )
        .bind(&row.card_id)
        .bind(row.learner_id)
        .bind(row.interval_days)
        .bind(row.repetitions)
        .bind(row.ease_factor)
        .bind(row.next_review)
        .execute(&mut *tx)
        .await?;

        let review = DbReview::from_transition(card_id, learner_id, quality, &before, &after, now);
        sqlx::query(
            r#"
            INSERT INTO reviews (id, card_id, learner_id, quality, interval_before, interval_after,
                                 ease_before, ease_after, repetitions_after, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(review.id)
        .bind(&review.card_id)
        .bind(review.learner_id)
        .bind(review.quality)
        .bind(review.interval_before)
        .bind(review.interval_after)
        .bind(review.ease_before)
        .bind(review.ease_after)
        .bind(review.repetitions_after)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ReviewOutcome { before, after }))
    }

    // === Review Repository ===

    /// Get a learner's review log, optionally restricted to one subject
    pub async fn get_reviews(&self, learner_id: Uuid, subject: Option<&str>) -> Result<Vec<DbReview>> {
        let reviews = sqlx::query_as::<_, DbReview>(
            r#"
            SELECT r.id, r.card_id, r.learner_id, r.quality, r.interval_before, r.interval_after,
                   r.ease_before, r.ease_after, r.repetitions_after, r.created_at
            FROM reviews r
            JOIN flashcards f ON f.id = r.card_id
            WHERE r.learner_id = $1 AND ($2::TEXT IS NULL OR f.subject = $2)
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(learner_id)
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Latest review time on each UTC day the learner reviewed, newest first.
    ///
    /// One row per active day, which is all the streak walk needs.
    pub async fn get_review_days(
        &self,
        learner_id: Uuid,
        subject: Option<&str>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let days = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT MAX(r.created_at) AS reviewed_at
            FROM reviews r
            JOIN flashcards f ON f.id = r.card_id
            WHERE r.learner_id = $1 AND ($2::TEXT IS NULL OR f.subject = $2)
            GROUP BY (r.created_at AT TIME ZONE 'UTC')::DATE
            ORDER BY reviewed_at DESC
            "#,
        )
        .bind(learner_id)
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }
}
