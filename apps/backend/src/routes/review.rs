//! Review endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use recall_core::{due_flashcards, streak_days, study_statistics};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::routes::flashcards::load_flashcards;
use crate::AppState;

/// POST /api/flashcards/review
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    let now = Utc::now();

    let outcome = state
        .db
        .review_card(
            auth.learner_id,
            &payload.card_id,
            payload.quality_rating,
            state.scheduler.as_ref(),
            now,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Flashcard {}", payload.card_id)))?;

    let next_review = outcome
        .after
        .next_review
        .ok_or_else(|| ApiError::Internal("Scheduler returned no review date".to_string()))?;

    tracing::debug!(
        card_id = %payload.card_id,
        quality = payload.quality_rating.value(),
        interval_before = outcome.before.interval,
        interval_after = outcome.after.interval,
        ease_after = outcome.after.ease_factor,
        "Reviewed flashcard"
    );

    Ok(Json(ReviewResponse {
        success: true,
        next_review,
        schedule: outcome.after,
    }))
}

/// GET /api/flashcards/review
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<DueCardsResponse>> {
    let now = Utc::now();
    let subject = query.subject.as_deref();

    let cards = load_flashcards(&state, &auth, subject).await?;
    let review_days = state.db.get_review_days(auth.learner_id, subject).await?;

    Ok(Json(DueCardsResponse {
        total_cards: cards.len(),
        due_cards: due_flashcards(&cards, now).cloned().collect(),
        study_streak: streak_days(review_days, now),
    }))
}

/// GET /api/flashcards/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<ReviewStatistics>> {
    let reviews = state
        .db
        .get_reviews(auth.learner_id, query.subject.as_deref())
        .await?;
    let events: Vec<ReviewEvent> = reviews.iter().map(DbReview::to_event).collect();

    Ok(Json(study_statistics(&events, Utc::now())))
}
