//! Flashcard endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/flashcards
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<CreateFlashcardsRequest>,
) -> Result<Json<FlashcardListResponse>> {
    if payload.cards.is_empty() {
        return Err(ApiError::BadRequest("At least one card is required".to_string()));
    }
    if payload
        .cards
        .iter()
        .any(|c| c.front.trim().is_empty() || c.back.trim().is_empty())
    {
        return Err(ApiError::BadRequest(
            "Cards need both a front and a back".to_string(),
        ));
    }

    let subject = payload
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let inserted = state
        .db
        .insert_flashcards(auth.learner_id, subject, &payload.cards)
        .await?;

    tracing::info!(
        learner_id = %auth.learner_id,
        count = inserted.len(),
        "Created flashcards"
    );

    Ok(Json(FlashcardListResponse {
        cards: inserted.iter().map(DbFlashcard::to_api_flashcard).collect(),
    }))
}

/// GET /api/flashcards
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<FlashcardListResponse>> {
    let cards = load_flashcards(&state, &auth, query.subject.as_deref()).await?;
    Ok(Json(FlashcardListResponse { cards }))
}

/// Load a learner's cards with their schedules.
pub(crate) async fn load_flashcards(
    state: &AppState,
    auth: &AuthenticatedLearner,
    subject: Option<&str>,
) -> Result<Vec<Flashcard>> {
    let rows = state.db.get_flashcards(auth.learner_id, subject).await?;
    let cards = rows
        .iter()
        .map(DbScheduledFlashcard::to_api_flashcard)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(cards)
}
