//! Learner registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::{ApiError, Result};
use crate::models::{LearnerStatusResponse, RegisterLearnerRequest, RegisterLearnerResponse};
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/learners/register
/// Creates a new learner and returns its bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterLearnerRequest>>,
) -> Result<Json<RegisterLearnerResponse>> {
    let name = payload.and_then(|p| p.name);
    let (learner, token) = state.db.create_learner(name.as_deref()).await?;

    tracing::info!("Registered new learner: {}", learner.id);

    Ok(Json(RegisterLearnerResponse {
        learner_id: learner.id,
        token,
    }))
}

/// GET /api/learners/me
pub async fn me(
    Extension(auth): Extension<AuthenticatedLearner>,
    State(state): State<AppState>,
) -> Result<Json<LearnerStatusResponse>> {
    let learner = state
        .db
        .get_learner(auth.learner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Learner not found".to_string()))?;

    Ok(Json(LearnerStatusResponse {
        learner_id: learner.id,
        name: learner.name,
        last_seen_at: learner.last_seen_at,
    }))
}
