use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::AuthenticatedUser,
    models::Recommendation,
    state::AppState,
};

/// Longest accepted free-text prompt
const MAX_PROMPT_LENGTH: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

/// Handler for recommendation generation
///
/// Status-code mapping for the orchestrator's failure modes lives in the
/// `GenerationError` response conversion; this handler only validates
/// the request body.
pub async fn generate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Vec<Recommendation>>, Response> {
    if let Some(prompt) = &request.prompt {
        if prompt.chars().count() > MAX_PROMPT_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Prompt cannot exceed {} characters",
                MAX_PROMPT_LENGTH
            ))
            .into_response());
        }
    }

    let recommendations = state
        .recommender
        .generate(user.0, request.prompt.as_deref())
        .await
        .map_err(IntoResponse::into_response)?;

    Ok(Json(recommendations))
}
