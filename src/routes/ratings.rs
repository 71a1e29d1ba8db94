use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{rating, Rating},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpsertRatingRequest {
    pub tmdb_id: i64,
    pub rating: i16,
}

/// Handler that creates or updates the caller's rating for a movie
///
/// Returns 201 when the rating was newly created and 200 when an
/// existing rating was updated in place.
pub async fn upsert(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpsertRatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    if request.tmdb_id <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Invalid TMDb ID: {}",
            request.tmdb_id
        )));
    }

    if !rating::is_valid_score(request.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating {} outside allowed range [{}, {}]",
            request.rating,
            rating::MIN_RATING,
            rating::MAX_RATING
        )));
    }

    let result = state
        .ratings
        .upsert(user.0, request.tmdb_id, request.rating)
        .await?;

    let status = if result.was_created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(result.rating)))
}

/// Handler returning all of the caller's ratings, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.ratings.list_full(user.0).await?;
    Ok(Json(ratings))
}
