use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthenticatedUser,
    models::{ListEntry, ListType, UserLists},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddToListRequest {
    pub tmdb_id: i64,
    pub list_type: ListType,
}

/// Handler returning the caller's watchlist and favorites
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<UserLists>> {
    let lists = state.lists.list_for_user(user.0).await?;
    Ok(Json(lists))
}

/// Handler that adds a movie to one of the caller's lists
pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<AddToListRequest>,
) -> AppResult<(StatusCode, Json<ListEntry>)> {
    if request.tmdb_id <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Invalid TMDb ID: {}",
            request.tmdb_id
        )));
    }

    let entry = state
        .lists
        .add(user.0, request.tmdb_id, request.list_type)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler that removes a movie from one of the caller's lists
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((list_type, tmdb_id)): Path<(ListType, i64)>,
) -> AppResult<StatusCode> {
    state.lists.remove(user.0, tmdb_id, list_type).await?;
    Ok(StatusCode::NO_CONTENT)
}
