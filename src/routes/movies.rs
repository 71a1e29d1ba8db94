use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::MovieSummary,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

/// Handler for movie search; proxies TMDb so the API key stays server-side
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.tmdb.search_movies(&params.q).await?;
    Ok(Json(movies))
}

/// Handler for movie details by TMDb ID
pub async fn details(
    State(state): State<AppState>,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<MovieSummary>> {
    if tmdb_id <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Invalid TMDb ID: {}",
            tmdb_id
        )));
    }

    let movie = state.tmdb.get_details(tmdb_id).await?;
    Ok(Json(movie))
}
