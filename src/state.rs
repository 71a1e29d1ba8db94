use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::{
    cache::TtlCache,
    config::Config,
    db::{ListStore, PgListStore, PgRatingStore, PgRequestLogStore, RatingStore},
    services::{OpenRouterClient, RecommendationsService, TmdbClient},
};

/// Shared application state
///
/// Everything is behind an `Arc`, constructed once in `main` and cloned
/// per request. Stores are trait objects so tests can assemble a state
/// from substitutes without a database.
#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<TmdbClient>,
    pub ratings: Arc<dyn RatingStore>,
    pub lists: Arc<dyn ListStore>,
    pub recommender: Arc<RecommendationsService>,
}

impl AppState {
    /// Wires clients, stores and the orchestrator from configuration
    pub fn from_config(config: &Config, pool: PgPool, cache: TtlCache) -> anyhow::Result<Self> {
        // One shared HTTP client: connection reuse plus a process-wide
        // deadline on every outbound provider call.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let tmdb = Arc::new(TmdbClient::new(
            http_client.clone(),
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        ));

        let openrouter = Arc::new(OpenRouterClient::new(
            http_client,
            config.openrouter_api_key.clone(),
            config.openrouter_api_url.clone(),
        ));

        let ratings = Arc::new(PgRatingStore::new(pool.clone()));
        let request_log = Arc::new(PgRequestLogStore::new(pool.clone()));
        let lists = Arc::new(PgListStore::new(pool));

        let recommender = Arc::new(RecommendationsService::new(
            ratings.clone(),
            request_log,
            openrouter,
            tmdb.clone(),
            config.daily_recommendation_limit,
            config.recommendation_model.clone(),
        ));

        Ok(Self {
            tmdb,
            ratings,
            lists,
            recommender,
        })
    }
}
