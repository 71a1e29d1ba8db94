use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cache::{CacheKey, TtlCache},
    cached,
    error::{AppError, AppResult},
    models::recommendation::{MAX_RELEASE_YEAR, MIN_RELEASE_YEAR},
    models::{MovieSummary, TmdbMovie, TmdbSearchResponse},
};

const CACHE_TTL: Duration = Duration::from_secs(3600); // 1 hour

/// Title/year lookup seam used by the recommendation orchestrator
///
/// Lookup failures are absorbed at the orchestrator boundary, so the
/// trait only needs the one operation the enrichment step performs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieLookup: Send + Sync {
    /// Best title+year match, or `None` when the provider has no result
    async fn find_by_title_and_year(&self, title: &str, year: i32)
        -> AppResult<Option<MovieSummary>>;
}

/// Client for the TMDb movie metadata API
///
/// Every call checks the injected TTL cache first, keyed on the endpoint
/// and its parameters; a hit returns without touching the network.
#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    cache: TtlCache,
}

impl TmdbClient {
    pub fn new(
        http_client: HttpClient,
        cache: TtlCache,
        api_key: String,
        api_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            language,
            cache,
        }
    }

    /// Searches for movies matching the query
    pub async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            CACHE_TTL,
            async move {
                let response = self.search_request(query, None).await?;

                let movies: Vec<MovieSummary> =
                    response.results.into_iter().map(MovieSummary::from).collect();

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    /// Fetches details for a single movie by TMDb ID
    pub async fn get_details(&self, tmdb_id: i64) -> AppResult<MovieSummary> {
        if tmdb_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "Invalid TMDb ID: {}",
                tmdb_id
            )));
        }

        cached!(
            self.cache,
            CacheKey::MovieDetails(tmdb_id),
            CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, tmdb_id);

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("language", self.language.as_str()),
                    ])
                    .send()
                    .await?;

                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(AppError::NotFound(format!("Movie {} not found", tmdb_id)));
                }

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        tmdb_id,
                        status = %status,
                        body = %body,
                        "TMDb details request failed"
                    );
                    return Err(AppError::ExternalApi(format!(
                        "TMDb API returned status {}: {}",
                        status, body
                    )));
                }

                let movie: TmdbMovie = response.json().await?;

                Ok(MovieSummary::from(movie))
            }
        )
    }

    async fn search_with_year(&self, query: &str, year: i32) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::MovieSearchWithYear(query.to_string(), year),
            CACHE_TTL,
            async move {
                let response = self.search_request(query, Some(year)).await?;

                Ok::<_, AppError>(
                    response
                        .results
                        .into_iter()
                        .map(MovieSummary::from)
                        .collect::<Vec<_>>(),
                )
            }
        )
    }

    async fn search_request(
        &self,
        query: &str,
        year: Option<i32>,
    ) -> AppResult<TmdbSearchResponse> {
        let url = format!("{}/search/movie", self.api_url);
        let year_param = year.map(|y| y.to_string());

        let mut params = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
            ("query", query),
        ];
        if let Some(year) = year_param.as_deref() {
            params.push(("year", year));
        }

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                query = %query,
                status = %status,
                body = %body,
                "TMDb search request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieLookup for TmdbClient {
    async fn find_by_title_and_year(
        &self,
        title: &str,
        year: i32,
    ) -> AppResult<Option<MovieSummary>> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) {
            return Err(AppError::InvalidInput(format!("Invalid year: {}", year)));
        }

        // First result of the year-filtered search is the best match
        let results = self.search_with_year(title, year).await?;
        Ok(results.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(cache: TtlCache) -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            cache,
            "test_key".to_string(),
            "http://test.local".to_string(),
            "en-US".to_string(),
        )
    }

    fn summary(tmdb_id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            tmdb_id,
            title: title.to_string(),
            poster_path: Some(format!("/poster-{}.jpg", tmdb_id)),
            release_date: Some("2010-07-15".to_string()),
        }
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let client = create_test_client(TtlCache::new());
        let result = client.search_movies("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_details_rejects_non_positive_id() {
        let client = create_test_client(TtlCache::new());
        assert!(matches!(
            client.get_details(0).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            client.get_details(-5).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_find_rejects_empty_title() {
        let client = create_test_client(TtlCache::new());
        let result = client.find_by_title_and_year("", 2010).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_find_rejects_out_of_range_year() {
        let client = create_test_client(TtlCache::new());
        assert!(matches!(
            client.find_by_title_and_year("Inception", 1500).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            client.find_by_title_and_year("Inception", 2500).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_search_returns_cached_results_without_network() {
        let cache = TtlCache::new();
        let movies = vec![summary(27205, "Inception")];
        cache
            .insert(
                &CacheKey::MovieSearch("inception".to_string()),
                &movies,
                Duration::from_secs(60),
            )
            .await;

        // api_url points at an unreachable host; only a cache hit can succeed
        let client = create_test_client(cache);
        let results = client.search_movies("Inception").await.unwrap();
        assert_eq!(results, movies);
    }

    #[tokio::test]
    async fn test_find_by_title_and_year_uses_first_cached_result() {
        let cache = TtlCache::new();
        let movies = vec![summary(27205, "Inception"), summary(12345, "Inception 2")];
        cache
            .insert(
                &CacheKey::MovieSearchWithYear("inception".to_string(), 2010),
                &movies,
                Duration::from_secs(60),
            )
            .await;

        let client = create_test_client(cache);
        let matched = client
            .find_by_title_and_year("Inception", 2010)
            .await
            .unwrap();
        assert_eq!(matched, Some(summary(27205, "Inception")));
    }

    #[tokio::test]
    async fn test_find_by_title_and_year_reports_absent_on_empty_results() {
        let cache = TtlCache::new();
        cache
            .insert(
                &CacheKey::MovieSearchWithYear("nonexistent".to_string(), 1999),
                &Vec::<MovieSummary>::new(),
                Duration::from_secs(60),
            )
            .await;

        let client = create_test_client(cache);
        let matched = client
            .find_by_title_and_year("Nonexistent", 1999)
            .await
            .unwrap();
        assert_eq!(matched, None);
    }

    #[tokio::test]
    async fn test_details_returns_cached_summary_without_network() {
        let cache = TtlCache::new();
        let movie = summary(603, "The Matrix");
        cache
            .insert(&CacheKey::MovieDetails(603), &movie, Duration::from_secs(60))
            .await;

        let client = create_test_client(cache);
        let details = client.get_details(603).await.unwrap();
        assert_eq!(details, movie);
    }
}
