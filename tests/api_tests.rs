use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use cinematch_api::{cache::TtlCache, config::Config, routes::create_router, state::AppState};

/// Builds a test server whose state points at unreachable backends.
///
/// The pool is lazy and the provider URLs are bogus, so only paths that
/// short-circuit before any I/O (auth, validation, health) can be
/// exercised here; everything behind a store or provider call is covered
/// by the mock-based unit tests.
fn create_test_server() -> TestServer {
    let config = Config {
        database_url: "postgres://localhost:5432/unused".to_string(),
        tmdb_api_key: "test_key".to_string(),
        tmdb_api_url: "http://tmdb.test.local".to_string(),
        tmdb_language: "en-US".to_string(),
        openrouter_api_key: "test_key".to_string(),
        openrouter_api_url: "http://openrouter.test.local".to_string(),
        recommendation_model: "openai/gpt-4o-mini".to_string(),
        daily_recommendation_limit: 10,
        http_timeout_secs: 1,
        cache_sweep_interval_secs: 300,
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
    let state = AppState::from_config(&config, pool, TtlCache::new()).unwrap();
    TestServer::new(create_router(state)).unwrap()
}

fn user_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_api_routes_require_user_header() {
    let server = create_test_server();

    let response = server.get("/api/v1/ratings").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server.post("/api/v1/recommendations").json(&json!({})).await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_user_header_is_unauthorized() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/ratings")
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rating_outside_range_is_rejected() {
    let server = create_test_server();

    for score in [0, 11, -2] {
        let (name, value) = user_header();
        let response = server
            .post("/api/v1/ratings")
            .add_header(name, value)
            .json(&json!({ "tmdb_id": 808, "rating": score }))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_rating_with_invalid_tmdb_id_is_rejected() {
    let server = create_test_server();

    let (name, value) = user_header();
    let response = server
        .post("/api/v1/ratings")
        .add_header(name, value)
        .json(&json!({ "tmdb_id": 0, "rating": 7 }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_search_rejects_empty_query() {
    let server = create_test_server();

    let (name, value) = user_header();
    let response = server
        .get("/api/v1/movies/search")
        .add_query_param("q", "   ")
        .add_header(name, value)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_details_rejects_non_positive_id() {
    let server = create_test_server();

    let (name, value) = user_header();
    let response = server
        .get("/api/v1/movies/-3")
        .add_header(name, value)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_add_rejects_unknown_list_type() {
    let server = create_test_server();

    let (name, value) = user_header();
    let response = server
        .post("/api/v1/lists")
        .add_header(name, value)
        .json(&json!({ "tmdb_id": 603, "list_type": "queue" }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_recommendations_reject_oversized_prompt() {
    let server = create_test_server();

    let (name, value) = user_header();
    let response = server
        .post("/api/v1/recommendations")
        .add_header(name, value)
        .json(&json!({ "prompt": "x".repeat(501) }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_header_is_echoed() {
    let server = create_test_server();
    let request_id = Uuid::new_v4().to_string();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        request_id.as_str()
    );
}

#[tokio::test]
async fn test_fresh_request_id_is_assigned() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let header = response.headers().get("x-request-id").unwrap();
    assert!(Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
