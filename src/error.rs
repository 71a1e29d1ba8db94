use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Expected business conditions that make a user ineligible for
/// recommendation generation. Carried verbatim to the client.
#[derive(thiserror::Error, Debug)]
pub enum EligibilityError {
    #[error("user has only {current} ratings, minimum {required} required")]
    InsufficientRatings { current: i64, required: i64 },

    #[error("daily limit of {limit} recommendation requests exceeded")]
    DailyLimitExceeded {
        limit: i64,
        requests_today: i64,
        resets_at: DateTime<Utc>,
    },
}

/// Failure modes of the recommendation orchestrator.
///
/// A closed set so the HTTP boundary is forced to handle every case
/// exhaustively instead of pattern-matching on strings.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error("data access failed: {0}")]
    DataAccess(#[source] AppError),

    #[error("completion provider failed: {0}")]
    Upstream(#[source] AppError),

    #[error("AI response violated the expected contract: {0}")]
    ResponseContract(String),
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        match self {
            GenerationError::Eligibility(EligibilityError::InsufficientRatings {
                current,
                required,
            }) => {
                let body = Json(json!({
                    "error": "Forbidden",
                    "message": format!(
                        "You must have at least {} rated movies to generate recommendations",
                        required
                    ),
                    "details": {
                        "current_ratings_count": current,
                        "required_ratings_count": required,
                    }
                }));
                (StatusCode::FORBIDDEN, body).into_response()
            }
            GenerationError::Eligibility(EligibilityError::DailyLimitExceeded {
                limit,
                requests_today,
                resets_at,
            }) => {
                let body = Json(json!({
                    "error": "Too Many Requests",
                    "message": "Daily recommendation limit exceeded. Please try again tomorrow.",
                    "details": {
                        "daily_limit": limit,
                        "requests_today": requests_today,
                        "reset_time": resets_at.to_rfc3339(),
                    }
                }));
                (StatusCode::TOO_MANY_REQUESTS, body).into_response()
            }
            GenerationError::DataAccess(err) => {
                tracing::error!(error = %err, "Recommendation data access failed");
                let body = Json(json!({
                    "error": "Failed to generate recommendations. Please try again later."
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            GenerationError::Upstream(err) => {
                tracing::error!(error = %err, "Completion provider call failed");
                let body = Json(json!({
                    "error": "Recommendation service temporarily unavailable"
                }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            GenerationError::ResponseContract(msg) => {
                tracing::error!(reason = %msg, "AI response failed validation");
                let body = Json(json!({
                    "error": "Failed to process AI response. Please try again."
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_ratings_message() {
        let err = EligibilityError::InsufficientRatings {
            current: 3,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "user has only 3 ratings, minimum 10 required"
        );
    }

    #[test]
    fn test_daily_limit_message() {
        let err = EligibilityError::DailyLimitExceeded {
            limit: 10,
            requests_today: 10,
            resets_at: Utc::now(),
        };
        assert_eq!(
            err.to_string(),
            "daily limit of 10 recommendation requests exceeded"
        );
    }

    #[test]
    fn test_generation_error_wraps_eligibility_transparently() {
        let err = GenerationError::from(EligibilityError::InsufficientRatings {
            current: 0,
            required: 10,
        });
        assert!(err.to_string().contains("minimum 10 required"));
    }
}
