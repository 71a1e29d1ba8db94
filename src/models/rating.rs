use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating score
pub const MIN_RATING: i16 = 1;
/// Highest accepted rating score
pub const MAX_RATING: i16 = 10;

/// A user's rating for a movie as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub tmdb_id: i64,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The (movie, score) pair the prompt builder works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRating {
    pub tmdb_id: i64,
    pub rating: i16,
}

/// Result of a rating upsert, distinguishing create from update
#[derive(Debug, Clone)]
pub struct RatingUpsert {
    pub rating: Rating,
    pub was_created: bool,
}

/// Checks that a score lies in the accepted `[1, 10]` range
pub fn is_valid_score(score: i16) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&score)
}
