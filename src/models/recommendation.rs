use serde::{Deserialize, Serialize};

/// Number of recommendations every successful generation returns
pub const RECOMMENDATION_COUNT: usize = 5;

/// Earliest release year the AI may propose (first film ever made)
pub const MIN_RELEASE_YEAR: i32 = 1888;
/// Latest release year the AI may propose
pub const MAX_RELEASE_YEAR: i32 = 2100;

/// A single enriched movie recommendation
///
/// Transient: built fresh on each generation call and never persisted.
/// When TMDb confirms a title/year match, `tmdb_id` and `poster_path`
/// come from that match rather than from the model's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tmdb_id: i64,
    pub title: String,
    pub year: i32,
    pub poster_path: Option<String>,
}
