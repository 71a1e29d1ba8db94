use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two user-curated movie lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Watchlist,
    Favorite,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Watchlist => "watchlist",
            ListType::Favorite => "favorite",
        }
    }
}

/// A movie on one of the user's lists
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ListEntry {
    pub tmdb_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Both lists for a user, each newest-first
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserLists {
    pub watchlist: Vec<ListEntry>,
    pub favorite: Vec<ListEntry>,
}
