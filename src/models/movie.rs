use serde::{Deserialize, Serialize};

/// Movie projection returned to clients and cached between TMDb calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Raw search response from the TMDb `/search/movie` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    pub results: Vec<TmdbMovie>,
}

/// Raw movie record as returned by TMDb search and detail endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        Self {
            tmdb_id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            // TMDb returns "" for unreleased titles; treat that as absent
            release_date: movie.release_date.filter(|d| !d.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_movie_deserialization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "release_date": "2010-07-15"
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(
            movie.poster_path,
            Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg".to_string())
        );
    }

    #[test]
    fn test_tmdb_movie_missing_optional_fields() {
        let json = r#"{ "id": 1, "title": "Obscure" }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_date, None);
    }

    #[test]
    fn test_summary_from_tmdb_movie_drops_empty_release_date() {
        let movie = TmdbMovie {
            id: 2,
            title: "Unreleased".to_string(),
            poster_path: None,
            release_date: Some(String::new()),
        };

        let summary = MovieSummary::from(movie);
        assert_eq!(summary.release_date, None);
    }
}
