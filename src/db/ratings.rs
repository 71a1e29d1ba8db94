use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Rating, RatingUpsert, UserRating};

/// Read/write access to a user's per-movie ratings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Total number of ratings the user has
    async fn count_for_user(&self, user_id: Uuid) -> AppResult<i64>;

    /// The user's (movie, score) pairs, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserRating>>;

    /// The user's full rating records, newest first
    async fn list_full(&self, user_id: Uuid) -> AppResult<Vec<Rating>>;

    /// Creates or updates the user's rating for a movie
    ///
    /// Unique per (user, movie): re-rating updates the score and
    /// `updated_at` in place. Score validation happens at the call site
    /// before this is reached.
    async fn upsert(&self, user_id: Uuid, tmdb_id: i64, rating: i16) -> AppResult<RatingUpsert>;
}

/// Postgres-backed rating store
#[derive(Clone)]
pub struct PgRatingStore {
    pool: PgPool,
}

impl PgRatingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingStore for PgRatingStore {
    async fn count_for_user(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserRating>> {
        let ratings = sqlx::query_as::<_, UserRating>(
            "SELECT tmdb_id, rating FROM ratings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    async fn list_full(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(
            r#"
            SELECT tmdb_id, rating, created_at, updated_at
            FROM ratings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    async fn upsert(&self, user_id: Uuid, tmdb_id: i64, rating: i16) -> AppResult<RatingUpsert> {
        let row = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (user_id, tmdb_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, tmdb_id)
            DO UPDATE SET rating = EXCLUDED.rating, updated_at = now()
            RETURNING tmdb_id, rating, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(tmdb_id)
        .bind(rating)
        .fetch_one(&self.pool)
        .await?;

        // A freshly inserted row carries identical timestamps
        let was_created = row.created_at == row.updated_at;

        tracing::debug!(
            user_id = %user_id,
            tmdb_id,
            rating,
            was_created,
            "Rating upserted"
        );

        Ok(RatingUpsert {
            rating: row,
            was_created,
        })
    }
}
