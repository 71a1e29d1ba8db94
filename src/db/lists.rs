use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ListEntry, ListType, UserLists};

/// Access to the user's watchlist and favorite lists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Both lists for the user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<UserLists>;

    /// Adds a movie to a list; a duplicate is a conflict
    async fn add(&self, user_id: Uuid, tmdb_id: i64, list_type: ListType) -> AppResult<ListEntry>;

    /// Removes a movie from a list; a missing row is not found
    async fn remove(&self, user_id: Uuid, tmdb_id: i64, list_type: ListType) -> AppResult<()>;
}

#[derive(sqlx::FromRow)]
struct ListRow {
    tmdb_id: i64,
    list_type: String,
    created_at: DateTime<Utc>,
}

/// Postgres-backed list store
#[derive(Clone)]
pub struct PgListStore {
    pool: PgPool,
}

impl PgListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ListStore for PgListStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<UserLists> {
        let rows = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT tmdb_id, list_type, created_at
            FROM user_lists
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut lists = UserLists::default();
        for row in rows {
            let entry = ListEntry {
                tmdb_id: row.tmdb_id,
                created_at: row.created_at,
            };
            match row.list_type.as_str() {
                "watchlist" => lists.watchlist.push(entry),
                "favorite" => lists.favorite.push(entry),
                other => {
                    tracing::warn!(list_type = %other, "Unknown list type in user_lists row");
                }
            }
        }

        Ok(lists)
    }

    async fn add(&self, user_id: Uuid, tmdb_id: i64, list_type: ListType) -> AppResult<ListEntry> {
        let result = sqlx::query_as::<_, ListEntry>(
            r#"
            INSERT INTO user_lists (user_id, tmdb_id, list_type)
            VALUES ($1, $2, $3)
            RETURNING tmdb_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(tmdb_id)
        .bind(list_type.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(entry) => Ok(entry),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
                "Movie {} is already on the {} list",
                tmdb_id,
                list_type.as_str()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, user_id: Uuid, tmdb_id: i64, list_type: ListType) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM user_lists WHERE user_id = $1 AND tmdb_id = $2 AND list_type = $3",
        )
        .bind(user_id)
        .bind(tmdb_id)
        .bind(list_type.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Movie {} is not on the {} list",
                tmdb_id,
                list_type.as_str()
            )));
        }

        Ok(())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
