use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Append-only log of recommendation requests, read back only as a
/// per-day count for rate limiting.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RequestLogStore: Send + Sync {
    /// Requests the user made since 00:00 UTC today
    async fn count_today(&self, user_id: Uuid) -> AppResult<i64>;

    /// Records one recommendation request for the user
    async fn append(&self, user_id: Uuid) -> AppResult<()>;
}

/// Start of the current UTC calendar day
pub fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The instant the daily counter resets: next UTC midnight
pub fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + chrono::Days::new(1);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

/// Postgres-backed request log
#[derive(Clone)]
pub struct PgRequestLogStore {
    pool: PgPool,
}

impl PgRequestLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RequestLogStore for PgRequestLogStore {
    async fn count_today(&self, user_id: Uuid) -> AppResult<i64> {
        let since = start_of_utc_day(Utc::now());

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM ai_recommendation_requests
            WHERE user_id = $1 AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // Note: no lock spans the count-then-append window. Two racing calls
    // from the same user can both pass the limit check; rate limiting here
    // is advisory.
    async fn append(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("INSERT INTO ai_recommendation_requests (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
