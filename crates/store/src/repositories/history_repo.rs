//! Repository for the `history_records` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::history::{HistoryRow, NewHistoryRecord};

const COLUMNS: &str = "id, user_id, prompt, images, settings, created_at";

/// CRUD operations for generation history, always scoped to a user.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert a new history record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        input: &NewHistoryRecord,
    ) -> Result<HistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO history_records (user_id, prompt, images, settings) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(user_id)
            .bind(&input.prompt)
            .bind(&input.images)
            .bind(Json(&input.settings))
            .fetch_one(pool)
            .await
    }

    /// List a user's records, most recent first.
    pub async fn list(
        pool: &PgPool,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history_records \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find one record by id, scoped to the user.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: &str,
        id: uuid::Uuid,
    ) -> Result<Option<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history_records WHERE user_id = $1 AND id = $2"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a record. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        user_id: &str,
        id: uuid::Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history_records WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
