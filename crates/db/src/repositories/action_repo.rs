//! Repository for the append-only `action_records` ledger.
//!
//! There is deliberately no update or delete: removing a row would corrupt
//! historical point totals.

use sqlx::{PgConnection, PgPool};
use studyhub_core::types::{DbId, Timestamp};

use crate::models::action_record::{ActionRecordRow, CreateActionRecord};

/// Column list for `action_records` queries.
const COLUMNS: &str = "id, user_id, action_type, resource_id, collection_id, resource_type, \
    metadata, points, occurred_at";

/// Provides append and read operations for the points ledger.
pub struct ActionRepo;

impl ActionRepo {
    /// Append one ledger row.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &CreateActionRecord,
    ) -> Result<ActionRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO action_records \
                (user_id, action_type, resource_id, collection_id, resource_type, metadata, points, occurred_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionRecordRow>(&query)
            .bind(input.user_id)
            .bind(&input.action_type)
            .bind(input.resource_id)
            .bind(input.collection_id)
            .bind(&input.resource_type)
            .bind(&input.metadata)
            .bind(input.points)
            .bind(input.occurred_at)
            .fetch_one(conn)
            .await
    }

    /// Full ledger for a user, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ActionRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_records \
             WHERE user_id = $1 \
             ORDER BY occurred_at, id"
        );
        sqlx::query_as::<_, ActionRecordRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Page through a user's ledger, newest first.
    pub async fn list_for_user_paged(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActionRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_records \
             WHERE user_id = $1 \
             ORDER BY occurred_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActionRecordRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every ledger row, grouped by user and oldest first within a user.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ActionRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_records \
             ORDER BY user_id, occurred_at, id"
        );
        sqlx::query_as::<_, ActionRecordRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Net stored points for a user at or after `since`.
    pub async fn sum_points_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(points), 0)::BIGINT FROM action_records \
             WHERE user_id = $1 AND occurred_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }
}
