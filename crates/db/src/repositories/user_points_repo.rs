//! Repository for the `user_points` counter.

use sqlx::{PgConnection, PgPool};
use studyhub_core::types::{DbId, Timestamp};

use crate::models::user_points::UserPoints;

/// Column list for `user_points` queries.
const COLUMNS: &str = "user_id, total_points, last_activity_at, updated_at";

/// Atomic point counter operations.
pub struct UserPointsRepo;

impl UserPointsRepo {
    /// Add `delta` to a user's total, creating the row if needed.
    ///
    /// The update is a single `total_points = total_points + delta` statement,
    /// so concurrent awards for the same user never lose an increment.
    /// `activity_at` advances `last_activity_at` (never moves it backwards);
    /// pass `None` for system-generated awards.
    pub async fn increment(
        conn: &mut PgConnection,
        user_id: DbId,
        delta: i64,
        activity_at: Option<Timestamp>,
    ) -> Result<UserPoints, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_points (user_id, total_points, last_activity_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 total_points = user_points.total_points + EXCLUDED.total_points, \
                 last_activity_at = GREATEST(user_points.last_activity_at, EXCLUDED.last_activity_at), \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPoints>(&query)
            .bind(user_id)
            .bind(delta)
            .bind(activity_at)
            .fetch_one(conn)
            .await
    }

    /// Current counter for a user, if they have ever been awarded points.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<UserPoints>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_points WHERE user_id = $1");
        sqlx::query_as::<_, UserPoints>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
