//! Repository for the `user_achievements` table.

use std::collections::BTreeSet;

use sqlx::{PgConnection, PgPool};
use studyhub_core::types::{DbId, Timestamp};

use crate::models::achievement::UserAchievement;

/// Column list for `user_achievements` queries.
const COLUMNS: &str = "id, user_id, achievement_id, unlocked_at";

/// Unlocked-set persistence. Rows are only ever inserted.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Record an unlock.
    ///
    /// Returns `None` when the user already had the achievement, which lets
    /// concurrent evaluations race safely: only the winner gets a row back.
    pub async fn unlock(
        conn: &mut PgConnection,
        user_id: DbId,
        achievement_id: &str,
        unlocked_at: Timestamp,
    ) -> Result<Option<UserAchievement>, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_achievements (user_id, achievement_id, unlocked_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, achievement_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .bind(achievement_id)
            .bind(unlocked_at)
            .fetch_optional(conn)
            .await
    }

    /// All unlocks for a user, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserAchievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_achievements \
             WHERE user_id = $1 \
             ORDER BY unlocked_at, id"
        );
        sqlx::query_as::<_, UserAchievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The ids a user has unlocked.
    pub async fn unlocked_ids(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<BTreeSet<String>, sqlx::Error> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT achievement_id FROM user_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(ids.into_iter().collect())
    }
}
