//! Leaderboard score queries.
//!
//! These return unranked scores; ordering and rank assignment happen in
//! `studyhub_core::leaderboard::assign_ranks` so the SQL path and the
//! in-memory path cannot disagree on tie-breaks.

use sqlx::PgPool;
use studyhub_core::types::Timestamp;

use crate::models::leaderboard::LeaderboardScoreRow;

/// Provides scoped, windowed point totals.
pub struct LeaderboardRepo;

impl LeaderboardRepo {
    /// Lifetime totals for every user matching the optional department and
    /// course filters.
    pub async fn all_time_scores(
        pool: &PgPool,
        department: Option<&str>,
        course: Option<&str>,
    ) -> Result<Vec<LeaderboardScoreRow>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardScoreRow>(
            "SELECT up.user_id, up.total_points AS score, up.last_activity_at \
             FROM user_points up \
             LEFT JOIN student_profiles p ON p.user_id = up.user_id \
             WHERE ($1::TEXT IS NULL OR p.department = $1) \
               AND ($2::TEXT IS NULL OR p.course = $2)",
        )
        .bind(department)
        .bind(course)
        .fetch_all(pool)
        .await
    }

    /// Ledger sums in `since..=now` for every user matching the filters.
    ///
    /// Users with no rows in the window score zero. Rows dated after `now`
    /// are left out.
    pub async fn windowed_scores(
        pool: &PgPool,
        department: Option<&str>,
        course: Option<&str>,
        since: Timestamp,
        now: Timestamp,
    ) -> Result<Vec<LeaderboardScoreRow>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardScoreRow>(
            "SELECT up.user_id, COALESCE(w.points, 0)::BIGINT AS score, up.last_activity_at \
             FROM user_points up \
             LEFT JOIN student_profiles p ON p.user_id = up.user_id \
             LEFT JOIN ( \
                 SELECT user_id, SUM(points) AS points \
                 FROM action_records \
                 WHERE occurred_at >= $3 AND occurred_at <= $4 \
                 GROUP BY user_id \
             ) w ON w.user_id = up.user_id \
             WHERE ($1::TEXT IS NULL OR p.department = $1) \
               AND ($2::TEXT IS NULL OR p.course = $2)",
        )
        .bind(department)
        .bind(course)
        .bind(since)
        .bind(now)
        .fetch_all(pool)
        .await
    }
}
