//! Leaderboard score rows computed in SQL.

use sqlx::FromRow;
use studyhub_core::leaderboard::ScoredUser;
use studyhub_core::types::{DbId, Timestamp};

/// One candidate's timeframe score, before ranking.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardScoreRow {
    pub user_id: DbId,
    pub score: i64,
    pub last_activity_at: Option<Timestamp>,
}

impl From<LeaderboardScoreRow> for ScoredUser {
    fn from(row: LeaderboardScoreRow) -> Self {
        ScoredUser {
            user_id: row.user_id,
            score: row.score,
            last_activity_at: row.last_activity_at,
        }
    }
}
