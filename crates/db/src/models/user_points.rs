//! Point counter model.

use serde::Serialize;
use sqlx::FromRow;
use studyhub_core::types::{DbId, Timestamp};

/// A row from the `user_points` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPoints {
    pub user_id: DbId,
    pub total_points: i64,
    pub last_activity_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}
