//! Notification entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use studyhub_core::types::{DbId, Timestamp};

/// Notification kind written when an achievement is unlocked.
pub const KIND_ACHIEVEMENT_UNLOCKED: &str = "achievement_unlocked";

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}
