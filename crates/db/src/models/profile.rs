//! Student profile model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyhub_core::types::{DbId, Timestamp};

/// A row from the `student_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentProfile {
    pub user_id: DbId,
    pub display_name: String,
    pub department: Option<String>,
    pub course: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProfile {
    pub display_name: String,
    pub department: Option<String>,
    pub course: Option<String>,
    pub role: Option<String>,
}
