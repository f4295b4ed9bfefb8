//! Repository for the `student_profiles` table.

use sqlx::PgPool;
use studyhub_core::roles::ROLE_STUDENT;
use studyhub_core::types::DbId;

use crate::models::profile::{StudentProfile, UpsertProfile};

/// Column list for `student_profiles` queries.
const COLUMNS: &str =
    "user_id, display_name, department, course, role, created_at, updated_at";

/// Provides read and upsert operations for student profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by user id.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<StudentProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_profiles WHERE user_id = $1");
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace a profile. Role defaults to `student`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertProfile,
    ) -> Result<StudentProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_profiles (user_id, display_name, department, course, role) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 display_name = EXCLUDED.display_name, \
                 department = EXCLUDED.department, \
                 course = EXCLUDED.course, \
                 role = EXCLUDED.role, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .bind(&input.display_name)
            .bind(&input.department)
            .bind(&input.course)
            .bind(input.role.as_deref().unwrap_or(ROLE_STUDENT))
            .fetch_one(pool)
            .await
    }

    /// Every profile, ordered by user id.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<StudentProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_profiles ORDER BY user_id");
        sqlx::query_as::<_, StudentProfile>(&query)
            .fetch_all(pool)
            .await
    }
}
