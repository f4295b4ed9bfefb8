//! Handlers for per-user progress and achievements.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use studyhub_core::achievements::{default_catalog, find, AchievementDefinition};
use studyhub_core::points::AchievementCategory;
use studyhub_core::progress::UserProgress;
use studyhub_core::types::{DbId, Timestamp};
use studyhub_db::repositories::AchievementRepo;

use crate::engine;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// [`UserProgress`] plus display helpers.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: UserProgress,
    pub badge_label: &'static str,
    /// `None` at the maximum level.
    pub points_to_next_level: Option<i64>,
}

impl From<UserProgress> for ProgressView {
    fn from(progress: UserProgress) -> Self {
        Self {
            badge_label: progress.badge_level.label(),
            points_to_next_level: progress.points_to_next_level(),
            progress,
        }
    }
}

/// An unlocked achievement joined with its catalog entry.
#[derive(Debug, Serialize)]
pub struct UnlockedAchievement {
    pub achievement_id: String,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub points_awarded: i64,
    pub unlocked_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct CheckAchievementsResponse {
    pub unlocked: Vec<AchievementDefinition>,
    pub progress: ProgressView,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/progress
///
/// Recompute the user's progress from their ledger. A user with no ledger
/// gets zero points at level 1.
pub async fn get_progress(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let progress = engine::load_progress(&state, user_id).await?;
    Ok(Json(DataResponse {
        data: ProgressView::from(progress),
    }))
}

/// GET /api/v1/users/{id}/achievements
///
/// Unlocked achievements, oldest first. Unlocks whose id is no longer in the
/// catalog are omitted.
pub async fn list_achievements(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rows = AchievementRepo::list_for_user(&state.pool, user_id).await?;
    let achievements: Vec<UnlockedAchievement> = rows
        .into_iter()
        .filter_map(|row| {
            let Some(definition) = find(default_catalog(), &row.achievement_id) else {
                tracing::warn!(
                    user_id,
                    achievement_id = %row.achievement_id,
                    "Unlocked achievement missing from catalog",
                );
                return None;
            };
            Some(UnlockedAchievement {
                achievement_id: row.achievement_id,
                title: definition.title,
                description: definition.description,
                category: definition.category,
                points_awarded: definition.points_awarded,
                unlocked_at: row.unlocked_at,
            })
        })
        .collect();

    Ok(Json(DataResponse { data: achievements }))
}

/// POST /api/v1/users/{id}/achievements/check
///
/// Evaluate the catalog against the user's current progress and unlock
/// anything newly earned. Self or admin only.
pub async fn check_achievements(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    user.ensure_self_or_admin(user_id)?;
    let outcome = engine::award(&state, user_id, None, chrono::Utc::now()).await?;
    Ok(Json(DataResponse {
        data: CheckAchievementsResponse {
            unlocked: outcome.unlocked,
            progress: ProgressView::from(outcome.progress),
        },
    }))
}
