//! Handlers for recording actions and reading a user's ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use studyhub_core::achievements::AchievementDefinition;
use studyhub_core::actions::UserAction;
use studyhub_core::error::CoreError;
use studyhub_core::points::{classify, Classification};
use studyhub_core::types::DbId;
use studyhub_db::repositories::ActionRepo;

use crate::engine;
use crate::error::{AppError, AppResult};
use crate::handlers::users::ProgressView;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /actions`.
#[derive(Debug, Deserialize)]
pub struct RecordActionRequest {
    /// User to credit. Defaults to the caller; crediting anyone else
    /// requires the admin role.
    pub user_id: Option<DbId>,
    /// The action, parsed with [`UserAction::from_json`].
    pub action: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct RecordActionResponse {
    pub classification: Classification,
    pub progress: ProgressView,
    pub unlocked: Vec<AchievementDefinition>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/actions
///
/// Append an action to the ledger, update the point counter, and unlock any
/// achievements the new progress earns, all in one transaction.
pub async fn record_action(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<RecordActionRequest>,
) -> AppResult<impl IntoResponse> {
    let target = input.user_id.unwrap_or(user.user_id);
    if target != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Crediting another user requires the admin role".into(),
        )));
    }

    let action = UserAction::from_json(input.action)?;
    let now = chrono::Utc::now();
    let record = action.into_record(target, now);
    let classification = classify(&record)?;

    let outcome =
        engine::award(&state, target, Some((record, classification.points)), now).await?;

    tracing::info!(
        user_id = target,
        credited_by = user.user_id,
        action = %classification.kind,
        points = classification.points,
        unlocked = outcome.unlocked.len(),
        "Action recorded",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordActionResponse {
                classification,
                progress: ProgressView::from(outcome.progress),
                unlocked: outcome.unlocked,
            },
        }),
    ))
}

/// GET /api/v1/users/{id}/actions
///
/// Page through a user's ledger, newest first. Self or admin only.
pub async fn list_user_actions(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    user.ensure_self_or_admin(user_id)?;
    let rows =
        ActionRepo::list_for_user_paged(&state.pool, user_id, params.limit(), params.offset())
            .await?;
    Ok(Json(DataResponse { data: rows }))
}
