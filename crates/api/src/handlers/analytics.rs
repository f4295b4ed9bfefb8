//! Handler for the admin analytics rollup.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use studyhub_core::achievements::default_catalog;
use studyhub_core::analytics::aggregate;
use studyhub_core::timeframe::Timeframe;

use crate::engine;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::TimeframeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/analytics
///
/// Population-wide engagement, points, achievement and leaderboard stats for
/// `?timeframe=` (default `weekly`). Admin only.
pub async fn get_analytics(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TimeframeParams>,
) -> AppResult<impl IntoResponse> {
    let timeframe = match params.timeframe.as_deref() {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => Timeframe::Weekly,
    };

    let contributors = engine::load_contributors(&state).await?;
    let report = aggregate(&contributors, default_catalog(), timeframe, chrono::Utc::now());

    tracing::info!(
        admin_id = admin.user_id,
        %timeframe,
        users = report.engagement.total_users,
        "Analytics report generated",
    );

    Ok(Json(DataResponse { data: report }))
}
