//! Handler for scoped, windowed leaderboards.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use studyhub_core::leaderboard::{
    assign_ranks, clamp_limit, LeaderboardEntry, LeaderboardScope, ScoredUser,
};
use studyhub_core::timeframe::Timeframe;
use studyhub_db::repositories::LeaderboardRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::LeaderboardParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/leaderboard
///
/// Query: `scope` (`global` | `department` | `course`, default `global`),
/// `department`, `course`, `timeframe` (default `all_time`), `limit`
/// (default 10, clamped to 1..=100).
pub async fn get_leaderboard(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<impl IntoResponse> {
    let scope = LeaderboardScope::from_parts(
        params.scope.as_deref(),
        params.department.as_deref(),
        params.course.as_deref(),
    )?;
    let timeframe = match params.timeframe.as_deref() {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => Timeframe::AllTime,
    };
    let limit = clamp_limit(params.limit) as usize;

    let board = ranked_board(&state, &scope, timeframe).await?;
    let entries: Vec<LeaderboardEntry> = board.iter().take(limit).cloned().collect();

    Ok(Json(DataResponse { data: entries }))
}

/// Full ranked board for a scope and timeframe, from cache when fresh.
async fn ranked_board(
    state: &AppState,
    scope: &LeaderboardScope,
    timeframe: Timeframe,
) -> AppResult<Arc<Vec<LeaderboardEntry>>> {
    let scope_key = scope.scope_key();
    if let Some(board) = state.leaderboard_cache.get(&scope_key, timeframe).await {
        return Ok(board);
    }

    let generation = state.leaderboard_cache.generation();

    let (department, course) = match scope {
        LeaderboardScope::Global => (None, None),
        LeaderboardScope::Department(d) => (Some(d.as_str()), None),
        LeaderboardScope::Course(c) => (None, Some(c.as_str())),
    };
    let now = chrono::Utc::now();
    let rows = match timeframe.window_start(now) {
        None => LeaderboardRepo::all_time_scores(&state.pool, department, course).await?,
        Some(since) => {
            LeaderboardRepo::windowed_scores(&state.pool, department, course, since, now)
                .await?
        }
    };

    let scored: Vec<ScoredUser> = rows.into_iter().map(ScoredUser::from).collect();
    let ranked = assign_ranks(scored, &scope_key, timeframe);
    tracing::debug!(scope = %scope_key, %timeframe, entries = ranked.len(), "Leaderboard computed");

    Ok(state
        .leaderboard_cache
        .insert(&scope_key, timeframe, ranked, generation)
        .await)
}
