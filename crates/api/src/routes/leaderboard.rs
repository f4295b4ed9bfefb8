//! Route definitions for leaderboards.

use axum::routing::get;
use axum::Router;

use crate::handlers::leaderboard;
use crate::state::AppState;

/// Routes mounted at `/leaderboard`.
///
/// ```text
/// GET    /                -> get_leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(leaderboard::get_leaderboard))
}
