//! Route definitions for per-user progress, ledger and achievements.
//!
//! All endpoints require authentication; ledger reads and achievement checks
//! are restricted to the user themselves or an admin.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{actions, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}/progress               -> get_progress
/// GET    /{id}/actions                -> list_user_actions
/// GET    /{id}/achievements           -> list_achievements
/// POST   /{id}/achievements/check     -> check_achievements
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/progress", get(users::get_progress))
        .route("/{id}/actions", get(actions::list_user_actions))
        .route("/{id}/achievements", get(users::list_achievements))
        .route(
            "/{id}/achievements/check",
            post(users::check_achievements),
        )
}
