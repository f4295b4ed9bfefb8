pub mod achievements;
pub mod actions;
pub mod admin;
pub mod health;
pub mod leaderboard;
pub mod points;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /points/calculate                       classify an action (POST)
///
/// /actions                                record an action (POST)
///
/// /users/{id}/progress                    recomputed progress
/// /users/{id}/actions                     paginated ledger (self or admin)
/// /users/{id}/achievements                unlocked achievements
/// /users/{id}/achievements/check          evaluate and unlock (POST, self or admin)
///
/// /achievements                           static catalog
///
/// /leaderboard                            scoped, windowed ranking
///
/// /admin/analytics                        analytics rollup (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/points", points::router())
        .nest("/actions", actions::router())
        .nest("/users", users::router())
        .nest("/achievements", achievements::router())
        .nest("/leaderboard", leaderboard::router())
        .nest("/admin", admin::router())
}
