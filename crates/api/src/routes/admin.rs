//! Route definitions for admin-only endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /analytics       -> get_analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/analytics", get(analytics::get_analytics))
}
