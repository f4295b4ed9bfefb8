//! Route definitions for recording actions.

use axum::routing::post;
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Routes mounted at `/actions`.
///
/// ```text
/// POST   /                -> record_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(actions::record_action))
}
