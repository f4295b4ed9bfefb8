//! Route definitions for stateless point calculation.

use axum::routing::post;
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

/// Routes mounted at `/points`.
///
/// ```text
/// POST   /calculate       -> calculate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/calculate", post(points::calculate))
}
