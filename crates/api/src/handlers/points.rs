//! Handler for stateless point calculation.

use axum::response::IntoResponse;
use axum::Json;
use studyhub_core::actions::UserAction;
use studyhub_core::points::calculate_points;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

/// POST /api/v1/points/calculate
///
/// Classify an action without recording it. The body is a bare action
/// object, e.g. `{"type": "upload_resource", "resource_id": 1, "resource_type": "notes"}`.
pub async fn calculate(
    RequireAuth(_user): RequireAuth,
    Json(body): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let action = UserAction::from_json(body)?;
    let classification = calculate_points(&action)?;
    Ok(Json(DataResponse {
        data: classification,
    }))
}
