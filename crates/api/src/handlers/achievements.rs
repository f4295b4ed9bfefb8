//! Handler for the static achievement catalog.

use axum::response::IntoResponse;
use axum::Json;
use studyhub_core::achievements::default_catalog;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

/// GET /api/v1/achievements
pub async fn list_catalog(RequireAuth(_user): RequireAuth) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: default_catalog(),
    }))
}
