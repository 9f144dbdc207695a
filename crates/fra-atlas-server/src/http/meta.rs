// SPDX-License-Identifier: Apache-2.0

use super::response::HttpError;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{openapi_v1_spec, ApiError};
use serde_json::json;

pub(crate) async fn healthz() -> impl IntoResponse {
    Json(json!({"success": true, "status": "ok"}))
}

pub(crate) async fn openapi() -> impl IntoResponse {
    Json(openapi_v1_spec())
}

pub(crate) async fn not_found(uri: Uri) -> HttpError {
    HttpError(ApiError::not_found(format!("route {} not found", uri.path())))
}
