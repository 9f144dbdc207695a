// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiQuery, HttpError, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_no_params, ApiError, DataEnvelope};
use fra_atlas_query::{admin_stats, store_health};
use tracing::warn;

pub(crate) async fn stats(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    parse_no_params(&query)?;
    let stats = run(&state, |conn| Ok(admin_stats(conn)?)).await?;
    Ok(Json(DataEnvelope::ok(stats)).into_response())
}

/// Any store failure is reported as not ready.
pub(crate) async fn health(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    parse_no_params(&query)?;
    match run(&state, |conn| Ok(store_health(conn)?)).await {
        Ok(health) => Ok(Json(DataEnvelope::ok(health)).into_response()),
        Err(HttpError(err)) => {
            warn!(code = ?err.code, message = %err.message, "store health check failed");
            Err(HttpError(ApiError::not_ready("store unavailable")))
        }
    }
}
