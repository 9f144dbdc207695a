// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_no_params, DataEnvelope};
use fra_atlas_query::{district_rollups, district_summary, state_rollups};

pub(crate) async fn by_state(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    parse_no_params(&query)?;
    let rollups = run(&state, |conn| Ok(state_rollups(conn)?)).await?;
    Ok(Json(DataEnvelope::ok(rollups)).into_response())
}

pub(crate) async fn by_district(
    State(state): State<AppState>,
    Path(claim_state): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let rollups = run(&state, move |conn| Ok(district_rollups(conn, &claim_state)?)).await?;
    Ok(Json(DataEnvelope::ok(rollups)).into_response())
}

pub(crate) async fn district(
    State(state): State<AppState>,
    Path((claim_state, district)): Path<(String, String)>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let summary = run(&state, move |conn| {
        Ok(district_summary(conn, &claim_state, &district)?)
    })
    .await?;
    Ok(Json(DataEnvelope::ok(summary)).into_response())
}
