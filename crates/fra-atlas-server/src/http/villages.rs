// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_id, parse_no_params, parse_village_params, ApiError, DataEnvelope};
use fra_atlas_query::{list_villages, village_assets, village_enhanced};

fn village_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("village {id} not found"))
}

pub(crate) async fn list(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    let filter = parse_village_params(&query)?;
    let villages = run(&state, move |conn| Ok(list_villages(conn, &filter)?)).await?;
    Ok(Json(DataEnvelope::ok(villages)).into_response())
}

pub(crate) async fn assets(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let id = parse_id("id", &raw_id)?;
    let assets = run(&state, move |conn| {
        village_assets(conn, id)?.ok_or_else(|| village_not_found(id))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(assets)).into_response())
}

pub(crate) async fn enhanced(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let id = parse_id("id", &raw_id)?;
    let profile = run(&state, move |conn| {
        village_enhanced(conn, id)?.ok_or_else(|| village_not_found(id))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(profile)).into_response())
}
