// SPDX-License-Identifier: Apache-2.0

//! Patta holder and land parcel lookups.

use super::response::{ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_no_params, parse_state_param, ApiError, DataEnvelope};
use fra_atlas_query::{
    land_parcels_by_claim, patta_holders_by_claim as holders_by_claim,
    patta_holders_by_state as holders_by_state, patta_holders_with_coordinates as holders_with_points,
};

pub(crate) async fn patta_holders_by_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let holders = run(&state, move |conn| {
        holders_by_claim(conn, &claim_id)?
            .ok_or_else(|| ApiError::not_found(format!("claim {} not found", claim_id.trim())))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(holders)).into_response())
}

pub(crate) async fn patta_holders_by_state(
    State(state): State<AppState>,
    Path(claim_state): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let holders = run(&state, move |conn| Ok(holders_by_state(conn, &claim_state)?)).await?;
    Ok(Json(DataEnvelope::ok(holders)).into_response())
}

pub(crate) async fn patta_holders_with_coordinates(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    let claim_state = parse_state_param(&query)?;
    let points = run(&state, move |conn| {
        Ok(holders_with_points(conn, claim_state.as_deref())?)
    })
    .await?;
    Ok(Json(DataEnvelope::ok(points)).into_response())
}

pub(crate) async fn land_parcels(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let parcels = run(&state, move |conn| {
        land_parcels_by_claim(conn, &claim_id)?
            .ok_or_else(|| ApiError::not_found(format!("claim {} not found", claim_id.trim())))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(parcels)).into_response())
}
