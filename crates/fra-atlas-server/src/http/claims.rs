// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiJson, ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_claim_params, DataEnvelope, ListEnvelope, QueryMap};
use fra_atlas_model::{unix_millis, ClaimStatus, NewClaim};
use fra_atlas_query::list_claims;
use fra_atlas_store::{insert_claim, update_claim_status};
use serde::Deserialize;
use tracing::info;

async fn list_with(state: AppState, query: QueryMap, path_state: Option<String>) -> HttpResult {
    let (filter, page) =
        parse_claim_params(&query, path_state.as_deref(), &state.api.page_limits)?;
    let page = run(&state, move |conn| Ok(list_claims(conn, &filter, page)?)).await?;
    Ok(Json(ListEnvelope::from(page)).into_response())
}

pub(crate) async fn list(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    list_with(state, query, None).await
}

pub(crate) async fn list_by_state(
    State(state): State<AppState>,
    Path(claim_state): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    list_with(state, query, Some(claim_state)).await
}

pub(crate) async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewClaim>,
) -> HttpResult {
    let claim = run(&state, move |conn| Ok(insert_claim(conn, body, unix_millis())?)).await?;
    info!(claim_id = %claim.claim_id, state = %claim.state, "claim created");
    Ok((StatusCode::CREATED, Json(DataEnvelope::ok(claim))).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StatusUpdate {
    status: ClaimStatus,
}

pub(crate) async fn update_status(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> HttpResult {
    let status = body.status;
    let claim = run(&state, move |conn| {
        Ok(update_claim_status(conn, claim_id.trim(), status)?)
    })
    .await?;
    info!(claim_id = %claim.claim_id, status = %status, "claim status updated");
    Ok(Json(DataEnvelope::ok(claim)).into_response())
}
