// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiQuery, HttpResult};
use super::run;
use crate::recommend::{gather_context, recommend, Recommendation, RecommendationSource};
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_id, parse_no_params, ApiError, DataEnvelope};
use fra_atlas_query::active_schemes;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct VillageRef {
    id: i64,
    village_name: String,
    district: String,
    state: String,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    success: bool,
    source: RecommendationSource,
    village: VillageRef,
    recommendations: Vec<Recommendation>,
}

/// Always 200 for a known village; provider failures fall back silently.
pub(crate) async fn recommendations(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    parse_no_params(&query)?;
    let village_id = parse_id("village_id", &raw_id)?;
    let ctx = run(&state, move |conn| {
        gather_context(conn, village_id)?
            .ok_or_else(|| ApiError::not_found(format!("village {village_id} not found")))
    })
    .await?;
    let outcome = recommend(state.completion.as_ref(), &ctx).await;
    let village = ctx.village;
    Ok(Json(RecommendationResponse {
        success: true,
        source: outcome.source,
        village: VillageRef {
            id: village.id,
            village_name: village.village_name,
            district: village.district,
            state: village.state,
        },
        recommendations: outcome.recommendations,
    })
    .into_response())
}

pub(crate) async fn schemes(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    parse_no_params(&query)?;
    let schemes = run(&state, |conn| Ok(active_schemes(conn)?)).await?;
    Ok(Json(DataEnvelope::ok(schemes)).into_response())
}
