// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{parse_state_param, DataEnvelope};
use fra_atlas_query::boundaries_geojson;

/// GeoJSON `FeatureCollection` under `data`.
pub(crate) async fn village_boundaries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery,
) -> HttpResult {
    let claim_state = parse_state_param(&query)?;
    let collection = run(&state, move |conn| {
        Ok(boundaries_geojson(conn, claim_state.as_deref())?)
    })
    .await?;
    Ok(Json(DataEnvelope::ok(collection)).into_response())
}
