// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiJson, ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{
    parse_document_params, parse_id, ApiError, DataEnvelope, ListEnvelope, MessageEnvelope,
};
use fra_atlas_model::{DocumentUpdate, NewDocument};
use fra_atlas_query::{list_documents, QueryError};
use fra_atlas_store::rows::fetch_document;
use fra_atlas_store::{delete_document, insert_document, update_document};
use tracing::info;

pub(crate) async fn list(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    let (filter, page) = parse_document_params(&query, &state.api.page_limits)?;
    let page = run(&state, move |conn| Ok(list_documents(conn, &filter, page)?)).await?;
    Ok(Json(ListEnvelope::from(page)).into_response())
}

pub(crate) async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewDocument>,
) -> HttpResult {
    let document = run(&state, move |conn| Ok(insert_document(conn, body)?)).await?;
    info!(document_id = document.id, "document created");
    Ok((StatusCode::CREATED, Json(DataEnvelope::ok(document))).into_response())
}

pub(crate) async fn read(State(state): State<AppState>, Path(raw_id): Path<String>) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    let document = run(&state, move |conn| {
        fetch_document(conn, id)
            .map_err(QueryError::from)?
            .ok_or_else(|| ApiError::not_found(format!("document {id} not found")))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(document)).into_response())
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<DocumentUpdate>,
) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    let document = run(&state, move |conn| Ok(update_document(conn, id, body)?)).await?;
    Ok(Json(DataEnvelope::ok(document)).into_response())
}

pub(crate) async fn remove(State(state): State<AppState>, Path(raw_id): Path<String>) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    run(&state, move |conn| Ok(delete_document(conn, id)?)).await?;
    info!(document_id = id, "document deleted");
    Ok(Json(MessageEnvelope::ok(format!("document {id} deleted"))).into_response())
}
