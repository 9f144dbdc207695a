// SPDX-License-Identifier: Apache-2.0

use super::response::{ApiJson, ApiQuery, HttpResult};
use super::run;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fra_atlas_api::{
    parse_id, parse_ticket_params, ApiError, DataEnvelope, ListEnvelope, MessageEnvelope,
};
use fra_atlas_model::{unix_millis, NewSupportTicket, TicketUpdate};
use fra_atlas_query::{list_tickets, QueryError};
use fra_atlas_store::rows::fetch_ticket;
use fra_atlas_store::{delete_ticket, insert_ticket, update_ticket};
use tracing::info;

pub(crate) async fn list(State(state): State<AppState>, ApiQuery(query): ApiQuery) -> HttpResult {
    let (filter, page) = parse_ticket_params(&query, &state.api.page_limits)?;
    let page = run(&state, move |conn| Ok(list_tickets(conn, &filter, page)?)).await?;
    Ok(Json(ListEnvelope::from(page)).into_response())
}

pub(crate) async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewSupportTicket>,
) -> HttpResult {
    let ticket = run(&state, move |conn| Ok(insert_ticket(conn, body, unix_millis())?)).await?;
    info!(ticket_number = %ticket.ticket_number, "support ticket created");
    Ok((StatusCode::CREATED, Json(DataEnvelope::ok(ticket))).into_response())
}

pub(crate) async fn read(State(state): State<AppState>, Path(raw_id): Path<String>) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    let ticket = run(&state, move |conn| {
        fetch_ticket(conn, id)
            .map_err(QueryError::from)?
            .ok_or_else(|| ApiError::not_found(format!("ticket {id} not found")))
    })
    .await?;
    Ok(Json(DataEnvelope::ok(ticket)).into_response())
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<TicketUpdate>,
) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    let ticket = run(&state, move |conn| Ok(update_ticket(conn, id, body)?)).await?;
    Ok(Json(DataEnvelope::ok(ticket)).into_response())
}

pub(crate) async fn remove(State(state): State<AppState>, Path(raw_id): Path<String>) -> HttpResult {
    let id = parse_id("id", &raw_id)?;
    run(&state, move |conn| Ok(delete_ticket(conn, id)?)).await?;
    Ok(Json(MessageEnvelope::ok(format!("ticket {id} deleted"))).into_response())
}
