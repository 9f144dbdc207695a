// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! axum front end for FRA Atlas: routing, request tracing, error envelopes
//! and the scheme recommendation glue.

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use fra_atlas_store::Database;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod config;
mod http;
mod middleware;
pub mod recommend;

pub use config::{ApiConfig, LlmConfig, ServerConfig};
pub use recommend::CompletionProvider;

pub const CRATE_NAME: &str = "fra-atlas-server";

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub api: Arc<ApiConfig>,
    pub completion: Arc<dyn CompletionProvider>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, api: ApiConfig, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            db,
            api: Arc::new(api),
            completion,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));
    if api.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = api
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn build_router(state: AppState) -> Router {
    use crate::http::{
        admin, claims, decision_support, documents, geo, meta, registry, stats, tickets, villages,
    };

    Router::new()
        .route("/healthz", get(meta::healthz))
        .route("/api/openapi.json", get(meta::openapi))
        .route("/api/claims", get(claims::list).post(claims::create))
        .route("/api/claims/:key", get(claims::list_by_state))
        .route("/api/claims/:key/status", patch(claims::update_status))
        .route("/api/stats", get(stats::by_state))
        .route("/api/stats/:state", get(stats::by_district))
        .route("/api/stats/:state/:district", get(stats::district))
        .route("/api/villages", get(villages::list))
        .route("/api/villages/:id/assets", get(villages::assets))
        .route("/api/villages/:id/enhanced", get(villages::enhanced))
        .route("/api/patta-holders/state/:state", get(registry::patta_holders_by_state))
        .route("/api/patta-holders/:claim_id", get(registry::patta_holders_by_claim))
        .route(
            "/api/patta-holders-coordinates",
            get(registry::patta_holders_with_coordinates),
        )
        .route("/api/land-parcels/:claim_id", get(registry::land_parcels))
        .route("/api/village-boundaries", get(geo::village_boundaries))
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/health", get(admin::health))
        .route(
            "/api/decision-support/recommendations/:village_id",
            post(decision_support::recommendations),
        )
        .route("/api/decision-support/schemes", get(decision_support::schemes))
        .route("/api/documents", get(documents::list).post(documents::create))
        .route(
            "/api/documents/:id",
            get(documents::read)
                .patch(documents::update)
                .delete(documents::remove),
        )
        .route("/api/support-tickets", get(tickets::list).post(tickets::create))
        .route(
            "/api/support-tickets/:id",
            get(tickets::read).patch(tickets::update).delete(tickets::remove),
        )
        .fallback(meta::not_found)
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(cors_layer(&state.api))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}
