// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Echoes a caller-supplied `x-request-id` or mints `req-<16 hex digits>`.
#[must_use]
pub(crate) fn request_id(headers: &HeaderMap, seed: &AtomicU64) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{id:016x}")
        })
}

pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |p| p.as_str().to_string());
    let request_id = request_id(request.headers(), &state.request_id_seed);

    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        route = %route,
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "request completed");
    });
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_supplied_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" req-abc "));
        let seed = AtomicU64::new(7);
        assert_eq!(request_id(&headers, &seed), "req-abc");
        assert_eq!(seed.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn mints_sequential_ids_when_absent() {
        let seed = AtomicU64::new(255);
        let headers = HeaderMap::new();
        assert_eq!(request_id(&headers, &seed), "req-00000000000000ff");
        assert_eq!(request_id(&headers, &seed), "req-0000000000000100");
    }
}
