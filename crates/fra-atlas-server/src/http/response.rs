// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fra_atlas_api::{map_error, ApiError, ErrorEnvelope, QueryMap};
use serde::de::DeserializeOwned;

/// `ApiError` rendered as the failure envelope with its mapped status.
#[derive(Debug)]
pub struct HttpError(pub ApiError);

impl From<ApiError> for HttpError {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(map_error(&self.0)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(self.0))).into_response()
    }
}

pub type HttpResult<T = Response> = Result<T, HttpError>;

/// Query string as a flat map; malformed strings become `InvalidQueryParameter`.
pub struct ApiQuery(pub QueryMap);

#[async_trait]
impl<S> FromRequestParts<S> for ApiQuery
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<QueryMap>::from_request_parts(parts, state).await {
            Ok(Query(map)) => Ok(Self(map)),
            Err(rejection) => Err(HttpError(ApiError::invalid_param(
                "query",
                &rejection.body_text(),
            ))),
        }
    }
}

/// JSON body whose rejections use the failure envelope.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HttpError(json_rejection(
                &rejection,
                state.api.max_body_bytes,
            ))),
        }
    }
}

fn json_rejection(rejection: &JsonRejection, limit_bytes: usize) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large(limit_bytes);
    }
    ApiError::validation_failed("body", &rejection.body_text())
}
