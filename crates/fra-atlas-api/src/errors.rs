// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::ValidationError;
use fra_atlas_query::{QueryError, QueryErrorCode};
use fra_atlas_store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    ValidationFailed,
    NotFound,
    Conflict,
    PayloadTooLarge,
    NotReady,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 7] = [
    ApiErrorCode::InvalidQueryParameter,
    ApiErrorCode::ValidationFailed,
    ApiErrorCode::NotFound,
    ApiErrorCode::Conflict,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::NotReady,
    ApiErrorCode::Internal,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn unknown_param(name: &str, allowed: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("unknown query parameter: {name}"),
            json!({"parameter": name, "allowed": allowed}),
        )
    }

    #[must_use]
    pub fn validation_failed(field: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("validation failed: {field}: {reason}"),
            json!({"field_errors": [{"field": field, "reason": reason}]}),
        )
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message, json!({}))
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Conflict, message, json!({}))
    }

    #[must_use]
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({"limit_bytes": limit_bytes}),
        )
    }

    #[must_use]
    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotReady, message, json!({}))
    }

    /// Static client-facing message; the cause is logged, never returned.
    #[must_use]
    pub fn internal(cause: &dyn std::fmt::Display) -> Self {
        error!(cause = %cause, "internal error");
        Self::new(ApiErrorCode::Internal, "internal server error", json!({}))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::validation_failed(value.field, &value.reason)
    }
}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        match value.code {
            QueryErrorCode::Validation => Self::new(
                ApiErrorCode::InvalidQueryParameter,
                value.message,
                json!({}),
            ),
            _ => Self::internal(&value),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(e) => e.into(),
            StoreError::NotFound(message) => Self::not_found(message),
            StoreError::Conflict(message) => Self::conflict(message),
            StoreError::PoolClosed => Self::not_ready("database pool is closed"),
            mismatch @ StoreError::SchemaMismatch { .. } => Self::not_ready(mismatch.to_string()),
            other => Self::internal(&other),
        }
    }
}
