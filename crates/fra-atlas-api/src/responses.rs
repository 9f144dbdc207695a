// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use fra_atlas_query::{Page, Pagination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T, S> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub stats: S,
}

impl<T, S> From<Page<T, S>> for ListEnvelope<T, S> {
    fn from(page: Page<T, S>) -> Self {
        Self {
            success: true,
            data: page.data,
            pagination: page.pagination,
            stats: page.stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl MessageEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    pub error: ApiError,
}

impl From<ApiError> for ErrorEnvelope {
    fn from(error: ApiError) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiErrorCode;
    use serde_json::json;

    #[test]
    fn error_envelope_repeats_message_at_top_level() {
        let env = ErrorEnvelope::from(ApiError::not_found("claim FRA_X_1 not found"));
        let value = serde_json::to_value(&env).expect("json");
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "claim FRA_X_1 not found");
        assert_eq!(value["error"]["code"], "NotFound");
        assert_eq!(env.error.code, ApiErrorCode::NotFound);
    }

    #[test]
    fn list_envelope_carries_pagination_and_stats() {
        let page = Page {
            data: vec![1, 2],
            pagination: Pagination {
                page: 1,
                limit: 2,
                total: 5,
                pages: 3,
            },
            stats: json!({"by_status": {}}),
        };
        let value = serde_json::to_value(ListEnvelope::from(page)).expect("json");
        assert_eq!(value["success"], true);
        assert_eq!(value["pagination"]["pages"], 3);
        assert_eq!(value["data"], json!([1, 2]));
    }
}
