// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::ValidationError;
use fra_atlas_store::rows::is_corrupt_row;
use fra_atlas_store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryErrorCode {
    Validation,
    Sql,
    /// Stored content failed to decode (bad enum text or unparsable geometry).
    Corrupt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
}

impl QueryError {
    #[must_use]
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::Validation, message)
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for QueryError {}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        if is_corrupt_row(&value) {
            Self::new(QueryErrorCode::Corrupt, value.to_string())
        } else {
            Self::new(QueryErrorCode::Sql, value.to_string())
        }
    }
}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Sqlite(e) => e.into(),
            StoreError::Validation(e) => e.into(),
            other => Self::new(QueryErrorCode::Sql, other.to_string()),
        }
    }
}
