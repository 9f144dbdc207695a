// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool is closed")]
    PoolClosed,

    #[error("blocking task failed: {0}")]
    Task(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(
        "schema version {found} does not match expected {expected}; run `fra-atlas db migrate`"
    )]
    SchemaMismatch { found: i64, expected: i64 },

    #[error("invalid {0}")]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Turns a UNIQUE/PRIMARY KEY violation into `Conflict`, passing other errors through.
    pub(crate) fn from_insert(err: rusqlite::Error, conflict: impl FnOnce() -> String) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict(conflict())
        } else {
            Self::Sqlite(err)
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
