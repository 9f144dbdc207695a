// SPDX-License-Identifier: Apache-2.0

pub(crate) mod admin;
pub(crate) mod claims;
pub(crate) mod decision_support;
pub(crate) mod documents;
pub(crate) mod geo;
pub(crate) mod meta;
pub(crate) mod registry;
pub(crate) mod response;
pub(crate) mod stats;
pub(crate) mod tickets;
pub(crate) mod villages;

use crate::AppState;
use fra_atlas_api::ApiError;
use response::HttpError;
use rusqlite::Connection;

/// Runs blocking store work on a pooled connection.
pub(crate) async fn run<T, F>(state: &AppState, f: F) -> Result<T, HttpError>
where
    F: FnOnce(&mut Connection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    state.db.with_connection(f).await.map_err(HttpError)
}
