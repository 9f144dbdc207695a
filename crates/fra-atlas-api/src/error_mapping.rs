// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[must_use]
pub fn status_code(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::InvalidQueryParameter | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::Conflict => 409,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::NotReady => 503,
        ApiErrorCode::Internal => 500,
    }
}

#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    status_code(error.code)
}
