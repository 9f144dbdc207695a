// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! HTTP-facing contract: stable error codes and their status mapping,
//! strict query-parameter parsing, JSON envelopes and the OpenAPI document.

mod error_mapping;
mod errors;
mod openapi;
mod params;
mod responses;

pub use error_mapping::{map_error, status_code};
pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES};
pub use openapi::openapi_v1_spec;
pub use params::{
    parse_claim_params, parse_document_params, parse_id, parse_no_params, parse_page,
    parse_state_param, parse_ticket_params, parse_village_params, reject_unknown, QueryMap,
    PAGE_KEYS,
};
pub use responses::{DataEnvelope, ErrorEnvelope, ListEnvelope, MessageEnvelope};

pub const CRATE_NAME: &str = "fra-atlas-api";
