// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use fra_atlas_model::{ClaimStatus, ClaimType, DocumentStatus, TicketPriority, TicketStatus};
use fra_atlas_query::{
    filter_value, ClaimFilter, DocumentFilter, PageLimits, PageRequest, TicketFilter,
    VillageFilter,
};
use std::collections::BTreeMap;

pub type QueryMap = BTreeMap<String, String>;

pub const PAGE_KEYS: [&str; 2] = ["page", "limit"];

/// Rejects any key outside `allowed` (plus the pagination keys when `paged`).
pub fn reject_unknown(query: &QueryMap, allowed: &[&str], paged: bool) -> Result<(), ApiError> {
    for key in query.keys() {
        let known = allowed.contains(&key.as_str()) || (paged && PAGE_KEYS.contains(&key.as_str()));
        if !known {
            let mut all: Vec<&str> = allowed.to_vec();
            if paged {
                all.extend(PAGE_KEYS);
            }
            return Err(ApiError::unknown_param(key, &all));
        }
    }
    Ok(())
}

fn text(query: &QueryMap, key: &str) -> Option<String> {
    query.get(key).and_then(|raw| filter_value(raw)).map(str::to_string)
}

fn enum_param<T>(
    query: &QueryMap,
    key: &str,
    parse: fn(&str) -> Result<T, fra_atlas_model::ValidationError>,
) -> Result<Option<T>, ApiError> {
    match query.get(key) {
        None => Ok(None),
        Some(raw) => match filter_value(raw) {
            None => Ok(None),
            Some(value) => parse(value)
                .map(Some)
                .map_err(|_| ApiError::invalid_param(key, raw)),
        },
    }
}

fn number_param(query: &QueryMap, key: &str) -> Result<Option<u32>, ApiError> {
    match query.get(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ApiError::invalid_param(key, raw)),
    }
}

pub fn parse_page(query: &QueryMap, limits: &PageLimits) -> Result<PageRequest, ApiError> {
    let page = number_param(query, "page")?;
    let limit = number_param(query, "limit")?;
    PageRequest::new(page, limit, limits).map_err(|e| {
        let key = if e.message.starts_with("page") { "page" } else { "limit" };
        let raw = query.get(key).map_or("", String::as_str);
        let mut err = ApiError::invalid_param(key, raw);
        err.message = format!("invalid query parameter: {}", e.message);
        err
    })
}

/// Claims list params. `path_state` overrides any `state` query value.
pub fn parse_claim_params(
    query: &QueryMap,
    path_state: Option<&str>,
    limits: &PageLimits,
) -> Result<(ClaimFilter, PageRequest), ApiError> {
    reject_unknown(query, ClaimFilter::KEYS, true)?;
    let state = match path_state {
        Some(state) => filter_value(state).map(str::to_string),
        None => text(query, "state"),
    };
    let filter = ClaimFilter {
        state,
        district: text(query, "district"),
        village: text(query, "village"),
        status: enum_param(query, "status", ClaimStatus::parse)?,
        claim_type: enum_param(query, "claim_type", ClaimType::parse)?,
        search: text(query, "search"),
    };
    Ok((filter, parse_page(query, limits)?))
}

pub fn parse_document_params(
    query: &QueryMap,
    limits: &PageLimits,
) -> Result<(DocumentFilter, PageRequest), ApiError> {
    reject_unknown(query, DocumentFilter::KEYS, true)?;
    let filter = DocumentFilter {
        status: enum_param(query, "status", DocumentStatus::parse)?,
        document_type: text(query, "document_type"),
        claim_id: text(query, "claim_id"),
        search: text(query, "search"),
    };
    Ok((filter, parse_page(query, limits)?))
}

pub fn parse_ticket_params(
    query: &QueryMap,
    limits: &PageLimits,
) -> Result<(TicketFilter, PageRequest), ApiError> {
    reject_unknown(query, TicketFilter::KEYS, true)?;
    let filter = TicketFilter {
        status: enum_param(query, "status", TicketStatus::parse)?,
        priority: enum_param(query, "priority", TicketPriority::parse)?,
        category: text(query, "category"),
        search: text(query, "search"),
    };
    Ok((filter, parse_page(query, limits)?))
}

pub fn parse_village_params(query: &QueryMap) -> Result<VillageFilter, ApiError> {
    reject_unknown(query, VillageFilter::KEYS, false)?;
    Ok(VillageFilter {
        state: text(query, "state"),
        district: text(query, "district"),
    })
}

/// For endpoints whose only filter is an optional `state`.
pub fn parse_state_param(query: &QueryMap) -> Result<Option<String>, ApiError> {
    reject_unknown(query, &["state"], false)?;
    Ok(text(query, "state"))
}

/// For endpoints that accept no query parameters.
pub fn parse_no_params(query: &QueryMap) -> Result<(), ApiError> {
    reject_unknown(query, &[], false)
}

/// Positive integer path id.
pub fn parse_id(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::invalid_param(name, raw))
}
