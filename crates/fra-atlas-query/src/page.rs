// SPDX-License-Identifier: Apache-2.0

use crate::QueryError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>, limits: &PageLimits) -> Result<Self, QueryError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(limits.default_limit);
        if page == 0 {
            return Err(QueryError::validation("page must be >= 1"));
        }
        if limit == 0 || limit > limits.max_limit {
            return Err(QueryError::validation(format!(
                "limit must be within 1..={}",
                limits.max_limit
            )));
        }
        Ok(Self { page, limit })
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(req: PageRequest, total: u64) -> Self {
        Self {
            page: req.page,
            limit: req.limit,
            total,
            pages: page_count(total, req.limit),
        }
    }
}

/// `ceil(total / limit)`; a zero limit yields zero pages.
#[must_use]
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let req = PageRequest::new(None, None, &PageLimits::default()).expect("defaults");
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let limits = PageLimits::default();
        assert!(PageRequest::new(Some(0), None, &limits).is_err());
        assert!(PageRequest::new(None, Some(0), &limits).is_err());
        assert!(PageRequest::new(None, Some(101), &limits).is_err());
        assert!(PageRequest::new(None, Some(100), &limits).is_ok());
    }

    proptest! {
        #[test]
        fn pages_is_ceiling_of_total_over_limit(total in 0u64..100_000, limit in 1u32..=100) {
            let pages = page_count(total, limit);
            prop_assert!(pages * u64::from(limit) >= total);
            if pages > 0 {
                prop_assert!((pages - 1) * u64::from(limit) < total);
            } else {
                prop_assert_eq!(total, 0);
            }
        }

        #[test]
        fn offset_follows_page_and_limit(page in 1u32..10_000, limit in 1u32..=100) {
            let req = PageRequest::new(Some(page), Some(limit), &PageLimits::default()).expect("valid");
            prop_assert_eq!(req.offset(), u64::from(page - 1) * u64::from(limit));
        }
    }
}
