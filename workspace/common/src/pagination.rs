use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::PostKind;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u64 = 12;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Builds a request, clamping `limit` to `max_limit`. Both `page` and
    /// `limit` are expected to be at least 1.
    pub fn new(page: u64, limit: u64, max_limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Zero-based page index for the ORM paginator.
    pub fn index(&self) -> u64 {
        self.page - 1
    }

    /// Rows to skip, or `None` when the page lies beyond any addressable row.
    pub fn offset(&self) -> Option<u64> {
        self.index().checked_mul(self.limit)
    }

    /// Whether this page can hold any of `total` rows.
    pub fn reaches(&self, total: u64) -> bool {
        self.offset().is_some_and(|offset| offset < total)
    }
}

/// Offset pagination metadata returned next to listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    /// Listing kind; only present on post listings
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PostKind>,
}

impl PaginationMeta {
    pub fn new(kind: PostKind, page: u64, limit: u64, total_count: u64) -> Self {
        Self {
            kind: Some(kind),
            ..Self::untyped(page, limit, total_count)
        }
    }

    pub fn untyped(page: u64, limit: u64, total_count: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_count.div_ceil(limit)
        };
        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
            kind: None,
        }
    }
}
