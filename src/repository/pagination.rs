//! # Pagination
//!
//! Page numbers are 1-indexed; page `p` of size `n` covers positions
//! `[(p - 1) * n, p * n)` of the full ordered result.

use serde::{Deserialize, Serialize};

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// Largest page size the service accepts
pub const MAX_PAGE_SIZE: u64 = 1000;

/// A requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: u64,

    /// Records per page
    pub per_page: u64,
}

impl PageRequest {
    /// Create a page request; page numbers below 1 are treated as 1
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// Number of records before this page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Records returned by a listing plus the total number of matches
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Listing<T> {
    /// Transform the records, keeping the total
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Number of pages needed for `total` records
pub fn total_pages(total: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Paginated response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<T>,
}

impl<T> PageEnvelope<T> {
    /// Wrap one page of a listing
    pub fn new(request: PageRequest, listing: Listing<T>) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total: listing.total,
            total_pages: total_pages(listing.total, request.per_page),
            data: listing.items,
        }
    }
}
