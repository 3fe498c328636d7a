use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numbered page request as used by the listing views (`?page=N`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Build a request from raw query values, clamping into `1..=max_per_page`
    /// and treating a missing or zero page as the first page.
    pub fn new(page: Option<u64>, per_page: Option<u64>, default_per_page: u64, max_per_page: u64) -> Self {
        let max = max_per_page.max(1);
        let per_page = per_page.unwrap_or(default_per_page).clamp(1, max);
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let last_page = total.div_ceil(request.per_page).max(1);
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            last_page,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.last_page
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Create a new page with items and page info
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Create an empty page for the given request
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::new(request, 0),
        }
    }

    /// Map items while preserving page_info (Domain->DTO mapping convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}
