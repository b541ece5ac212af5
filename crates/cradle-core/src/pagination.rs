//! Offset pagination shared by every listing endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Larger page sizes are clamped down to this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Both values must be positive. A zero page size is rejected here so
    /// `page_count` can never divide by zero; sizes above `MAX_PAGE_SIZE`
    /// are clamped.
    pub fn new(page: u32, page_size: u32) -> Result<Self, AppError> {
        if page_size == 0 {
            return Err(AppError::InvalidInput(
                "page_size must be a positive integer".to_string(),
            ));
        }
        if page == 0 {
            return Err(AppError::InvalidInput(
                "page must be a positive integer".to_string(),
            ));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);
        (i64::from(page) - 1)
            .checked_mul(i64::from(page_size))
            .ok_or_else(|| AppError::InvalidInput("page is out of range".to_string()))?;
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// `ceil(total / page_size)`
    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let size = i64::from(self.page_size);
        total / size + i64::from(total % size != 0)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination block of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: i64,
}

/// One page of results plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
            page_count: request.page_count(total),
        }
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            page_count: self.page_count,
        }
    }
}
