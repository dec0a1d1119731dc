//! Pagination arithmetic.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size a caller may request; larger values are capped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Invalid pagination input.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page numbers start at 1")]
    ZeroPage,
    #[error("page size must be positive")]
    ZeroLimit,
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Create a page request. `limit` above [`MAX_PAGE_SIZE`] is capped.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if `page` or `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        let limit = if limit > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            limit
        };
        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    pub(crate) fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        let offset = u64::from(self.page - 1) * u64::from(self.limit);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }

    /// `ceil(total / limit)`.
    #[must_use]
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit_usize())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of catalog results plus what a caller needs to render
/// pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage<T> {
    pub products: Vec<T>,
    pub total_products: usize,
    pub total_pages: usize,
    pub current_page: u32,
}

impl<T> CatalogPage<T> {
    /// An empty result echoing the requested page.
    #[must_use]
    pub const fn empty(current_page: u32) -> Self {
        Self {
            products: Vec::new(),
            total_products: 0,
            total_pages: 0,
            current_page,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_and_limit_rejected() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::ZeroPage));
        assert_eq!(PageRequest::new(1, 0), Err(PageError::ZeroLimit));
    }

    #[test]
    fn test_limit_is_capped() {
        let page = PageRequest::new(2, 10_000).unwrap();
        assert_eq!(page.limit(), MAX_PAGE_SIZE);
        assert_eq!(page.offset(), MAX_PAGE_SIZE as usize);
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest::new(1, 12).unwrap();
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(12), 1);
        assert_eq!(page.total_pages(13), 2);
    }
}
