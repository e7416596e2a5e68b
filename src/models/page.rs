use serde::{Deserialize, Serialize};

use crate::constants::MAX_PAGE_SIZE;

/// `?page=&limit=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Resolve query parameters against the configured default size
    ///
    /// Out-of-range values are clamped rather than rejected.
    pub fn from_params(params: PageParams, default_size: i64) -> Self {
        let size = params.limit.unwrap_or(default_size).clamp(1, MAX_PAGE_SIZE);
        let page = params.page.unwrap_or(1).max(1);
        Self { page, size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

/// Paginated list response
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, request: PageRequest) -> Self {
        let next = (request.page.saturating_mul(request.size) < count).then(|| request.page + 1);
        let previous = (request.page > 1).then(|| {
            // Point past-the-end pages back at the last real page
            let last_page = ((count + request.size - 1) / request.size).max(1);
            (request.page - 1).min(last_page)
        });

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamping() {
        let request = PageRequest::from_params(PageParams::default(), 6);
        assert_eq!(request, PageRequest { page: 1, size: 6 });
        assert_eq!(request.offset(), 0);

        let request = PageRequest::from_params(
            PageParams {
                page: Some(0),
                limit: Some(1000),
            },
            6,
        );
        assert_eq!(request, PageRequest { page: 1, size: MAX_PAGE_SIZE });

        let request = PageRequest::from_params(
            PageParams {
                page: Some(3),
                limit: Some(5),
            },
            6,
        );
        assert_eq!(request.offset(), 10);
    }

    #[test]
    fn test_page_links() {
        let first = Page::new(vec![1, 2], 5, PageRequest { page: 1, size: 2 });
        assert_eq!(first.next, Some(2));
        assert_eq!(first.previous, None);

        let last = Page::new(vec![5], 5, PageRequest { page: 3, size: 2 });
        assert_eq!(last.next, None);
        assert_eq!(last.previous, Some(2));

        let beyond: Page<i32> = Page::new(vec![], 5, PageRequest { page: 9, size: 2 });
        assert_eq!(beyond.next, None);
        assert_eq!(beyond.previous, Some(3));
    }

    #[test]
    fn test_huge_page_number() {
        let request = PageRequest::from_params(
            PageParams {
                page: Some(i64::MAX),
                limit: None,
            },
            6,
        );
        assert_eq!(request.offset(), i64::MAX);

        let page: Page<i64> = Page::new(vec![], 0, request);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(1));

        let page: Page<i64> = Page::new(vec![], 20, PageRequest { page: i64::MAX, size: 6 });
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(4));
    }

    #[test]
    fn test_empty_page() {
        let page: Page<i32> = Page::new(vec![], 0, PageRequest { page: 1, size: 6 });
        assert_eq!(page.count, 0);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
    }
}
