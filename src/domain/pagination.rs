//! Page arithmetic shared by every paginated listing

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Highest page whose row offset still fits a signed 64-bit SQL parameter
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Query-string pagination parameters (`?page=2&limit=20`)
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE)
    }

    pub fn limit(&self) -> u64 {
        match self.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(l) => l.min(MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// One page of results plus the numbers a client needs to render a pager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let limit = request.limit();
        Self {
            items,
            total,
            page: request.page(),
            limit,
            total_pages: total.div_ceil(limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_or_zero_values() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_LIMIT);
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(0, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_clamped() {
        let req = PageRequest::new(3, 500);
        assert_eq!(req.limit(), MAX_LIMIT);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn huge_page_is_clamped() {
        let req = PageRequest::new(u64::MAX, MAX_LIMIT);
        assert_eq!(req.page(), MAX_PAGE);
        assert!(req.offset() <= i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::new(1, 10);
        assert_eq!(Paginated::<i32>::new(vec![], 0, &req).total_pages, 0);
        assert_eq!(Paginated::<i32>::new(vec![], 10, &req).total_pages, 1);
        assert_eq!(Paginated::<i32>::new(vec![], 11, &req).total_pages, 2);
    }

    #[test]
    fn map_keeps_page_metadata() {
        let req = PageRequest::new(2, 2);
        let page = Paginated::new(vec![1, 2], 5, &req).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }
}
