//! Offset pagination metadata.

/// Page metadata computed from a total row count and the limit/offset used
/// to fetch the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Page {
    /// `limit` must be > 0.
    pub fn new(total: u64, limit: u64, offset: u64) -> Self {
        let limit = limit.max(1);
        let page = offset / limit + 1;
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: Page,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page() {
        let page = Page::new(25, 10, 10);
        assert_eq!(page.page, 2);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn last_and_first_pages() {
        let last = Page::new(25, 10, 20);
        assert_eq!(last.page, 3);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let first = Page::new(25, 10, 0);
        assert_eq!(first.page, 1);
        assert!(first.has_next);
        assert!(!first.has_prev);
    }

    #[test]
    fn empty_set_has_no_pages() {
        let page = Page::new(0, 20, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }
}
