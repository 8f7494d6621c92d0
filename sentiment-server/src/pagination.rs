//! Pagination utilities for history and admin listings

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Largest page size honored; larger configured values are capped
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub page_size: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Rows to skip before this page
    pub offset: i64,
}

/// Calculate pagination metadata from total results and requested page
///
/// The page is clamped to `[1, total_pages]`. A non-positive page size falls
/// back to [`DEFAULT_PAGE_SIZE`] and one above [`MAX_PAGE_SIZE`] is capped.
///
/// # Examples
/// ```
/// use sentiment_server::pagination::calculate_pagination;
///
/// // 60 results at 25 per page = 3 pages (25 + 25 + 10)
/// let p = calculate_pagination(60, 2, 25);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 25);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(60, 99, 25);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 50);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    let page_size = if page_size > 0 {
        page_size.min(MAX_PAGE_SIZE)
    } else {
        DEFAULT_PAGE_SIZE
    };
    let total_results = total_results.max(0);
    let total_pages = total_results / page_size + i64::from(total_results % page_size != 0);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        page_size,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_first_page() {
        let p = calculate_pagination(30, 1, 25);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(30, -4, 25);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 3, 25);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = calculate_pagination(50, 2, 25);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 25);
    }

    #[test]
    fn test_huge_page_size_is_capped() {
        let p = calculate_pagination(5000, 2, i64::MAX);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.offset, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_totals_do_not_overflow() {
        let p = calculate_pagination(i64::MAX, i64::MAX, MAX_PAGE_SIZE);
        assert_eq!(p.total_pages, i64::MAX / MAX_PAGE_SIZE + 1);
        assert_eq!(p.page, p.total_pages);
        assert_eq!(p.offset, (p.total_pages - 1) * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_page_size_uses_default() {
        let p = calculate_pagination(100, 2, 0);
        assert_eq!(p.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset, DEFAULT_PAGE_SIZE);
    }
}
