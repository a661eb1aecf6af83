//! Page-number parsing and the compacted page list rendered under tables.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;
/// Highest page whose row offset still fits the database's signed 64-bit range.
pub const MAX_PAGE: usize = i64::MAX as usize / MAX_PER_PAGE;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Raw list parameters taken from the query string.
///
/// Values are kept as text so that junk such as `page=abc` falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl PaginationParams {
    /// 1-based page number; anything below 1 becomes 1, anything above
    /// [`MAX_PAGE`] becomes [`MAX_PAGE`].
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .map_or(1, |page| usize::try_from(page).unwrap_or(MAX_PAGE).min(MAX_PAGE))
    }

    /// Page size; missing, zero or invalid values use [`DEFAULT_PER_PAGE`].
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .map_or(DEFAULT_PER_PAGE, |limit| (limit as usize).min(MAX_PER_PAGE))
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }
}

/// Everything the pagination partial needs to render its links.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaginationState {
    pub base_path: String,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub pages: Vec<Option<usize>>,
    pub has_previous: bool,
    pub has_next: bool,
    pub search: Option<String>,
}

impl PaginationState {
    pub fn new(base_path: impl Into<String>, page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };
        let total_pages = total.div_ceil(per_page);

        Self {
            base_path: base_path.into(),
            page,
            per_page,
            total,
            total_pages,
            pages: get_pages(total_pages, page, 2, 2, 4, 2),
            has_previous: page > 1,
            has_next: page < total_pages,
            search: None,
        }
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.map(str::to_string);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationState,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: PaginationState) -> Self {
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> PaginationParams {
        PaginationParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            search: None,
        }
    }

    #[test]
    fn page_defaults_and_clamps() {
        assert_eq!(params(None, None).page(), 1);
        assert_eq!(params(Some("0"), None).page(), 1);
        assert_eq!(params(Some("-4"), None).page(), 1);
        assert_eq!(params(Some("abc"), None).page(), 1);
        assert_eq!(params(Some("3"), None).page(), 3);
        assert_eq!(params(Some("9223372036854775807"), None).page(), MAX_PAGE);
        assert_eq!(params(Some("99999999999999999999"), None).page(), 1);
    }

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(params(None, None).limit(), DEFAULT_PER_PAGE);
        assert_eq!(params(None, Some("0")).limit(), DEFAULT_PER_PAGE);
        assert_eq!(params(None, Some("5")).limit(), 5);
        assert_eq!(params(None, Some("1000")).limit(), MAX_PER_PAGE);
    }

    #[test]
    fn search_is_trimmed() {
        let params = PaginationParams {
            search: Some("  rent ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.search(), Some("rent"));
        assert_eq!(PaginationParams::default().search(), None);
    }

    #[test]
    fn state_derives_total_pages() {
        let state = PaginationState::new("/finance/accounts", 2, 20, 41);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.pages, vec![Some(1), Some(2), Some(3)]);
        assert!(state.has_previous);
        assert!(state.has_next);

        let empty = PaginationState::new("/finance/accounts", 1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.pages.is_empty());
        assert!(!empty.has_previous);
        assert!(!empty.has_next);
    }

    #[test]
    fn long_page_lists_are_compacted() {
        let state = PaginationState::new("/x", 10, 10, 200);
        assert_eq!(
            state.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }
}
