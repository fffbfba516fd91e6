//! Pagination utilities for service layer
//!
//! `Pagination` is the raw request (query string), `Pager` the resolved
//! position over a known total, and `Page<T>` one slice of results.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: usize,
    /// items per page
    pub per_page: usize,
}

impl Pagination {
    /// Clamp to sane defaults; returns `(page, per_page)` with page 1-based.
    pub fn normalize(self) -> (usize, usize) {
        let page = self.page.max(1);
        (page, self.per_page.clamp(1, MAX_PER_PAGE))
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// Position within `total` items. Always has at least one page, and the
/// current page is kept within `1..=total_pages`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    per_page: usize,
    total: usize,
}

impl Pager {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        let (page, per_page) = pagination.normalize();
        let mut pager = Self { page, per_page, total };
        pager.clamp();
        pager
    }

    fn clamp(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn page(&self) -> usize { self.page }
    pub fn per_page(&self) -> usize { self.per_page }
    pub fn total(&self) -> usize { self.total }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool { self.page < self.total_pages() }
    pub fn has_prev(&self) -> bool { self.page > 1 }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
        self.clamp();
    }

    /// Changing the page size goes back to the first page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = Pagination { page: 1, per_page }.normalize().1;
        self.page = 1;
    }

    /// A shrinking total pulls the current page back into range.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp();
    }

    /// The current page's window of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    pub fn from_items(items: &[T], pagination: Pagination) -> Self {
        let pager = Pager::new(pagination, items.len());
        Self {
            items: pager.slice(items).to_vec(),
            page: pager.page(),
            per_page: pager.per_page(),
            total: pager.total(),
            total_pages: pager.total_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_zero_to_minimum() {
        let (page, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(page, 1);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (page, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(page, 5);
        assert_eq!(per, MAX_PER_PAGE);
    }

    #[test]
    fn empty_total_still_has_one_page() {
        let pager = Pager::new(Pagination::default(), 0);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.page(), 1);
        assert!(!pager.has_next());
        assert!(!pager.has_prev());
    }

    #[test]
    fn navigation_stops_at_edges() {
        let mut pager = Pager::new(Pagination { page: 1, per_page: 10 }, 25);
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.prev());
        assert!(pager.next());
        assert!(pager.next());
        assert!(!pager.next());
        assert_eq!(pager.page(), 3);
        assert_eq!(pager.offset(), 20);
    }

    #[test]
    fn out_of_range_page_lands_on_last() {
        let pager = Pager::new(Pagination { page: 9, per_page: 10 }, 25);
        assert_eq!(pager.page(), 3);
    }

    #[test]
    fn per_page_change_resets_and_total_shrink_clamps() {
        let mut pager = Pager::new(Pagination { page: 3, per_page: 10 }, 25);
        pager.set_per_page(5);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.total_pages(), 5);

        pager.go_to(5);
        pager.set_total(12);
        assert_eq!(pager.page(), 3);
    }

    #[test]
    fn page_slices_last_partial_window() {
        let items: Vec<u32> = (0..25).collect();
        let page = Page::from_items(&items, Pagination { page: 3, per_page: 10 });
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }
}
