//! Fixed-size pagination over the filtered view.

use std::ops::Range;

/// Number of groups shown per page.
pub const PAGE_SIZE: usize = 30;

/// Current page plus the page size.
///
/// Navigation past either end is a no-op; callers hide the control instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Pager {
    /// Pager on page 0 with [`PAGE_SIZE`].
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    /// Pager with a custom page size (at least 1).
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based current page.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of pages for `total` items; 0 when there are no items.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Highest valid page, clamped to 0 for an empty view.
    pub fn last_page(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Half-open index range `[n*P, min((n+1)*P, total))` of page `page`.
    pub fn page_range(&self, page: usize, total: usize) -> Range<usize> {
        let start = page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Index range of the current page.
    pub fn current_range(&self, total: usize) -> Range<usize> {
        self.page_range(self.current, total)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.current < self.last_page(total)
    }

    /// Move forward one page. Returns `false` at the last page.
    pub fn next(&mut self, total: usize) -> bool {
        if self.has_next(total) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back one page. Returns `false` at page 0.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.current = page.min(self.last_page(total));
    }

    /// Pull the current page back into range after the view shrank.
    pub fn clamp(&mut self, total: usize) {
        self.set_page(self.current, total);
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let pager = Pager::new();
        assert_eq!(pager.page_count(0), 0);
        assert_eq!(pager.page_count(1), 1);
        assert_eq!(pager.page_count(30), 1);
        assert_eq!(pager.page_count(31), 2);
        assert_eq!(pager.last_page(0), 0);
        assert_eq!(pager.last_page(61), 2);
    }

    #[test]
    fn test_page_range() {
        let pager = Pager::new();
        assert_eq!(pager.page_range(0, 45), 0..30);
        assert_eq!(pager.page_range(1, 45), 30..45);
        assert_eq!(pager.page_range(2, 45), 45..45);
        assert_eq!(pager.page_range(0, 0), 0..0);
    }

    #[test]
    fn test_pages_cover_everything_once() {
        let pager = Pager::with_page_size(7);
        for total in [0, 1, 6, 7, 8, 50] {
            let covered: Vec<usize> = (0..pager.page_count(total))
                .flat_map(|p| pager.page_range(p, total))
                .collect();
            assert_eq!(covered, (0..total).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_navigation_stops_at_boundaries() {
        let mut pager = Pager::new();
        assert!(!pager.prev());
        assert_eq!(pager.current(), 0);

        assert!(pager.next(65));
        assert!(pager.next(65));
        assert!(!pager.next(65));
        assert_eq!(pager.current(), 2);

        assert!(!pager.has_next(65));
        assert!(pager.has_prev());
    }

    #[test]
    fn test_empty_view_has_no_navigation() {
        let mut pager = Pager::new();
        assert!(!pager.has_next(0));
        assert!(!pager.next(0));
        assert_eq!(pager.current(), 0);
    }

    #[test]
    fn test_set_page_and_clamp() {
        let mut pager = Pager::with_page_size(10);
        pager.set_page(9, 35);
        assert_eq!(pager.current(), 3);

        pager.clamp(12);
        assert_eq!(pager.current(), 1);

        pager.reset();
        assert_eq!(pager.current(), 0);
    }
}
