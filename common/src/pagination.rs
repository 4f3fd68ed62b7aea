//! Page bookkeeping against the index's reported hit count.

use serde::{Deserialize, Serialize};

use crate::search_const::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationTracker {
    total_found: u64,
    page_size: u64,
}

impl Default for PaginationTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PaginationTracker {
    pub fn new(total_found: u64) -> Self {
        Self::with_page_size(total_found, PAGE_SIZE)
    }

    pub fn with_page_size(total_found: u64, page_size: u64) -> Self {
        Self { total_found, page_size: page_size.max(1) }
    }

    pub fn total_found(&self) -> u64 {
        self.total_found
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// `0` when nothing was found.
    pub fn total_pages(&self) -> u64 {
        self.total_found.div_ceil(self.page_size)
    }

    /// Nearest page that exists: always within `1..=max(total_pages, 1)`.
    pub fn clamp(&self, requested_page: u64) -> u64 {
        requested_page.clamp(1, self.total_pages().max(1))
    }

    pub fn contains(&self, page: u64) -> bool {
        self.clamp(page) == page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_hits_make_three_pages() {
        let tracker = PaginationTracker::new(45);
        assert_eq!(tracker.total_pages(), 3);
        assert_eq!(tracker.clamp(5), 3);
        assert_eq!(tracker.clamp(2), 2);
        assert_eq!(tracker.clamp(0), 1);
    }

    #[test]
    fn nothing_found_clamps_to_first_page() {
        let tracker = PaginationTracker::new(0);
        assert_eq!(tracker.total_pages(), 0);
        for page in [0, 1, 2, 99, u64::MAX] {
            assert_eq!(tracker.clamp(page), 1);
        }
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        assert_eq!(PaginationTracker::new(40).total_pages(), 2);
        assert_eq!(PaginationTracker::new(41).total_pages(), 3);
    }

    #[test]
    fn clamp_stays_in_range_for_many_totals() {
        for total in [0_u64, 1, 19, 20, 21, 45, 1000] {
            let tracker = PaginationTracker::new(total);
            let upper = tracker.total_pages().max(1);
            for page in [0_u64, 1, 2, 3, 50, 51, u64::MAX] {
                let clamped = tracker.clamp(page);
                assert!((1..=upper).contains(&clamped), "total={total} page={page} -> {clamped}");
            }
        }
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let tracker = PaginationTracker::with_page_size(3, 0);
        assert_eq!(tracker.page_size(), 1);
        assert_eq!(tracker.total_pages(), 3);
    }
}
