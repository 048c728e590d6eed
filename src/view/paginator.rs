use std::ops::Range;

use crate::enum_display_fromstr;

/// Number of page links shown around the current page.
const PAGE_WINDOW: usize = 5;

/// What happens to the current page when the filtered collection changes
/// for a reason other than a filter, search or page-size change (those always
/// return to the first page).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShrinkPolicy {
    /// Keep the page, clamped into `[1, max(1, total_pages)]`.
    #[default]
    Clamp,
    /// Return to the first page.
    Reset,
}

enum_display_fromstr!(ShrinkPolicy, "shrink policy", {
    Clamp => "clamp",
    Reset => "reset",
});

/// Page bookkeeping over a sequence of `total_items` entries.
///
/// Pages are 1-based. `current_page` always lies in `[1, max(1, total_pages)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    page_size: usize,
    total_items: usize,
    policy: ShrinkPolicy,
}

impl Paginator {
    pub fn new(page_size: usize, policy: ShrinkPolicy) -> Self {
        Paginator {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            policy,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn policy(&self) -> ShrinkPolicy {
        self.policy
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Jump to page `n`. Out-of-range requests are ignored; returns whether
    /// the page was accepted.
    pub fn set_page(&mut self, n: usize) -> bool {
        if n < 1 || n > self.total_pages() {
            return false;
        }
        self.current_page = n;
        true
    }

    pub fn next(&mut self) -> bool {
        self.set_page(self.current_page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.current_page > 1 && self.set_page(self.current_page - 1)
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    /// Filter or search changed: new total, first page.
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = 1;
    }

    /// The collection changed underneath (reload, create, update, delete).
    pub fn resize(&mut self, total_items: usize) {
        self.total_items = total_items;
        match self.policy {
            ShrinkPolicy::Clamp => {
                let last = self.total_pages().max(1);
                self.current_page = self.current_page.clamp(1, last);
            }
            ShrinkPolicy::Reset => self.current_page = 1,
        }
    }

    /// Index range of the current page within the sorted sequence.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Up to five page numbers around the current page, within
    /// `[1, total_pages]`.
    pub fn page_numbers(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let span = PAGE_WINDOW - 1;
        let mut start = self.current_page.saturating_sub(PAGE_WINDOW / 2).max(1);
        let end = (start + span).min(total);
        if end - start < span {
            start = end.saturating_sub(span).max(1);
        }
        (start..=end).collect()
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(10, ShrinkPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(total: usize, size: usize) -> Paginator {
        let mut p = Paginator::new(size, ShrinkPolicy::Clamp);
        p.reset(total);
        p
    }

    #[test]
    fn test_twenty_three_items_in_pages_of_ten() {
        let mut p = paginator(23, 10);
        assert_eq!(p.total_pages(), 3);

        let sizes: Vec<usize> = (1..=3)
            .map(|n| {
                assert!(p.set_page(n));
                p.range().len()
            })
            .collect();
        assert_eq!(sizes, vec![10, 10, 3]);

        p.set_page(2);
        assert_eq!(p.page_numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_pages_reconstruct_sequence() {
        for (total, size) in [(0, 3), (1, 1), (7, 3), (9, 3), (23, 10), (5, 50)] {
            let mut p = paginator(total, size);
            assert_eq!(p.total_pages(), total.div_ceil(size));
            let mut seen = Vec::new();
            for n in 1..=p.total_pages() {
                p.set_page(n);
                seen.extend(p.range());
            }
            assert_eq!(seen, (0..total).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_set_page_out_of_range_is_noop() {
        let mut p = paginator(23, 10);
        p.set_page(2);
        assert!(!p.set_page(0));
        assert!(!p.set_page(4));
        assert_eq!(p.current_page(), 2);

        let mut empty = paginator(0, 10);
        assert!(!empty.set_page(1));
        assert_eq!(empty.current_page(), 1);
        assert_eq!(empty.range(), 0..0);
        assert!(empty.page_numbers().is_empty());
    }

    #[test]
    fn test_page_window_slides() {
        let mut p = paginator(100, 10);
        assert_eq!(p.page_numbers(), vec![1, 2, 3, 4, 5]);
        p.set_page(6);
        assert_eq!(p.page_numbers(), vec![4, 5, 6, 7, 8]);
        p.set_page(10);
        assert_eq!(p.page_numbers(), vec![6, 7, 8, 9, 10]);
        p.set_page(9);
        assert_eq!(p.page_numbers(), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_clamp_on_shrink() {
        let mut p = paginator(23, 10);
        p.set_page(3);
        p.resize(15);
        assert_eq!(p.current_page(), 2);
        p.resize(0);
        assert_eq!(p.current_page(), 1);
        p.resize(40);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_clamp_keeps_page_when_still_valid() {
        let mut p = paginator(50, 10);
        p.set_page(3);
        p.resize(49);
        assert_eq!(p.current_page(), 3);
    }

    #[test]
    fn test_reset_policy_returns_to_first_page() {
        let mut p = Paginator::new(10, ShrinkPolicy::Reset);
        p.reset(50);
        p.set_page(4);
        p.resize(49);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_page_size_change_resets() {
        let mut p = paginator(50, 10);
        p.set_page(3);
        p.set_page_size(25);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 2);
        p.set_page_size(0);
        assert_eq!(p.page_size(), 1);
    }

    #[test]
    fn test_next_previous() {
        let mut p = paginator(15, 10);
        assert!(!p.previous());
        assert!(p.next());
        assert!(!p.next());
        assert_eq!(p.current_page(), 2);
        assert!(p.previous());
    }
}
