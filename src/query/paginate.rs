//! Client-side pagination.
//!
//! Pages are 1-based. Every navigation request is clamped into
//! `[1, total_pages]`, and an empty list still has one (empty) page.

/// Maximum number of numbered page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// Number of pages needed for `total_items`, never less than one.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// One page of an ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Index of the first item on the page (0-based)
    pub start_index: usize,
    /// One past the last item on the page
    pub end_index: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// "Showing X to Y of Z", 1-based.
    pub fn range_label(&self) -> String {
        if self.total_items == 0 {
            return "Showing 0 to 0 of 0".to_string();
        }
        format!(
            "Showing {} to {} of {}",
            self.start_index + 1,
            self.end_index,
            self.total_items
        )
    }
}

/// Slice out the requested page. Out-of-range pages are clamped.
pub fn paginate<T>(ordered: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = ordered.len();
    let total_pages = total_pages(total_items, page_size);
    let current_page = current_page.clamp(1, total_pages);

    let start_index = ((current_page - 1) * page_size).min(total_items);
    let end_index = (start_index + page_size).min(total_items);

    Page {
        items: &ordered[start_index..end_index],
        start_index,
        end_index,
        total_pages,
        current_page,
        total_items,
    }
}

/// Numbered page buttons to show around `current_page`.
///
/// Up to [`PAGE_WINDOW`] pages; near either end the window shifts so it stays
/// full whenever there are enough pages.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    let total_pages = total_pages.max(1);
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }

    let current_page = current_page.clamp(1, total_pages);
    let half = PAGE_WINDOW / 2;
    let start = current_page
        .saturating_sub(half)
        .clamp(1, total_pages - PAGE_WINDOW + 1);
    (start..start + PAGE_WINDOW).collect()
}

/// Page size and current page of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page_size: usize,
    current_page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::screen::DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// Start on page 1. A zero page size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.page_size)
    }

    pub fn first(&mut self) {
        self.current_page = 1;
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self, total_items: usize) {
        self.current_page = (self.current_page + 1).min(self.total_pages(total_items));
    }

    pub fn last(&mut self, total_items: usize) {
        self.current_page = self.total_pages(total_items);
    }

    /// Jump to page `n`; any integer is accepted and clamped.
    pub fn go_to(&mut self, n: i64, total_items: usize) {
        let total = self.total_pages(total_items);
        self.current_page = if n < 1 {
            1
        } else {
            usize::try_from(n).unwrap_or(usize::MAX).min(total)
        };
    }

    /// Pull the current page back into range after the item count changed.
    pub fn clamp(&mut self, total_items: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(total_items));
    }

    /// Slice `ordered` at the current page.
    pub fn slice<'a, T>(&self, ordered: &'a [T]) -> Page<'a, T> {
        paginate(ordered, self.page_size, self.current_page)
    }
}
