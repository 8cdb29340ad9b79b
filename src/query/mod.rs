//! List-view data shaping: search → filter → sort → paginate.
//!
//! The stages are pure functions configured by a [`ScreenConfig`]. The
//! builder composes them into a [`ListQuery`] for callers that want the whole
//! pipeline in one call.

pub mod filter;
pub mod paginate;
pub mod sort;

pub use filter::{FilterState, RecordFilter, RecordPredicate, Selection, apply_filters};
pub use paginate::{Page, PaginationState, page_window, paginate};
pub use sort::{RecordComparator, SortKind, SortOrder, SortState, apply_sort};

use crate::record::Record;
use crate::screen::ScreenConfig;

/// Filter, sort and page a record set in one pass.
pub fn shape<'a, R: Record>(
    records: &'a [R],
    screen: &ScreenConfig,
    filter: &FilterState,
    sort: &SortState,
) -> Vec<&'a R> {
    let mut shaped = apply_filters(records, screen, filter);
    apply_sort(&mut shaped, screen, sort);
    shaped
}

/// Filtered and ordered records plus the page requested from them.
#[derive(Debug, Clone)]
pub struct QueryResult<'a, R> {
    /// Every record that passed the filters, in sort order
    pub ordered: Vec<&'a R>,
    pub total_all: usize,
    page_size: usize,
    current_page: usize,
}

impl<'a, R> QueryResult<'a, R> {
    pub fn total_filtered(&self) -> usize {
        self.ordered.len()
    }

    /// The requested page, clamped into range.
    pub fn page(&self) -> Page<'_, &'a R> {
        paginate(&self.ordered, self.page_size, self.current_page)
    }
}

/// A configured list query.
#[derive(Debug, Clone)]
pub struct ListQuery<'s> {
    screen: &'s ScreenConfig,
    filter: FilterState,
    sort: SortState,
    page_size: usize,
    page: usize,
}

impl ListQuery<'_> {
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> QueryResult<'a, R> {
        let ordered = shape(records, self.screen, &self.filter, &self.sort);
        tracing::debug!(
            "{} query kept {} of {} records",
            self.screen.resource,
            ordered.len(),
            records.len()
        );
        QueryResult {
            ordered,
            total_all: records.len(),
            page_size: self.page_size,
            current_page: self.page,
        }
    }
}

/// Builder for [`ListQuery`], starting from the screen's defaults.
pub struct ListQueryBuilder<'s> {
    screen: &'s ScreenConfig,
    filter: FilterState,
    sort: SortState,
    page_size: usize,
    page: usize,
}

impl<'s> ListQueryBuilder<'s> {
    pub fn new(screen: &'s ScreenConfig) -> Self {
        Self {
            screen,
            filter: FilterState::default(),
            sort: screen.initial_sort(),
            page_size: screen.page_size,
            page: 1,
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.filter.search_term = term.into();
        self
    }

    pub fn with_status(mut self, selection: Selection) -> Self {
        self.filter.status = selection;
        self
    }

    pub fn with_category(mut self, selection: Selection) -> Self {
        self.filter.category = selection;
        self
    }

    pub fn with_level(mut self, selection: Selection) -> Self {
        self.filter.level = selection;
        self
    }

    pub fn with_filter(mut self, filter: FilterState) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn build(self) -> ListQuery<'s> {
        ListQuery {
            screen: self.screen,
            filter: self.filter,
            sort: self.sort,
            page_size: self.page_size,
            page: self.page,
        }
    }
}
