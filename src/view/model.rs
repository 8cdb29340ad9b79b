//! List screen model types for testable state management
//!
//! The list screen is driven by a pure reducer over [`ListState`]; rendering
//! reads a [`ListViewModel`] computed from it. Neither touches the network.

use crate::query::{
    FilterState, PaginationState, Selection, SortState, apply_filters, apply_sort, page_window,
};
use crate::record::Record;
use crate::screen::ScreenConfig;

/// Fetch lifecycle of a list screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// Records are loaded
    Ready,
    /// The last fetch failed; retry is possible
    Error(String),
}

impl LoadPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadPhase::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Raw state of one list screen
#[derive(Debug, Clone)]
pub struct ListState<R> {
    /// Full record set from the last successful fetch
    pub records: Vec<R>,
    pub filter: FilterState,
    pub sort: SortState,
    pub pagination: PaginationState,
    pub phase: LoadPhase,
    /// Generation of the most recently started fetch
    generation: u64,
}

impl<R> ListState<R> {
    /// Fresh state with the screen's default sort and page size.
    pub fn new(screen: &ScreenConfig) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterState::default(),
            sort: screen.initial_sort(),
            pagination: PaginationState::new(screen.page_size),
            phase: LoadPhase::Idle,
            generation: 0,
        }
    }

    /// State already holding `records`, as if a fetch had completed.
    pub fn with_records(screen: &ScreenConfig, records: Vec<R>) -> Self {
        Self {
            records,
            phase: LoadPhase::Ready,
            ..Self::new(screen)
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// All possible actions on a list screen
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction<R> {
    // Fetch
    /// Start a fetch; bumps the generation
    BeginFetch,
    /// A fetch finished with records
    FetchSucceeded { generation: u64, records: Vec<R> },
    /// A fetch failed
    FetchFailed { generation: u64, message: String },
    /// Start over after a failed fetch
    Retry,

    // Filters (reset to page 1)
    SetSearch(String),
    SetStatus(Selection),
    SetCategory(Selection),
    SetLevel(Selection),
    ClearFilters,

    // Sort (page kept, clamped)
    /// Pick a sort key: same key flips direction, new key uses the screen default
    SortBy(String),
    SetSort(SortState),

    // Pagination
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    GoToPage(i64),
}

/// Kind of placeholder shown instead of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyStateKind {
    /// First fetch still running
    Loading,
    /// Fetch failed and nothing is loaded
    LoadFailed,
    /// The collection is empty
    NoRecords,
    /// Records exist but none pass the filters
    NoMatches,
}

impl EmptyStateKind {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyStateKind::Loading => "Loading records...",
            EmptyStateKind::LoadFailed => "Could not load records.",
            EmptyStateKind::NoRecords => "No records yet.",
            EmptyStateKind::NoMatches => "No records match the current search and filters.",
        }
    }
}

/// Computed view model for rendering a list screen
#[derive(Debug, Clone)]
pub struct ListViewModel<'a, R> {
    /// Records on the current page, in display order
    pub rows: Vec<&'a R>,
    /// 0-based index of the first row within the filtered set
    pub start_index: usize,
    /// "Showing X to Y of Z"
    pub range_label: String,
    pub current_page: usize,
    pub total_pages: usize,
    /// Numbered page buttons to show
    pub page_buttons: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    pub total_filtered: usize,
    pub total_all: usize,
    pub sort: &'a SortState,
    pub is_loading: bool,
    /// Error banner with a retry action
    pub error: Option<&'a str>,
    pub empty_state: Option<EmptyStateKind>,
}

fn compute_empty_state(
    phase: &LoadPhase,
    total_all: usize,
    total_filtered: usize,
) -> Option<EmptyStateKind> {
    if total_filtered > 0 {
        return None;
    }
    Some(match phase {
        _ if total_all > 0 => EmptyStateKind::NoMatches,
        LoadPhase::Loading => EmptyStateKind::Loading,
        LoadPhase::Error(_) => EmptyStateKind::LoadFailed,
        LoadPhase::Idle | LoadPhase::Ready => EmptyStateKind::NoRecords,
    })
}

/// Compute the view model from the raw state.
pub fn compute_list_view_model<'a, R: Record>(
    state: &'a ListState<R>,
    screen: &ScreenConfig,
) -> ListViewModel<'a, R> {
    let mut ordered = apply_filters(&state.records, screen, &state.filter);
    apply_sort(&mut ordered, screen, &state.sort);

    let page = state.pagination.slice(&ordered);
    let total_filtered = ordered.len();
    let total_all = state.records.len();

    ListViewModel {
        rows: page.items.to_vec(),
        start_index: page.start_index,
        range_label: page.range_label(),
        current_page: page.current_page,
        total_pages: page.total_pages,
        page_buttons: page_window(page.current_page, page.total_pages),
        has_previous: page.has_previous(),
        has_next: page.has_next(),
        total_filtered,
        total_all,
        sort: &state.sort,
        is_loading: state.phase.is_loading(),
        error: state.phase.error_message(),
        empty_state: compute_empty_state(&state.phase, total_all, total_filtered),
    }
}

fn filtered_count<R: Record>(state: &ListState<R>, screen: &ScreenConfig) -> usize {
    apply_filters(&state.records, screen, &state.filter).len()
}

/// Pure reducer: apply an action to the state.
pub fn reduce_list_state<R: Record>(
    mut state: ListState<R>,
    action: ListAction<R>,
    screen: &ScreenConfig,
) -> ListState<R> {
    match action {
        // Fetch
        ListAction::BeginFetch => {
            state.generation += 1;
            state.phase = LoadPhase::Loading;
        }
        ListAction::Retry => {
            if matches!(state.phase, LoadPhase::Error(_)) {
                state.generation += 1;
                state.phase = LoadPhase::Loading;
            }
        }
        ListAction::FetchSucceeded {
            generation,
            records,
        } => {
            if generation != state.generation {
                tracing::debug!(
                    "dropping stale {} fetch {generation} (latest is {})",
                    screen.resource,
                    state.generation
                );
                return state;
            }
            state.records = records;
            state.phase = LoadPhase::Ready;
            let total = filtered_count(&state, screen);
            state.pagination.clamp(total);
        }
        ListAction::FetchFailed {
            generation,
            message,
        } => {
            if generation != state.generation {
                tracing::debug!(
                    "dropping stale {} fetch failure {generation}: {message}",
                    screen.resource
                );
                return state;
            }
            state.phase = LoadPhase::Error(message);
        }

        // Filters
        ListAction::SetSearch(term) => {
            state.filter.search_term = term;
            state.pagination.first();
        }
        ListAction::SetStatus(selection) => {
            state.filter.status = selection;
            state.pagination.first();
        }
        ListAction::SetCategory(selection) => {
            state.filter.category = selection;
            state.pagination.first();
        }
        ListAction::SetLevel(selection) => {
            state.filter.level = selection;
            state.pagination.first();
        }
        ListAction::ClearFilters => {
            state.filter = FilterState::default();
            state.pagination.first();
        }

        // Sort
        ListAction::SortBy(key) => {
            state.sort = state.sort.toggled(&key, screen.default_order);
            let total = filtered_count(&state, screen);
            state.pagination.clamp(total);
        }
        ListAction::SetSort(sort) => {
            state.sort = sort;
            let total = filtered_count(&state, screen);
            state.pagination.clamp(total);
        }

        // Pagination
        ListAction::FirstPage => state.pagination.first(),
        ListAction::PreviousPage => state.pagination.previous(),
        ListAction::NextPage => {
            let total = filtered_count(&state, screen);
            state.pagination.next(total);
        }
        ListAction::LastPage => {
            let total = filtered_count(&state, screen);
            state.pagination.last(total);
        }
        ListAction::GoToPage(n) => {
            let total = filtered_count(&state, screen);
            state.pagination.go_to(n, total);
        }
    }

    state
}
