//! Filter predicate builder for list screens.
//!
//! A [`FilterState`] is turned into a [`RecordPredicate`]: a search filter
//! over the screen's searchable fields plus one filter per active facet, all
//! ANDed together.

use std::fmt;

use crate::record::Record;
use crate::screen::ScreenConfig;

/// Sentinel accepted for "no filter" on a facet
pub const ALL_SENTINEL: &str = "all";

/// Selection on a categorical facet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse user input: `all` (any case) or blank selects everything.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Selected value, `None` for `All`.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::parse(value)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_SENTINEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// Search and facet constraints of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub status: Selection,
    pub category: Selection,
    pub level: Selection,
}

impl FilterState {
    /// True when nothing would be filtered out.
    pub fn is_neutral(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.status.is_all()
            && self.category.is_all()
            && self.level.is_all()
    }
}

/// Case-insensitive substring match using Unicode case folding.
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack_folded = unicase::UniCase::new(haystack).to_folded_case();
    let needle_folded = unicase::UniCase::new(needle).to_folded_case();
    haystack_folded.contains(&needle_folded)
}

/// Trait for record filters
pub trait RecordFilter: Send + Sync {
    fn matches(&self, record: &dyn Record) -> bool;
}

/// Matches records where any of the configured fields contains the term.
pub struct SearchFilter {
    fields: &'static [&'static str],
    term: String,
}

impl SearchFilter {
    pub fn new(fields: &'static [&'static str], term: &str) -> Self {
        Self {
            fields,
            term: term.trim().to_string(),
        }
    }
}

impl RecordFilter for SearchFilter {
    fn matches(&self, record: &dyn Record) -> bool {
        if self.term.is_empty() {
            return true;
        }
        // Missing fields read as empty text, which never contains a non-empty term
        self.fields.iter().any(|field| {
            record
                .field(field)
                .is_some_and(|value| contains_case_insensitive(&value.as_text(), &self.term))
        })
    }
}

/// Matches records whose facet field equals the selected value, ignoring case.
pub struct FacetFilter {
    field: &'static str,
    expected: String,
}

impl FacetFilter {
    pub fn new(field: &'static str, expected: &str) -> Self {
        Self {
            field,
            expected: expected.to_string(),
        }
    }
}

impl RecordFilter for FacetFilter {
    fn matches(&self, record: &dyn Record) -> bool {
        record
            .field(self.field)
            .is_some_and(|value| unicase::eq(value.as_text().as_ref(), self.expected.as_str()))
    }
}

/// All active filters of a screen, ANDed.
pub struct RecordPredicate {
    filters: Vec<Box<dyn RecordFilter>>,
}

impl RecordPredicate {
    pub fn build(screen: &ScreenConfig, state: &FilterState) -> Self {
        let mut filters: Vec<Box<dyn RecordFilter>> = Vec::new();

        if !state.search_term.trim().is_empty() {
            filters.push(Box::new(SearchFilter::new(
                screen.search_fields,
                &state.search_term,
            )));
        }

        let facets = [
            ("status", screen.facets.status, &state.status),
            ("category", screen.facets.category, &state.category),
            ("level", screen.facets.level, &state.level),
        ];
        for (facet, field, selection) in facets {
            let Some(value) = selection.value() else {
                continue;
            };
            match field {
                Some(field) => filters.push(Box::new(FacetFilter::new(field, value))),
                None => tracing::debug!(
                    "{} screen has no {facet} facet, ignoring selection '{value}'",
                    screen.resource
                ),
            }
        }

        Self { filters }
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Records matching the filter state, in input order.
pub fn apply_filters<'a, R: Record>(
    records: &'a [R],
    screen: &ScreenConfig,
    state: &FilterState,
) -> Vec<&'a R> {
    let predicate = RecordPredicate::build(screen, state);
    records.iter().filter(|r| predicate.matches(*r)).collect()
}
