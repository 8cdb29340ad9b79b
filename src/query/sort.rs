//! Sort comparator builder for list screens.
//!
//! A [`SortState`] names one of the screen's sort keys and a direction. The
//! comparator reads the key's record field and compares it as text, number,
//! or date. Sorting is stable, so ties keep their input order, and an
//! unknown key leaves the order untouched.

use std::cmp::Ordering;

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::ScholarError;
use crate::record::{FieldValue, Record};
use crate::screen::ScreenConfig;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const ALL_STRINGS: &'static [&'static str] = &["asc", "desc"];

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

enum_display_fromstr!(
    SortOrder,
    ScholarError::InvalidSortOrder,
    {
        Asc => "asc",
        Desc => "desc",
    }
);

/// How a sort key's field is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Lexicographic, case-sensitive
    Text,
    /// Parsed as a number, unparsable values count as 0
    Number,
    /// Parsed as a date, unparsable values sort as the epoch
    Date,
}

/// Active sort key and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }

    /// Sort state after the user picks `key`: the same key flips the
    /// direction, a different key starts at `default_order`.
    pub fn toggled(&self, key: &str, default_order: SortOrder) -> Self {
        if self.key.eq_ignore_ascii_case(key) {
            Self::new(self.key.clone(), self.order.reversed())
        } else {
            Self::new(key, default_order)
        }
    }
}

/// Parse a date string to milliseconds since the Unix epoch.
///
/// Accepts RFC 3339 timestamps, civil date-times and plain `YYYY-MM-DD`
/// dates; civil values are read as UTC.
pub fn parse_date_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = value.parse::<Timestamp>() {
        return Some(ts.as_millisecond());
    }
    if let Ok(dt) = value.parse::<DateTime>() {
        return dt
            .to_zoned(TimeZone::UTC)
            .ok()
            .map(|z| z.timestamp().as_millisecond());
    }
    if let Ok(date) = value.parse::<Date>() {
        return date
            .to_zoned(TimeZone::UTC)
            .ok()
            .map(|z| z.timestamp().as_millisecond());
    }
    None
}

/// Numeric value of a field, 0 when missing, unparsable or non-finite.
pub fn numeric_value(value: Option<&FieldValue<'_>>) -> f64 {
    let n = match value {
        Some(FieldValue::Number(n)) => *n,
        Some(FieldValue::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    // Normalizes -0.0 so total_cmp treats it as 0
    if n.is_finite() { n + 0.0 } else { 0.0 }
}

/// Epoch milliseconds of a date field, 0 when missing or unparsable.
pub fn date_value(value: Option<&FieldValue<'_>>) -> i64 {
    match value {
        Some(FieldValue::Text(s)) => parse_date_millis(s).unwrap_or(0),
        Some(FieldValue::Number(n)) if n.is_finite() => *n as i64,
        _ => 0,
    }
}

/// Comparator over two records for one sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordComparator {
    /// `None` when the sort key is unknown to the screen
    target: Option<(&'static str, SortKind)>,
    order: SortOrder,
}

impl RecordComparator {
    pub fn build(screen: &ScreenConfig, state: &SortState) -> Self {
        let target = screen.sort_key(&state.key).map(|k| (k.field, k.kind));
        if target.is_none() {
            tracing::debug!(
                "unknown sort key '{}' for {}, keeping input order",
                state.key,
                screen.resource
            );
        }
        Self {
            target,
            order: state.order,
        }
    }

    /// Whether this comparator actually reorders anything.
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let Some((field, kind)) = self.target else {
            return Ordering::Equal;
        };
        let va = a.field(field);
        let vb = b.field(field);

        let ascending = match kind {
            SortKind::Text => {
                let ta = va.as_ref().map(|v| v.as_text()).unwrap_or_default();
                let tb = vb.as_ref().map(|v| v.as_text()).unwrap_or_default();
                ta.cmp(&tb)
            }
            SortKind::Number => numeric_value(va.as_ref()).total_cmp(&numeric_value(vb.as_ref())),
            SortKind::Date => date_value(va.as_ref()).cmp(&date_value(vb.as_ref())),
        };
        self.order.apply(ascending)
    }
}

/// Sort records in place for a screen's sort state. Stable.
pub fn apply_sort<R: Record>(records: &mut [R], screen: &ScreenConfig, state: &SortState) {
    let comparator = RecordComparator::build(screen, state);
    if comparator.is_active() {
        records.sort_by(|a, b| comparator.compare(a, b));
    }
}
