//! Declarative per-screen configuration of the list pipeline.
//!
//! Each admin list screen is one [`ScreenConfig`]: which fields are searched,
//! which fields back the status/category/level facets, which sort keys exist
//! and how they compare, the default sort, and the page size.

use crate::error::{Result, ScholarError};
use crate::query::sort::{SortKind, SortOrder, SortState};
use crate::record::Resource;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A sort key offered by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Name used by the UI/CLI (e.g. `date`)
    pub key: &'static str,
    /// Record field it reads (e.g. `submittedDate`)
    pub field: &'static str,
    pub kind: SortKind,
}

impl SortKey {
    const fn new(key: &'static str, field: &'static str, kind: SortKind) -> Self {
        Self { key, field, kind }
    }
}

/// Record fields backing the categorical facets. `None` means the screen has
/// no such facet and a selection for it is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FacetFields {
    pub status: Option<&'static str>,
    pub category: Option<&'static str>,
    pub level: Option<&'static str>,
}

/// Configuration of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    pub resource: Resource,
    pub search_fields: &'static [&'static str],
    pub facets: FacetFields,
    pub sort_keys: &'static [SortKey],
    /// Sort applied when the screen opens
    pub default_sort: &'static str,
    /// Direction applied when switching to a new sort key
    pub default_order: SortOrder,
    pub page_size: usize,
}

const SCHOOLS: ScreenConfig = ScreenConfig {
    resource: Resource::Schools,
    search_fields: &["name", "address", "city", "region", "province"],
    facets: FacetFields {
        status: Some("status"),
        category: Some("category"),
        level: Some("level"),
    },
    sort_keys: &[
        SortKey::new("name", "name", SortKind::Text),
        SortKey::new("city", "city", SortKind::Text),
        SortKey::new("students", "studentCount", SortKind::Number),
        SortKey::new("date", "partnershipDate", SortKind::Date),
    ],
    default_sort: "name",
    default_order: SortOrder::Desc,
    page_size: DEFAULT_PAGE_SIZE,
};

const PROGRAMS: ScreenConfig = ScreenConfig {
    resource: Resource::Programs,
    search_fields: &["name", "description", "sponsor", "category"],
    facets: FacetFields {
        status: Some("status"),
        category: Some("category"),
        level: Some("level"),
    },
    sort_keys: &[
        SortKey::new("name", "name", SortKind::Text),
        SortKey::new("amount", "amount", SortKind::Number),
        SortKey::new("slots", "slots", SortKind::Number),
        SortKey::new("deadline", "deadline", SortKind::Date),
    ],
    default_sort: "deadline",
    default_order: SortOrder::Desc,
    page_size: DEFAULT_PAGE_SIZE,
};

const APPLICATIONS: ScreenConfig = ScreenConfig {
    resource: Resource::Applications,
    search_fields: &["name", "studentId", "school", "category"],
    facets: FacetFields {
        status: Some("status"),
        category: Some("category"),
        level: Some("level"),
    },
    sort_keys: &[
        SortKey::new("date", "submittedDate", SortKind::Date),
        SortKey::new("name", "name", SortKind::Text),
        SortKey::new("gwa", "generalWeightedAverage", SortKind::Number),
        SortKey::new("school", "school", SortKind::Text),
    ],
    default_sort: "date",
    default_order: SortOrder::Desc,
    page_size: DEFAULT_PAGE_SIZE,
};

const DOCUMENTS: ScreenConfig = ScreenConfig {
    resource: Resource::Documents,
    search_fields: &["name", "studentName", "category", "applicationId"],
    facets: FacetFields {
        status: Some("status"),
        category: Some("category"),
        level: None,
    },
    sort_keys: &[
        SortKey::new("date", "uploadedDate", SortKind::Date),
        SortKey::new("name", "name", SortKind::Text),
        SortKey::new("size", "fileSize", SortKind::Number),
    ],
    default_sort: "date",
    default_order: SortOrder::Desc,
    page_size: DEFAULT_PAGE_SIZE,
};

const STUDENTS: ScreenConfig = ScreenConfig {
    resource: Resource::Students,
    search_fields: &["name", "studentId", "email", "school", "course"],
    facets: FacetFields {
        status: Some("status"),
        category: None,
        level: Some("level"),
    },
    sort_keys: &[
        SortKey::new("name", "lastName", SortKind::Text),
        SortKey::new("gwa", "generalWeightedAverage", SortKind::Number),
        SortKey::new("date", "enrolledDate", SortKind::Date),
    ],
    default_sort: "name",
    default_order: SortOrder::Desc,
    page_size: DEFAULT_PAGE_SIZE,
};

impl ScreenConfig {
    /// Built-in configuration for a resource's list screen.
    pub fn for_resource(resource: Resource) -> Self {
        match resource {
            Resource::Schools => SCHOOLS,
            Resource::Programs => PROGRAMS,
            Resource::Applications => APPLICATIONS,
            Resource::Documents => DOCUMENTS,
            Resource::Students => STUDENTS,
        }
    }

    /// Override the page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_default_order(mut self, order: SortOrder) -> Self {
        self.default_order = order;
        self
    }

    /// Look up a sort key by name (case-insensitive).
    pub fn sort_key(&self, key: &str) -> Option<&SortKey> {
        self.sort_keys
            .iter()
            .find(|k| k.key.eq_ignore_ascii_case(key.trim()))
    }

    /// Like [`sort_key`](Self::sort_key), but an unknown key is an error
    /// listing the valid ones.
    pub fn require_sort_key(&self, key: &str) -> Result<&SortKey> {
        self.sort_key(key).ok_or_else(|| ScholarError::InvalidSortKey {
            key: key.to_string(),
            valid: self.sort_key_names().join(", "),
        })
    }

    pub fn sort_key_names(&self) -> Vec<&'static str> {
        self.sort_keys.iter().map(|k| k.key).collect()
    }

    /// Sort state the screen opens with.
    pub fn initial_sort(&self) -> SortState {
        SortState::new(self.default_sort, self.default_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_has_a_screen() {
        for resource in Resource::ALL {
            let screen = ScreenConfig::for_resource(resource);
            assert_eq!(screen.resource, resource);
            assert!(!screen.search_fields.is_empty());
            assert!(
                screen.sort_key(screen.default_sort).is_some(),
                "default sort of {resource} must be a declared key"
            );
            assert_eq!(screen.page_size, DEFAULT_PAGE_SIZE);
            assert_eq!(screen.default_order, SortOrder::Desc);
        }
    }

    #[test]
    fn test_sort_key_lookup() {
        let screen = ScreenConfig::for_resource(Resource::Applications);
        let key = screen.sort_key("DATE").unwrap();
        assert_eq!(key.field, "submittedDate");
        assert_eq!(key.kind, SortKind::Date);
        assert!(screen.sort_key("priority").is_none());
    }

    #[test]
    fn test_require_sort_key_lists_valid_keys() {
        let screen = ScreenConfig::for_resource(Resource::Documents);
        let err = screen.require_sort_key("owner").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid sort key 'owner'. Valid keys: date, name, size"
        );
    }

    #[test]
    fn test_with_page_size_never_zero() {
        let screen = ScreenConfig::for_resource(Resource::Schools).with_page_size(0);
        assert_eq!(screen.page_size, 1);
    }
}
