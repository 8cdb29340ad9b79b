//! Form validation for create and update payloads.
//!
//! Every problem is collected before failing so all offending fields can be
//! reported at once, each under its own name.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::Resource;
use crate::error::{Result, ScholarError};
use crate::query::sort::parse_date_millis;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Per-field validation messages, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push((field.to_string(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(())` when nothing failed, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ScholarError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "  {field}: {message}")?;
        }
        Ok(())
    }
}

/// Whether a payload creates a record or updates an existing one.
///
/// Updates may omit required fields, but may not blank them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

enum Check {
    Email,
    Date,
    /// Inclusive numeric range
    Range(f64, f64),
    NonNegative,
}

struct FormRules {
    required: &'static [&'static str],
    checks: &'static [(&'static str, Check)],
}

fn rules_for(resource: Resource) -> FormRules {
    match resource {
        Resource::Schools => FormRules {
            required: &["name", "address", "city", "province", "category", "level"],
            checks: &[
                ("contactEmail", Check::Email),
                ("studentCount", Check::NonNegative),
                ("partnershipDate", Check::Date),
            ],
        },
        Resource::Programs => FormRules {
            required: &["name", "category", "level", "status"],
            checks: &[
                ("amount", Check::NonNegative),
                ("slots", Check::NonNegative),
                ("deadline", Check::Date),
            ],
        },
        Resource::Applications => FormRules {
            required: &["name", "studentId", "school", "program"],
            checks: &[
                ("submittedDate", Check::Date),
                ("generalWeightedAverage", Check::Range(1.0, 5.0)),
            ],
        },
        Resource::Documents => FormRules {
            required: &["name", "category", "studentName"],
            checks: &[("fileSize", Check::NonNegative), ("uploadedDate", Check::Date)],
        },
        Resource::Students => FormRules {
            required: &["studentId", "firstName", "lastName", "email", "school"],
            checks: &[
                ("email", Check::Email),
                ("generalWeightedAverage", Check::Range(1.0, 5.0)),
                ("enrolledDate", Check::Date),
            ],
        },
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn check_field(check: &Check, value: &Value) -> Option<String> {
    match check {
        Check::Email => match value.as_str() {
            Some(s) if EMAIL_RE.is_match(s.trim()) => None,
            _ => Some("must be a valid email address".to_string()),
        },
        Check::Date => match value.as_str() {
            Some(s) if parse_date_millis(s).is_some() => None,
            _ => Some("must be a date (YYYY-MM-DD)".to_string()),
        },
        Check::Range(min, max) => match as_number(value) {
            Some(n) if n >= *min && n <= *max => None,
            Some(_) => Some(format!("must be between {min:.1} and {max:.1}")),
            None => Some("must be a number".to_string()),
        },
        Check::NonNegative => match as_number(value) {
            Some(n) if n >= 0.0 => None,
            Some(_) => Some("must not be negative".to_string()),
            None => Some("must be a number".to_string()),
        },
    }
}

/// Validate a create/update payload for a resource.
pub fn validate_payload(resource: Resource, payload: &Value, mode: FormMode) -> Result<()> {
    let Some(fields) = payload.as_object() else {
        return Err(ScholarError::InvalidData(
            "payload must be a JSON object".to_string(),
        ));
    };
    collect_errors(resource, fields, mode).into_result()
}

fn collect_errors(resource: Resource, fields: &Map<String, Value>, mode: FormMode) -> FieldErrors {
    let rules = rules_for(resource);
    let mut errors = FieldErrors::new();

    for &field in rules.required {
        let failed = match (fields.get(field), mode) {
            (Some(value), _) => is_blank(value),
            (None, FormMode::Create) => true,
            (None, FormMode::Update) => false,
        };
        if failed {
            errors.push(field, "is required");
        }
    }

    for (field, check) in rules.checks {
        // Blank optional fields are fine; required ones were reported above
        let Some(value) = fields.get(*field).filter(|v| !is_blank(v)) else {
            continue;
        };
        if let Some(message) = check_field(check, value) {
            errors.push(field, message);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_reports_every_missing_required_field() {
        let err = validate_payload(Resource::Programs, &json!({"name": "Merit"}), FormMode::Create)
            .unwrap_err();
        let ScholarError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("category"), Some("is required"));
        assert_eq!(errors.get("level"), Some("is required"));
        assert_eq!(errors.get("status"), Some("is required"));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn test_update_allows_partial_payload_but_not_blanks() {
        assert!(
            validate_payload(
                Resource::Schools,
                &json!({"city": "Caloocan"}),
                FormMode::Update
            )
            .is_ok()
        );

        let err = validate_payload(Resource::Schools, &json!({"name": "  "}), FormMode::Update)
            .unwrap_err();
        assert!(matches!(err, ScholarError::Validation(ref e) if e.get("name").is_some()));
    }

    #[test]
    fn test_format_checks() {
        let payload = json!({
            "studentId": "2024-0001",
            "firstName": "Ana",
            "lastName": "Reyes",
            "email": "ana.reyes",
            "school": "Caloocan National High School",
            "generalWeightedAverage": "6.2",
            "enrolledDate": "last june",
        });
        let ScholarError::Validation(errors) =
            validate_payload(Resource::Students, &payload, FormMode::Create).unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("email"), Some("must be a valid email address"));
        assert_eq!(
            errors.get("generalWeightedAverage"),
            Some("must be between 1.0 and 5.0")
        );
        assert_eq!(errors.get("enrolledDate"), Some("must be a date (YYYY-MM-DD)"));
    }

    #[test]
    fn test_valid_application_passes() {
        let payload = json!({
            "name": "Maria Santos",
            "studentId": "2024-0012",
            "school": "Caloocan National High School",
            "program": "Iskolar ng Bayan",
            "submittedDate": "2024-03-05",
            "generalWeightedAverage": 1.75,
        });
        assert!(validate_payload(Resource::Applications, &payload, FormMode::Create).is_ok());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = validate_payload(Resource::Schools, &json!([1, 2]), FormMode::Create).unwrap_err();
        assert!(matches!(err, ScholarError::InvalidData(_)));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.push("name", "is required");
        errors.push("email", "must be a valid email address");
        assert_eq!(
            errors.to_string(),
            "  name: is required\n  email: must be a valid email address"
        );
    }
}
