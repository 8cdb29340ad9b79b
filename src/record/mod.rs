//! Domain records and the narrow field-access trait the list pipeline reads.
//!
//! Records come from different resources with different shapes. The pipeline
//! never depends on a fixed schema: it only asks a record for a named field
//! through [`Record::field`], and treats an absent field as "not there".

pub mod types;
pub mod validate;

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ScholarError;

pub use types::{Application, Document, Program, School, Student};

/// A value read from a record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    /// Text form of the value, as shown to users and matched by search.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
        }
    }
}

/// Format a number without a trailing `.0` for whole values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Field access over a record, by the camelCase name the API uses.
pub trait Record {
    /// Look up a field. `None` means the record has no value for it.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Identifier of the record, if it has one.
    fn record_id(&self) -> Option<RecordId>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        (**self).field(name)
    }

    fn record_id(&self) -> Option<RecordId> {
        (**self).record_id()
    }
}

/// Borrow an optional string field as a [`FieldValue`].
pub(crate) fn text_field(value: &Option<String>) -> Option<FieldValue<'_>> {
    value.as_deref().map(FieldValue::text)
}

pub(crate) fn number_field(value: Option<f64>) -> Option<FieldValue<'static>> {
    value.map(FieldValue::Number)
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match self.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(FieldValue::text(s)),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number),
            serde_json::Value::Bool(b) => Some(FieldValue::Text(Cow::Owned(b.to_string()))),
            other => Some(FieldValue::Text(Cow::Owned(other.to_string()))),
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        match self.get("id")? {
            serde_json::Value::String(s) => Some(RecordId::new(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(|n| RecordId::new(format_number(n))),
            _ => None,
        }
    }
}

/// Record identifier. The API hands out numeric and string ids alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Int(n) => RecordId(n.to_string()),
            RawId::Float(n) => RecordId(format_number(n)),
        })
    }
}

/// Deserialize a number that may arrive as a JSON number or a numeric string.
///
/// Strings that do not parse become `None`.
pub(crate) fn lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Number(n)) => Some(n),
        Some(RawNumber::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        None => None,
    })
}

/// API resources served by the CRUD backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Schools,
    Programs,
    Applications,
    Documents,
    Students,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Schools,
        Resource::Programs,
        Resource::Applications,
        Resource::Documents,
        Resource::Students,
    ];

    /// Path segment of the resource on the API.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Schools => "schools",
            Resource::Programs => "programs",
            Resource::Applications => "applications",
            Resource::Documents => "documents",
            Resource::Students => "students",
        }
    }

    /// Singular label used in messages.
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Schools => "school",
            Resource::Programs => "program",
            Resource::Applications => "application",
            Resource::Documents => "document",
            Resource::Students => "student",
        }
    }
}

enum_display_fromstr!(
    Resource,
    ScholarError::InvalidResource,
    {
        Schools => "schools",
        Programs => "programs",
        Applications => "applications",
        Documents => "documents",
        Students => "students",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([7, "sch-9", 3.0])).unwrap();
        assert_eq!(ids[0].as_str(), "7");
        assert_eq!(ids[1].as_str(), "sch-9");
        assert_eq!(ids[2].as_str(), "3");
    }

    #[test]
    fn test_json_value_field_access() {
        let record = json!({
            "name": "Bagong Silang High School",
            "city": null,
            "enrolled": 1200,
            "accredited": true,
        });

        assert_eq!(
            record.field("name"),
            Some(FieldValue::text("Bagong Silang High School"))
        );
        assert_eq!(record.field("city"), None);
        assert_eq!(record.field("region"), None);
        assert_eq!(record.field("enrolled"), Some(FieldValue::Number(1200.0)));
        assert_eq!(record.record_id(), None);
        assert_eq!(
            json!({"id": 42}).record_id(),
            Some(RecordId::new("42"))
        );
        assert_eq!(
            record.field("accredited").map(|v| v.as_text().into_owned()),
            Some("true".to_string())
        );
    }

    #[test]
    fn test_number_as_text() {
        assert_eq!(FieldValue::Number(1200.0).as_text(), "1200");
        assert_eq!(FieldValue::Number(1.75).as_text(), "1.75");
    }

    #[test]
    fn test_resource_from_str() {
        assert_eq!("schools".parse::<Resource>().unwrap(), Resource::Schools);
        assert_eq!(
            "Applications".parse::<Resource>().unwrap(),
            Resource::Applications
        );
        assert!("school".parse::<Resource>().is_err());
        assert!("".parse::<Resource>().is_err());
    }

    #[test]
    fn test_resource_display_round_trips_path() {
        for resource in Resource::ALL {
            assert_eq!(resource.to_string(), resource.path());
        }
    }
}
