//! Typed records for each API resource.
//!
//! Every field is optional: list endpoints return partial rows and older
//! records miss newer columns. Field names follow the API's camelCase keys.

use serde::{Deserialize, Serialize};

use super::{FieldValue, Record, RecordId, lenient_number, number_field, text_field};

/// A partner school
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Public or private
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Elementary, high school, college...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub student_count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partnership_date: Option<String>,
}

impl Record for School {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => text_field(&self.name),
            "address" => text_field(&self.address),
            "city" => text_field(&self.city),
            "province" => text_field(&self.province),
            "region" => text_field(&self.region),
            "category" => text_field(&self.category),
            "level" => text_field(&self.level),
            "status" => text_field(&self.status),
            "contactPerson" => text_field(&self.contact_person),
            "contactEmail" => text_field(&self.contact_email),
            "studentCount" => number_field(self.student_count),
            "partnershipDate" => text_field(&self.partnership_date),
            _ => None,
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

/// A scholarship program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merit, need-based, athletic...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub slots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl Record for Program {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => text_field(&self.name),
            "description" => text_field(&self.description),
            "category" => text_field(&self.category),
            "level" => text_field(&self.level),
            "status" => text_field(&self.status),
            "sponsor" => text_field(&self.sponsor),
            "amount" => number_field(self.amount),
            "slots" => number_field(self.slots),
            "deadline" => text_field(&self.deadline),
            _ => None,
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

/// A scholarship application submitted by a student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Pending, under review, approved, rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub general_weighted_average: Option<f64>,
}

impl Record for Application {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => text_field(&self.name),
            "studentId" => text_field(&self.student_id),
            "school" => text_field(&self.school),
            "program" => text_field(&self.program),
            "category" => text_field(&self.category),
            "level" => text_field(&self.level),
            "status" => text_field(&self.status),
            "submittedDate" => text_field(&self.submitted_date),
            "generalWeightedAverage" => number_field(self.general_weighted_average),
            _ => None,
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

/// A scholar or applicant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub general_weighted_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_date: Option<String>,
}

impl Student {
    /// "First Last", or whichever part is present.
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }
}

impl Record for Student {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => self.full_name().map(|n| FieldValue::Text(n.into())),
            "studentId" => text_field(&self.student_id),
            "firstName" => text_field(&self.first_name),
            "lastName" => text_field(&self.last_name),
            "email" => text_field(&self.email),
            "school" => text_field(&self.school),
            "course" => text_field(&self.course),
            "level" => text_field(&self.level),
            "yearLevel" => text_field(&self.year_level),
            "status" => text_field(&self.status),
            "generalWeightedAverage" => number_field(self.general_weighted_average),
            "enrolledDate" => text_field(&self.enrolled_date),
            _ => None,
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

/// A document submitted with an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Transcript, certificate of enrollment, ID...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    /// Pending, verified, rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_date: Option<String>,
}

impl Record for Document {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => text_field(&self.name),
            "category" => text_field(&self.category),
            "studentName" => text_field(&self.student_name),
            "applicationId" => text_field(&self.application_id),
            "status" => text_field(&self.status),
            "fileType" => text_field(&self.file_type),
            "fileSize" => number_field(self.file_size),
            "uploadedDate" => text_field(&self.uploaded_date),
            _ => None,
        }
    }

    fn record_id(&self) -> Option<RecordId> {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_deserializes_camel_case_and_lenient_numbers() {
        let app: Application = serde_json::from_value(json!({
            "id": 12,
            "name": "Maria Santos",
            "studentId": "2024-0012",
            "status": "approved",
            "submittedDate": "2024-03-05",
            "generalWeightedAverage": "1.75",
        }))
        .unwrap();

        assert_eq!(app.id, Some(RecordId::new("12")));
        assert_eq!(app.student_id.as_deref(), Some("2024-0012"));
        assert_eq!(app.general_weighted_average, Some(1.75));
        assert_eq!(
            app.field("generalWeightedAverage"),
            Some(FieldValue::Number(1.75))
        );
    }

    #[test]
    fn test_unparsable_number_becomes_missing() {
        let app: Application = serde_json::from_value(json!({
            "generalWeightedAverage": "n/a",
        }))
        .unwrap();
        assert_eq!(app.general_weighted_average, None);
        assert_eq!(app.field("generalWeightedAverage"), None);
    }

    #[test]
    fn test_null_fields_are_missing() {
        let school: School = serde_json::from_value(json!({
            "name": "Tala Elementary School",
            "city": null,
        }))
        .unwrap();
        assert_eq!(school.field("city"), None);
        assert_eq!(school.field("unknown"), None);
    }

    #[test]
    fn test_student_full_name() {
        let student = Student {
            first_name: Some("Jose".to_string()),
            last_name: Some("Rizal".to_string()),
            ..Default::default()
        };
        assert_eq!(student.full_name().as_deref(), Some("Jose Rizal"));
        assert_eq!(
            student.field("name").map(|v| v.as_text().into_owned()),
            Some("Jose Rizal".to_string())
        );

        let only_last = Student {
            last_name: Some("Rizal".to_string()),
            ..Default::default()
        };
        assert_eq!(only_last.full_name().as_deref(), Some("Rizal"));
    }

    #[test]
    fn test_serialize_skips_missing_fields() {
        let program = Program {
            name: Some("Iskolar ng Bayan".to_string()),
            amount: Some(15000.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&program).unwrap();
        assert_eq!(value, json!({"name": "Iskolar ng Bayan", "amount": 15000.0}));
    }
}
