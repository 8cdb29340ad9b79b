//! Terminal rendering of list pages and record details.

use owo_colors::{OwoColorize, Stream};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::record::{Record, Resource};
use crate::view::ListViewModel;

/// A displayed record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
}

const fn col(header: &'static str, field: &'static str) -> Column {
    Column { header, field }
}

const SCHOOL_TABLE: &[Column] = &[
    col("Name", "name"),
    col("City", "city"),
    col("Region", "region"),
    col("Level", "level"),
    col("Students", "studentCount"),
    col("Status", "status"),
];

const SCHOOL_DETAIL: &[Column] = &[
    col("Name", "name"),
    col("Address", "address"),
    col("City", "city"),
    col("Province", "province"),
    col("Region", "region"),
    col("Category", "category"),
    col("Level", "level"),
    col("Status", "status"),
    col("Contact", "contactPerson"),
    col("Email", "contactEmail"),
    col("Students", "studentCount"),
    col("Partner since", "partnershipDate"),
];

const PROGRAM_TABLE: &[Column] = &[
    col("Name", "name"),
    col("Category", "category"),
    col("Level", "level"),
    col("Amount", "amount"),
    col("Slots", "slots"),
    col("Deadline", "deadline"),
    col("Status", "status"),
];

const PROGRAM_DETAIL: &[Column] = &[
    col("Name", "name"),
    col("Description", "description"),
    col("Sponsor", "sponsor"),
    col("Category", "category"),
    col("Level", "level"),
    col("Amount", "amount"),
    col("Slots", "slots"),
    col("Deadline", "deadline"),
    col("Status", "status"),
];

const APPLICATION_TABLE: &[Column] = &[
    col("Name", "name"),
    col("Student ID", "studentId"),
    col("School", "school"),
    col("Program", "program"),
    col("GWA", "generalWeightedAverage"),
    col("Submitted", "submittedDate"),
    col("Status", "status"),
];

const APPLICATION_DETAIL: &[Column] = &[
    col("Name", "name"),
    col("Student ID", "studentId"),
    col("School", "school"),
    col("Program", "program"),
    col("Category", "category"),
    col("Level", "level"),
    col("GWA", "generalWeightedAverage"),
    col("Submitted", "submittedDate"),
    col("Status", "status"),
];

const DOCUMENT_TABLE: &[Column] = &[
    col("Name", "name"),
    col("Student", "studentName"),
    col("Category", "category"),
    col("Type", "fileType"),
    col("Size", "fileSize"),
    col("Uploaded", "uploadedDate"),
    col("Status", "status"),
];

const DOCUMENT_DETAIL: &[Column] = &[
    col("Name", "name"),
    col("Student", "studentName"),
    col("Application", "applicationId"),
    col("Category", "category"),
    col("Type", "fileType"),
    col("Size", "fileSize"),
    col("Uploaded", "uploadedDate"),
    col("Status", "status"),
];

const STUDENT_TABLE: &[Column] = &[
    col("Name", "name"),
    col("Student ID", "studentId"),
    col("School", "school"),
    col("Course", "course"),
    col("Year", "yearLevel"),
    col("GWA", "generalWeightedAverage"),
    col("Status", "status"),
];

const STUDENT_DETAIL: &[Column] = &[
    col("Name", "name"),
    col("Student ID", "studentId"),
    col("Email", "email"),
    col("School", "school"),
    col("Course", "course"),
    col("Level", "level"),
    col("Year", "yearLevel"),
    col("GWA", "generalWeightedAverage"),
    col("Enrolled", "enrolledDate"),
    col("Status", "status"),
];

/// Columns of a resource's list table, after the ID column.
pub fn table_columns(resource: Resource) -> &'static [Column] {
    match resource {
        Resource::Schools => SCHOOL_TABLE,
        Resource::Programs => PROGRAM_TABLE,
        Resource::Applications => APPLICATION_TABLE,
        Resource::Documents => DOCUMENT_TABLE,
        Resource::Students => STUDENT_TABLE,
    }
}

pub fn detail_columns(resource: Resource) -> &'static [Column] {
    match resource {
        Resource::Schools => SCHOOL_DETAIL,
        Resource::Programs => PROGRAM_DETAIL,
        Resource::Applications => APPLICATION_DETAIL,
        Resource::Documents => DOCUMENT_DETAIL,
        Resource::Students => STUDENT_DETAIL,
    }
}

fn cell<R: Record + ?Sized>(record: &R, field: &str) -> String {
    record
        .field(field)
        .map(|v| v.as_text().into_owned())
        .unwrap_or_default()
}

fn id_cell<R: Record + ?Sized>(record: &R) -> String {
    record
        .record_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render records as a table with an ID column first.
pub fn format_table<R: Record>(resource: Resource, rows: &[&R]) -> String {
    let columns = table_columns(resource);

    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("ID".to_string()).chain(columns.iter().map(|c| c.header.to_string())),
    );
    for record in rows {
        builder.push_record(
            std::iter::once(id_cell(*record)).chain(columns.iter().map(|c| cell(*record, c.field))),
        );
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// "Showing 11 to 20 of 25 · Page 2 of 3"
pub fn format_footer<R>(vm: &ListViewModel<'_, R>) -> String {
    format!(
        "{} · Page {} of {}",
        vm.range_label, vm.current_page, vm.total_pages
    )
}

/// Page buttons around the current page, current one in brackets.
pub fn format_page_buttons<R>(vm: &ListViewModel<'_, R>) -> String {
    let mut parts = Vec::new();
    if vm.has_previous {
        parts.push("‹ Prev".to_string());
    }
    parts.extend(vm.page_buttons.iter().map(|&n| {
        if n == vm.current_page {
            format!("[{n}]")
        } else {
            n.to_string()
        }
    }));
    if vm.has_next {
        parts.push("Next ›".to_string());
    }
    parts.join(" ")
}

/// Colour a status value by what it means for the record.
pub fn format_status_colored(status: &str) -> String {
    let normalized = status.trim().to_lowercase();
    match normalized.as_str() {
        "approved" | "active" | "verified" | "accepted" | "completed" | "open" => status
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string(),
        "pending" | "submitted" | "under review" | "under_review" | "for review" => status
            .if_supports_color(Stream::Stdout, |s| s.yellow())
            .to_string(),
        "rejected" | "declined" | "inactive" | "expired" | "closed" => status
            .if_supports_color(Stream::Stdout, |s| s.red())
            .to_string(),
        _ => status.to_string(),
    }
}

/// Render one record as aligned `label: value` lines.
pub fn format_detail<R: Record>(resource: Resource, record: &R) -> String {
    let columns = detail_columns(resource);
    let width = columns.iter().map(|c| c.header.len()).max().unwrap_or(0).max(2);

    let mut out = format!("{:width$}  {}\n", "ID", id_cell(record));
    for column in columns {
        let Some(value) = record.field(column.field) else {
            continue;
        };
        let value = value.as_text();
        let value = if column.field == "status" {
            format_status_colored(&value)
        } else {
            value.into_owned()
        };
        out.push_str(&format!("{:width$}  {value}\n", column.header));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortState;
    use crate::record::{RecordId, School};
    use crate::view::ListViewModel;

    fn school(id: &str, name: &str, city: Option<&str>) -> School {
        School {
            id: Some(RecordId::new(id)),
            name: Some(name.to_string()),
            city: city.map(str::to_string),
            status: Some("active".to_string()),
            student_count: Some(420.0),
            ..Default::default()
        }
    }

    fn view_model<'a>(sort: &'a SortState, current: usize, total: usize) -> ListViewModel<'a, School> {
        ListViewModel {
            rows: vec![],
            start_index: (current - 1) * 10,
            range_label: format!("Showing {} to {} of 95", (current - 1) * 10 + 1, current * 10),
            current_page: current,
            total_pages: total,
            page_buttons: crate::query::page_window(current, total),
            has_previous: current > 1,
            has_next: current < total,
            total_filtered: 95,
            total_all: 95,
            sort,
            is_loading: false,
            error: None,
            empty_state: None,
        }
    }

    #[test]
    fn test_table_columns_are_shown_in_detail() {
        for resource in Resource::ALL {
            let detail = detail_columns(resource);
            for column in table_columns(resource) {
                assert!(
                    detail.contains(column),
                    "{resource} detail view is missing {}",
                    column.field
                );
            }
        }
    }

    #[test]
    fn test_format_table_renders_missing_fields_blank() {
        let a = school("1", "Tala High", Some("Caloocan"));
        let b = school("2", "Bagong Silang Elementary", None);
        let table = format_table(Resource::Schools, &[&a, &b]);

        assert!(table.contains("ID"));
        assert!(table.contains("Tala High"));
        assert!(table.contains("Caloocan"));
        assert!(table.contains("420"));
        assert!(!table.contains("420.0"));
        assert_eq!(table.lines().filter(|l| l.contains("Bagong")).count(), 1);
    }

    #[test]
    fn test_format_footer() {
        let sort = SortState::new("name", crate::query::SortOrder::Desc);
        let vm = view_model(&sort, 2, 10);
        insta::assert_snapshot!(format_footer(&vm), @"Showing 11 to 20 of 95 · Page 2 of 10");
    }

    #[test]
    fn test_format_page_buttons() {
        let sort = SortState::new("name", crate::query::SortOrder::Desc);
        insta::assert_snapshot!(
            format_page_buttons(&view_model(&sort, 1, 10)),
            @"[1] 2 3 4 5 Next ›"
        );
        insta::assert_snapshot!(
            format_page_buttons(&view_model(&sort, 6, 10)),
            @"‹ Prev 4 5 [6] 7 8 Next ›"
        );
        insta::assert_snapshot!(
            format_page_buttons(&view_model(&sort, 10, 10)),
            @"‹ Prev 6 7 8 9 [10]"
        );
    }

    #[test]
    fn test_format_detail_skips_missing_fields() {
        let s = school("7", "Tala High", None);
        let detail = format_detail(Resource::Schools, &s);
        let first = detail.lines().next().unwrap();
        assert!(first.starts_with("ID"));
        assert!(first.ends_with("7"));
        assert!(detail.contains("Tala High"));
        assert!(!detail.contains("City"));
        assert!(detail.contains("Students"));
    }

    #[test]
    fn test_unknown_status_is_plain() {
        assert_eq!(format_status_colored("archived"), "archived");
    }
}
