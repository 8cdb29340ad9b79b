//! Create, update and delete commands.
//!
//! Payloads are validated locally first; nothing is sent when a field is
//! missing or malformed.

use std::fs;

use owo_colors::{OwoColorize, Stream};
use serde_json::{Value, json};

use super::CommandOutput;
use crate::api::{HttpRecordSource, MutationOutcome, Operation, RecordSource};
use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::record::validate::{FormMode, validate_payload};
use crate::record::{Record, Resource};

/// Parse `--data`: inline JSON, or `@path` to read it from a file.
pub fn read_payload(data: &str) -> Result<Value> {
    let content = match data.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            ScholarError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read payload from {path}: {e}"),
            ))
        })?,
        None => data.to_string(),
    };
    let payload: Value = serde_json::from_str(&content)
        .map_err(|e| ScholarError::InvalidData(format!("payload is not valid JSON: {e}")))?;
    if !payload.is_object() {
        return Err(ScholarError::InvalidData(
            "payload must be a JSON object".to_string(),
        ));
    }
    Ok(payload)
}

fn report(
    operation: Operation,
    resource: Resource,
    id: Option<&str>,
    outcome: MutationOutcome,
    json: bool,
) -> Result<()> {
    let id = id
        .map(str::to_string)
        .or_else(|| outcome.data.as_ref().and_then(|d| d.record_id()).map(|id| id.to_string()));

    let verb = match operation {
        Operation::Create => "Created",
        Operation::Update => "Updated",
        _ => "Deleted",
    };
    let mut text = match &id {
        Some(id) => format!(
            "{verb} {} {}",
            resource.singular(),
            id.if_supports_color(Stream::Stdout, |s| s.cyan())
        ),
        None => format!("{verb} {}", resource.singular()),
    };
    if let Some(message) = &outcome.message {
        text.push_str(&format!(
            "\n{}",
            message.if_supports_color(Stream::Stdout, |s| s.dimmed())
        ));
    }

    let json_output = json!({
        "action": operation.to_string(),
        "resource": resource.to_string(),
        "id": id,
        "success": true,
        "message": outcome.message,
        "data": outcome.data,
    });

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Create a record
pub async fn cmd_create(resource: Resource, data: &str, json: bool) -> Result<()> {
    let payload = read_payload(data)?;
    validate_payload(resource, &payload, FormMode::Create)?;

    let config = Config::load()?;
    let source = HttpRecordSource::from_config(&config)?;
    let outcome = source.create(resource, &payload).await?;
    report(Operation::Create, resource, None, outcome, json)
}

/// Update a record
pub async fn cmd_update(resource: Resource, id: &str, data: &str, json: bool) -> Result<()> {
    let payload = read_payload(data)?;
    validate_payload(resource, &payload, FormMode::Update)?;

    let config = Config::load()?;
    let source = HttpRecordSource::from_config(&config)?;
    let outcome = source.update(resource, id, &payload).await?;
    report(Operation::Update, resource, Some(id), outcome, json)
}

/// Delete a record
pub async fn cmd_delete(resource: Resource, id: &str, json: bool) -> Result<()> {
    let config = Config::load()?;
    let source = HttpRecordSource::from_config(&config)?;
    let outcome = source.delete(resource, id).await?;
    report(Operation::Delete, resource, Some(id), outcome, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_payload_inline() {
        let payload = read_payload(r#"{"name": "Tala High"}"#).unwrap();
        assert_eq!(payload["name"], "Tala High");
    }

    #[test]
    fn test_read_payload_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("school.json");
        fs::write(&path, r#"{"name": "From File"}"#).unwrap();

        let payload = read_payload(&format!("@{}", path.display())).unwrap();
        assert_eq!(payload["name"], "From File");
    }

    #[test]
    fn test_read_payload_rejects_non_objects() {
        assert!(matches!(
            read_payload("[1, 2]"),
            Err(ScholarError::InvalidData(_))
        ));
        assert!(matches!(
            read_payload("{not json"),
            Err(ScholarError::InvalidData(_))
        ));
        assert!(matches!(
            read_payload("@/nonexistent/payload.json"),
            Err(ScholarError::Io(_))
        ));
    }
}
