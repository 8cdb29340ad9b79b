//! Record sources: where list screens get their records from.
//!
//! The CRUD backend is reached through [`HttpRecordSource`]; a JSON export on
//! disk can stand in for it through [`FileRecordSource`] (read-only).

pub mod error;
pub mod file;
pub mod http;

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, ScholarError};
use crate::query::FilterState;
use crate::record::Resource;

pub use error::{ApiError, Operation};
pub use file::FileRecordSource;
pub use http::HttpRecordSource;

/// Query parameters forwarded with a list request.
///
/// Servers that understand them may pre-filter; the client-side pipeline
/// filters again either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    pub fn from_filter(filter: &FilterState) -> Self {
        let search = filter.search_term.trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_string()),
            status: filter.status.value().map(str::to_string),
        }
    }

    /// Pairs to append to the request URL, skipping unset values.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.as_str()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.as_str()));
        }
        pairs
    }
}

/// A list body: `{ "data": [...] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<R> {
    Wrapped { data: Vec<R> },
    Bare(Vec<R>),
}

impl<R> ListBody<R> {
    pub fn into_records(self) -> Vec<R> {
        match self {
            ListBody::Wrapped { data } => data,
            ListBody::Bare(records) => records,
        }
    }
}

/// Parse a list response body.
pub fn parse_list_body<R: DeserializeOwned>(body: &[u8]) -> Result<Vec<R>> {
    let parsed: ListBody<R> = serde_json::from_slice(body).map_err(|e| {
        ScholarError::Fetch(format!(
            "expected a JSON array or an object with a 'data' array: {e}"
        ))
    })?;
    Ok(parsed.into_records())
}

/// Parse a detail body: the record itself or `{ "data": record }`.
pub fn parse_detail_body<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ScholarError::Fetch(format!("invalid JSON in response: {e}")))?;
    let record = match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => map
            .remove("data")
            .unwrap_or(Value::Null),
        other => other,
    };
    serde_json::from_value(record)
        .map_err(|e| ScholarError::Fetch(format!("unexpected record shape: {e}")))
}

/// Body returned by create/update/delete.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MutationBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// A successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub message: Option<String>,
    /// Record as stored by the server, when it echoes it back
    pub data: Option<Value>,
}

impl MutationBody {
    /// Turn `success: false` into a mutation error carrying the server's message.
    pub fn into_outcome(self, operation: Operation) -> Result<MutationOutcome> {
        if self.success {
            Ok(MutationOutcome {
                message: self.message,
                data: self.data,
            })
        } else {
            let message = self
                .message
                .unwrap_or_else(|| format!("server rejected the {operation}"));
            Err(ScholarError::Mutation(message))
        }
    }
}

/// Parse a mutation response body. An empty body counts as success.
pub fn parse_mutation_body(body: &[u8], operation: Operation) -> Result<MutationOutcome> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MutationOutcome {
            message: None,
            data: None,
        });
    }
    let parsed: MutationBody = serde_json::from_slice(body)
        .map_err(|e| ScholarError::Mutation(format!("invalid JSON in response: {e}")))?;
    parsed.into_outcome(operation)
}

/// Source of records for list screens, plus the CRUD operations on them.
pub trait RecordSource: Send + Sync {
    /// Fetch the whole collection of a resource
    fn list<R: DeserializeOwned + Send>(
        &self,
        resource: Resource,
        params: &ListParams,
    ) -> impl std::future::Future<Output = Result<Vec<R>>> + Send;

    /// Fetch one record by id
    fn fetch<R: DeserializeOwned + Send>(
        &self,
        resource: Resource,
        id: &str,
    ) -> impl std::future::Future<Output = Result<R>> + Send;

    fn create(
        &self,
        resource: Resource,
        payload: &Value,
    ) -> impl std::future::Future<Output = Result<MutationOutcome>> + Send;

    fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Value,
    ) -> impl std::future::Future<Output = Result<MutationOutcome>> + Send;

    fn delete(
        &self,
        resource: Resource,
        id: &str,
    ) -> impl std::future::Future<Output = Result<MutationOutcome>> + Send;

    /// Raw bytes of a document
    fn download(
        &self,
        document_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// The record source picked at startup: a JSON file or the HTTP API.
pub enum AnySource {
    File(FileRecordSource),
    Http(HttpRecordSource),
}

impl AnySource {
    /// Read from `from_file` when given, otherwise from the configured API.
    pub fn open(from_file: Option<&Path>, config: &Config) -> Result<Self> {
        match from_file {
            Some(path) => Ok(AnySource::File(FileRecordSource::new(path))),
            None => Ok(AnySource::Http(HttpRecordSource::from_config(config)?)),
        }
    }
}

impl RecordSource for AnySource {
    async fn list<R: DeserializeOwned + Send>(
        &self,
        resource: Resource,
        params: &ListParams,
    ) -> Result<Vec<R>> {
        match self {
            AnySource::File(s) => s.list(resource, params).await,
            AnySource::Http(s) => s.list(resource, params).await,
        }
    }

    async fn fetch<R: DeserializeOwned + Send>(&self, resource: Resource, id: &str) -> Result<R> {
        match self {
            AnySource::File(s) => s.fetch(resource, id).await,
            AnySource::Http(s) => s.fetch(resource, id).await,
        }
    }

    async fn create(&self, resource: Resource, payload: &Value) -> Result<MutationOutcome> {
        match self {
            AnySource::File(s) => s.create(resource, payload).await,
            AnySource::Http(s) => s.create(resource, payload).await,
        }
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Value,
    ) -> Result<MutationOutcome> {
        match self {
            AnySource::File(s) => s.update(resource, id, payload).await,
            AnySource::Http(s) => s.update(resource, id, payload).await,
        }
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<MutationOutcome> {
        match self {
            AnySource::File(s) => s.delete(resource, id).await,
            AnySource::Http(s) => s.delete(resource, id).await,
        }
    }

    async fn download(&self, document_id: &str) -> Result<Vec<u8>> {
        match self {
            AnySource::File(s) => s.download(document_id).await,
            AnySource::Http(s) => s.download(document_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Selection;
    use crate::record::School;

    #[test]
    fn test_parse_list_body_wrapped_and_bare() {
        let wrapped: Vec<School> =
            parse_list_body(br#"{"data": [{"name": "A"}, {"name": "B"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 2);

        let bare: Vec<School> = parse_list_body(br#"[{"name": "C"}]"#).unwrap();
        assert_eq!(bare[0].name.as_deref(), Some("C"));
    }

    #[test]
    fn test_parse_list_body_rejects_other_shapes() {
        let err = parse_list_body::<School>(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, ScholarError::Fetch(_)));
    }

    #[test]
    fn test_parse_detail_body_unwraps_data() {
        let school: School = parse_detail_body(br#"{"data": {"id": 4, "name": "D"}}"#).unwrap();
        assert_eq!(school.name.as_deref(), Some("D"));

        let school: School = parse_detail_body(br#"{"id": 5, "name": "E"}"#).unwrap();
        assert_eq!(school.name.as_deref(), Some("E"));
    }

    #[test]
    fn test_mutation_body_failure_carries_message() {
        let err = parse_mutation_body(
            br#"{"success": false, "message": "School name already exists"}"#,
            Operation::Create,
        )
        .unwrap_err();
        assert!(matches!(err, ScholarError::Mutation(ref m) if m == "School name already exists"));

        let err = parse_mutation_body(br#"{"success": false}"#, Operation::Delete).unwrap_err();
        assert_eq!(err.to_string(), "failed to save changes: server rejected the delete");
    }

    #[test]
    fn test_mutation_body_success() {
        let outcome = parse_mutation_body(
            br#"{"success": true, "message": "Saved", "data": {"id": 9}}"#,
            Operation::Update,
        )
        .unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Saved"));
        assert!(outcome.data.is_some());

        assert!(parse_mutation_body(b"  ", Operation::Delete).is_ok());
    }

    #[test]
    fn test_list_params_from_filter() {
        let filter = FilterState {
            search_term: "  caloocan ".to_string(),
            status: Selection::parse("active"),
            ..Default::default()
        };
        let params = ListParams::from_filter(&filter);
        assert_eq!(
            params.query_pairs(),
            vec![("search", "caloocan"), ("status", "active")]
        );
        assert!(ListParams::from_filter(&FilterState::default()).query_pairs().is_empty());
    }
}
