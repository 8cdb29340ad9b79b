//! Read-only record source backed by a JSON file.
//!
//! The file holds either one resource's list body (`[...]` or
//! `{ "data": [...] }`) or an object keyed by resource name, such as
//! `{ "schools": [...], "applications": { "data": [...] } }`.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{ListBody, ListParams, MutationOutcome, RecordSource};
use crate::error::{Result, ScholarError};
use crate::record::{Record, Resource};

#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_values(&self, resource: Resource) -> Result<Vec<Value>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            ScholarError::Fetch(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let root: Value = serde_json::from_slice(&content).map_err(|e| {
            ScholarError::Fetch(format!("invalid JSON in {}: {e}", self.path.display()))
        })?;
        select_resource(root, resource)
    }
}

/// Pick the resource's records out of a file's root value.
fn select_resource(root: Value, resource: Resource) -> Result<Vec<Value>> {
    let section = match root {
        Value::Object(mut map) if map.contains_key(resource.path()) => {
            map.remove(resource.path()).unwrap_or(Value::Null)
        }
        other => other,
    };
    let body: ListBody<Value> = serde_json::from_value(section).map_err(|_| {
        ScholarError::Fetch(format!(
            "no {} records in file: expected an array, a 'data' array, or a '{}' key",
            resource.singular(),
            resource.path()
        ))
    })?;
    Ok(body.into_records())
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value)
        .map_err(|e| ScholarError::Fetch(format!("unexpected record shape: {e}")))
}

impl RecordSource for FileRecordSource {
    async fn list<R: DeserializeOwned + Send>(
        &self,
        resource: Resource,
        _params: &ListParams,
    ) -> Result<Vec<R>> {
        let values = self.read_values(resource).await?;
        tracing::debug!(
            "loaded {} {} records from {}",
            values.len(),
            resource,
            self.path.display()
        );
        values.into_iter().map(decode).collect()
    }

    async fn fetch<R: DeserializeOwned + Send>(&self, resource: Resource, id: &str) -> Result<R> {
        let values = self.read_values(resource).await?;
        let found = values
            .into_iter()
            .find(|v| v.record_id().is_some_and(|rid| rid.as_str() == id))
            .ok_or_else(|| ScholarError::RecordNotFound(id.to_string()))?;
        decode(found)
    }

    async fn create(&self, _resource: Resource, _payload: &Value) -> Result<MutationOutcome> {
        Err(ScholarError::ReadOnlySource)
    }

    async fn update(
        &self,
        _resource: Resource,
        _id: &str,
        _payload: &Value,
    ) -> Result<MutationOutcome> {
        Err(ScholarError::ReadOnlySource)
    }

    async fn delete(&self, _resource: Resource, _id: &str) -> Result<MutationOutcome> {
        Err(ScholarError::ReadOnlySource)
    }

    async fn download(&self, _document_id: &str) -> Result<Vec<u8>> {
        Err(ScholarError::Fetch(
            "documents can only be downloaded from the API".to_string(),
        ))
    }
}
