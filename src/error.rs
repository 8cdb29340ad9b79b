use thiserror::Error;

use crate::record::validate::FieldErrors;

#[derive(Error, Debug)]
pub enum ScholarError {
    #[error("record '{0}' not found")]
    RecordNotFound(String),

    #[error("invalid resource '{0}'. Valid resources: schools, programs, applications, documents, students")]
    InvalidResource(String),

    #[error("invalid sort order '{0}'. Expected: asc or desc")]
    InvalidSortOrder(String),

    #[error("invalid sort key '{key}'. Valid keys: {valid}")]
    InvalidSortKey { key: String, valid: String },

    #[error("invalid record data: {0}")]
    InvalidData(String),

    // Record source errors
    #[error("failed to load records: {0}")]
    Fetch(String),

    #[error("failed to save changes: {0}")]
    Mutation(String),

    #[error("validation failed:\n{0}")]
    Validation(FieldErrors),

    #[error("the record source is read-only")]
    ReadOnlySource,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScholarError>;
