//! Error mapping for record source failures.
//!
//! Reads and writes fail differently for the user: a failed read leaves the
//! list in its error state with a retry, a failed write keeps the form open.
//! [`ApiError`] records which kind of operation failed so the conversion to
//! [`ScholarError`] lands on the right variant.

use std::fmt;

use crate::error::ScholarError;

/// Kind of request that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Detail,
    Create,
    Update,
    Delete,
    Download,
}

enum_display!(
    Operation,
    {
        List => "list",
        Detail => "detail",
        Create => "create",
        Update => "update",
        Delete => "delete",
        Download => "download",
    }
);

impl Operation {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Delete
        )
    }
}

/// A failed API request.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if the server answered
    pub status: Option<reqwest::StatusCode>,
    pub message: String,
    pub operation: Operation,
}

impl ApiError {
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            operation,
        }
    }

    pub fn with_status(
        operation: Operation,
        status: reqwest::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            operation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(reqwest::StatusCode::NOT_FOUND)
    }

    pub fn from_reqwest(operation: Operation, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "could not connect to the server".to_string()
        } else if err.is_decode() {
            format!("unexpected response body: {err}")
        } else {
            err.to_string()
        };
        Self {
            status: err.status(),
            message,
            operation,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status.as_u16(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<ApiError> for ScholarError {
    fn from(err: ApiError) -> Self {
        if err.operation.is_mutation() {
            ScholarError::Mutation(err.to_string())
        } else {
            ScholarError::Fetch(err.to_string())
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// The API answers errors with `{ "message": ... }` or `{ "error": ... }`;
/// anything else falls back to the trimmed body text.
pub fn message_from_body(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return Some(message.to_string());
            }
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_failures_become_fetch_errors() {
        let err: ScholarError =
            ApiError::with_status(Operation::List, reqwest::StatusCode::BAD_GATEWAY, "upstream")
                .into();
        assert!(matches!(err, ScholarError::Fetch(ref m) if m == "HTTP 502: upstream"));
    }

    #[test]
    fn test_write_failures_become_mutation_errors() {
        let err: ScholarError = ApiError::new(Operation::Delete, "record is locked").into();
        assert!(matches!(err, ScholarError::Mutation(ref m) if m == "record is locked"));
    }

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            message_from_body(r#"{"success": false, "message": "Name already taken"}"#),
            Some("Name already taken".to_string())
        );
        assert_eq!(
            message_from_body(r#"{"error": "Unauthorized"}"#),
            Some("Unauthorized".to_string())
        );
        assert_eq!(
            message_from_body("Service Unavailable\n"),
            Some("Service Unavailable".to_string())
        );
        assert_eq!(message_from_body("   "), None);
    }
}
