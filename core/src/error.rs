//! Error types for the GREYHOUND node.
//!
//! # Design
//! `NodeError` is the per-record failure: everything that can go wrong while
//! turning one input record into output records. The batch executor decides
//! whether a `NodeError` aborts the run (`ExecutionError`) or becomes an
//! error record, so no variant carries policy of its own.

use thiserror::Error;

/// Failures produced while building, sending, or parsing a single request.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required node parameter was absent or blank.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A parameter was present but could not be interpreted.
    #[error("invalid parameter {field}: {message}")]
    InvalidParameter { field: &'static str, message: String },

    /// A required credential field was absent or blank.
    #[error("missing credential field: {0}")]
    MissingCredential(&'static str),

    /// The resource/operation pair has no endpoint in the active profile.
    #[error("operation {operation} is not supported for resource {resource}")]
    UnsupportedOperation { resource: String, operation: String },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl NodeError {
    /// The text placed under `json.error` when a failure is collected instead
    /// of aborting the batch.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        NodeError::InvalidParameter {
            field,
            message: message.into(),
        }
    }
}

/// A network-level failure reported by a `Transport`.
#[derive(Debug, Clone, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A fail-fast batch aborted at input record `index`.
#[derive(Debug, Error)]
#[error("item {index}: {source}")]
pub struct ExecutionError {
    pub index: usize,
    #[source]
    pub source: NodeError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_keeps_status_and_body() {
        let err = NodeError::Http {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.message(), "HTTP 401: unauthorized");
    }

    #[test]
    fn transport_error_converts_into_node_error() {
        let err: NodeError = TransportError::new("connection refused").into();
        assert!(matches!(err, NodeError::Transport(_)));
        assert_eq!(err.message(), "transport error: connection refused");
    }

    #[test]
    fn execution_error_names_the_failing_item() {
        let err = ExecutionError {
            index: 3,
            source: NodeError::MissingParameter("itemId"),
        };
        assert_eq!(err.to_string(), "item 3: missing required parameter: itemId");
    }
}
