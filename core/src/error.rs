//! Error types for the study-records client.
//!
//! # Design
//! Every failure carries the `Operation` that produced it. Protocol failures
//! keep the raw status code and body; there is no per-status variant, so
//! callers that care about "not found" ask `is_not_found()`.

use std::fmt;

use thiserror::Error;

/// The client operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListRecords,
    ListAllRecords,
    GetRecord,
    CreateRecord,
    UpdateRecord,
    DeleteRecord,
    GetStats,
    GetCategoryStats,
    GetDifficultyStats,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListRecords => "list records",
            Operation::ListAllRecords => "list all records",
            Operation::GetRecord => "get record",
            Operation::CreateRecord => "create record",
            Operation::UpdateRecord => "update record",
            Operation::DeleteRecord => "delete record",
            Operation::GetStats => "get stats",
            Operation::GetCategoryStats => "get category stats",
            Operation::GetDifficultyStats => "get difficulty stats",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to complete the network round trip at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
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

/// Errors returned by `StudyRecordApi` parse methods and `RecordClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, reset, ...).
    #[error("{operation}: transport failure: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },

    /// The server answered with a status outside 200..=299.
    #[error("{operation}: HTTP {status}: {body}")]
    Status {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// The body could not be decoded or broke a schema invariant.
    #[error("{operation}: malformed response: {message}")]
    MalformedResponse { operation: Operation, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("{operation}: serialization failed: {message}")]
    Serialization { operation: Operation, message: String },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Transport { operation, .. }
            | ApiError::Status { operation, .. }
            | ApiError::MalformedResponse { operation, .. }
            | ApiError::Serialization { operation, .. } => *operation,
        }
    }

    /// HTTP status code, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_operation_and_status() {
        let err = ApiError::Status {
            operation: Operation::GetRecord,
            status: 404,
            body: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "get record: HTTP 404: missing");
        assert!(err.is_not_found());
        assert_eq!(err.operation(), Operation::GetRecord);
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::Transport {
            operation: Operation::GetStats,
            source: TransportError::new("connection refused"),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "get stats: transport failure: connection refused"
        );
    }
}
