//! SoftLayer API error types

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the query executor, the key resolver and the poller
#[derive(Error, Debug)]
pub enum SoftLayerError {
    #[error("Expected a lookup key of type string or int, received {0}")]
    InvalidKeyType(String),

    #[error("Transport error while calling {resource}: {message}")]
    Transport { resource: String, message: String },

    #[error("Could not retrieve {resource}, HTTP error code: '{status}'")]
    RemoteRequestFailed { status: u16, resource: String },

    #[error("Failed to decode {resource} response: {reason}")]
    MalformedResponse { resource: String, reason: String },

    #[error("{kind} {key} not found")]
    NotFound { kind: String, key: String },

    #[error("Expected exactly one {resource}, found {count}")]
    AmbiguousResult { resource: String, count: usize },

    #[error("Timed out after {elapsed:?} waiting for completion ({attempts} probes)")]
    TimeoutExceeded { elapsed: Duration, attempts: u32 },

    #[error("SoftLayer API error{}: {message}", fmt_code(.code))]
    Api {
        code: Option<String>,
        message: String,
    },

    #[error("{operation} failed, got '{body}' as response from the API")]
    UnexpectedResponse { operation: String, body: String },

    #[error("Invalid poll configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SoftLayerError {
    /// Whether the error is a 5xx response, the only class a caller may retry
    pub fn is_server_error(&self) -> bool {
        matches!(self, SoftLayerError::RemoteRequestFailed { status, .. } if (500..=599).contains(status))
    }
}

fn fmt_code(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SoftLayerError>;
