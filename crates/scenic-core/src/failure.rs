//! Remote resource API failure model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One error entry returned by the remote API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureError {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Structured failure body: `{"errors": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub errors: Option<Vec<FailureError>>,
}

impl Failure {
    /// First error entry, if any
    pub fn first(&self) -> Option<&FailureError> {
        self.errors.as_ref()?.first()
    }
}

/// Failure payload as surfaced by the API client: `{"failure": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureResponse {
    #[serde(default)]
    pub failure: Option<Failure>,
}

impl FailureResponse {
    pub fn new(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
        }
    }

    fn summary(&self) -> String {
        self.failure
            .as_ref()
            .and_then(Failure::first)
            .map(|e| {
                format!(
                    "{} ({})",
                    e.title.as_deref().unwrap_or("untitled"),
                    e.status.as_deref().unwrap_or("no status")
                )
            })
            .unwrap_or_else(|| "no error details".to_string())
    }
}

/// Error returned by a remote resource API call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The API answered with a structured failure payload
    #[error("Remote API failure: {}", .0.summary())]
    Structured(FailureResponse),
    /// Transport errors and unparseable responses
    #[error("Unknown remote API error: {0}")]
    Unknown(String),
}

impl RemoteError {
    /// Structured error with a single entry
    pub fn status(status: u16, title: impl Into<String>) -> Self {
        Self::Structured(FailureResponse::new(Failure {
            errors: Some(vec![FailureError {
                status: Some(status.to_string()),
                title: Some(title.into()),
                ..FailureError::default()
            }]),
        }))
    }
}
