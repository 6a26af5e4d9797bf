//! Errors surfaced by API calls.
//!
//! Variants hold their sources behind `Arc` so a failed read can be shared
//! between every caller waiting on the same cached request.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Notification text used when the server sent no structured message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Network error, please try again.";

/// Structured error body returned by the portal API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Machine-readable code such as `invalid_request` or `forbidden`.
    pub code: String,
    /// Human-readable message, shown to users verbatim.
    pub message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[serde(default)]
    pub trace_id: Option<String>,
    /// Field-level details attached to validation failures.
    #[serde(default)]
    pub details: Option<Value>,
}

/// Failure of a single API call.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Structured body, when the response carried one.
        body: Option<ApiErrorBody>,
    },
    /// The request did not produce a response.
    #[error("transport failure: {0}")]
    Transport(#[source] Arc<reqwest::Error>),
    /// A response or payload did not match the expected JSON shape.
    #[error("unexpected JSON: {0}")]
    Decode(#[source] Arc<serde_json::Error>),
    /// The configured server address cannot anchor API paths.
    #[error("invalid base URL {0}")]
    BaseUrl(String),
}

impl ClientError {
    /// HTTP status for [`ClientError::Api`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::BaseUrl(_) => None,
        }
    }

    /// Structured error body, when the server sent one.
    #[must_use]
    pub const fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Api { body, .. } => body.as_ref(),
            Self::Transport(_) | Self::Decode(_) | Self::BaseUrl(_) => None,
        }
    }

    /// Message suitable for an error notification.
    ///
    /// The server's structured message wins; anything else falls back to
    /// [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> &str {
        self.body()
            .map(|body| body.message.as_str())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}
