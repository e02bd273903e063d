//! Transport failures and the normalized error callers see.
//!
//! ERROR HANDLING
//! ==============
//! `TransportError` never leaves the service layer. Every service method maps
//! it into a [`ServiceError`] carrying either the server's own message or the
//! operation's fixed fallback, so a caller always has something to display.

use serde::Serialize;
use serde_json::Value;

/// Failures produced by a [`crate::transport::Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (connect failure, timeout,
    /// interrupted body).
    #[error("network request failed: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: Option<Value> },

    /// A success response in JSON mode whose body was not JSON.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request could not be assembled (client build, bad part type).
    #[error("request build failed: {0}")]
    Request(String),
}

impl TransportError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) | Self::Request(_) => None,
        }
    }

    /// The server-provided message, if the error body carries one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        let Self::Status { body: Some(body), .. } = self else {
            return None;
        };
        ["error", "message"]
            .into_iter()
            .filter_map(|key| body.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|msg| !msg.is_empty())
    }

    /// The body's `details` field when a message was found; otherwise the
    /// whole body, so an unrecognized error payload is never thrown away.
    fn server_details(&self) -> Option<Value> {
        let Self::Status { body: Some(body), .. } = self else {
            return None;
        };
        let details = if self.server_message().is_some() { body.get("details") } else { Some(body) };
        details.filter(|v| !v.is_null()).cloned()
    }
}

/// Uniform error shape returned by every service operation.
///
/// `error` is never empty: it holds the server's message when one was sent,
/// otherwise the operation's fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{error}")]
pub struct ServiceError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip)]
    pub status: Option<u16>,
}

/// Errors from the auth endpoints share the normalized shape.
pub type AuthError = ServiceError;

impl ServiceError {
    /// An error carrying only the given message.
    #[must_use]
    pub fn fallback(message: &str) -> Self {
        Self { error: message.to_owned(), details: None, status: None }
    }

    /// Normalize a transport failure, preferring the server's message.
    #[must_use]
    pub fn from_transport(err: &TransportError, fallback: &str) -> Self {
        match err.server_message() {
            Some(message) => Self {
                error: message.to_owned(),
                details: err.server_details(),
                status: err.status(),
            },
            None => {
                tracing::warn!(error = %err, fallback, "no server message; using fallback");
                Self { details: err.server_details(), status: err.status(), ..Self::fallback(fallback) }
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
