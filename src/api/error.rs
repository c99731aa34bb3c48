use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the archive API.
///
/// HTTP status codes are not interpreted: a non-2xx response only fails
/// if its body is not a valid page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No usable response (connection refused, DNS, timeout, reset).
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not the expected JSON shape.
    #[error("Malformed response from '{url}' (HTTP {status}): {source}")]
    Decode {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The configured endpoint does not parse as a URL.
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Coarse classification recorded in the messages state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The request never produced a response.
    Transport,
    /// A response arrived but could not be decoded.
    Malformed,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport { .. } | FetchError::InvalidUrl { .. } | FetchError::Client(_) => {
                FetchErrorKind::Transport
            }
            FetchError::Decode { .. } => FetchErrorKind::Malformed,
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Decode { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Transport => write!(f, "network error"),
            FetchErrorKind::Malformed => write!(f, "malformed response"),
        }
    }
}
