//! Error types for client operations.
//!
//! Every failure surfaces to the immediate caller; nothing is retried,
//! swallowed, or logged away inside the crate.

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote fetch failed: network error or non-success status.
    #[error("transport error for `{endpoint}`: {message}")]
    Transport {
        endpoint: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The response body or headers disagree with the expected shape.
    #[error("malformed response for `{endpoint}`: {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// Out-of-range access on a lazy sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// An operation requires data that has not been loaded.
    #[error("precondition failed: {message}")]
    Precondition { message: String },
}

impl Error {
    /// Create a transport error without an underlying cause.
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping a reqwest failure.
    pub fn transport_source(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Check whether this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check whether this is a malformed-response failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// Check whether this is a precondition failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition { .. })
    }
}
