//! Client error taxonomy
//!
//! Every failure propagates unchanged to the caller: no retries, no
//! backoff, no suppression. The UI layer decides what to do with it.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Authenticated operation attempted without an active session.
    /// Raised before any network call is made.
    #[error("Authentication required")]
    NotAuthenticated,

    /// Network-level failure: no response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("Store returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Unreadable response body. Defensive only: the value codec
    /// degrades instead of raising, so this surfaces when the body is
    /// not JSON at all.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Upstream error from a status code and extracted message.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        StoreError::Upstream {
            status,
            message: message.into(),
        }
    }

    /// True when the store reported the document missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Upstream { status: 404, .. })
    }

    /// Whether the failure is attributable to the caller.
    pub fn is_client_error(&self) -> bool {
        match self {
            StoreError::NotAuthenticated => true,
            StoreError::Upstream { status, .. } => *status < 500,
            StoreError::Transport(_) | StoreError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}
