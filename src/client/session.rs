//! Session and access-mode context
//!
//! Caller identity is explicit: every authenticated operation receives
//! an [`AuthContext`] instead of reading ambient global state, which
//! keeps the client testable without a real identity provider.

use super::errors::{StoreError, StoreResult};

/// An authenticated identity: the bearer credential plus the profile
/// fields the identity provider exposes.
#[derive(Debug, Clone)]
pub struct Session {
    /// Stable user id from the identity provider.
    pub user_id: String,

    /// Email, when the provider supplied one.
    pub email: Option<String>,

    id_token: String,
}

impl Session {
    /// Create a session from a user id and bearer credential.
    pub fn new(user_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            id_token: id_token.into(),
        }
    }

    /// Attach the provider-supplied email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The bearer credential sent on authenticated calls.
    pub fn bearer_token(&self) -> &str {
        &self.id_token
    }
}

/// Read strategy selected by session presence.
///
/// Server-side filtering needs an identity token; without one the
/// client fetches the collection (bounded by the configured scan cap)
/// and filters locally with identical predicate semantics. The scan is
/// a deliberate trade-off, not a bug to fix by always fetching
/// everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Filters evaluated by the store via the structured-query endpoint.
    ServerFilteredQuery,

    /// Full collection fetch, filtered client-side.
    ClientFilteredScan,
}

/// Caller identity context passed into every operation.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Option<Session>,
}

impl AuthContext {
    /// Context carrying an active session.
    pub fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Context with no identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Fatal precondition gate for authenticated operations.
    pub fn require_session(&self) -> StoreResult<&Session> {
        self.session.as_ref().ok_or(StoreError::NotAuthenticated)
    }

    /// How reads are filtered under this context.
    pub fn read_strategy(&self) -> ReadStrategy {
        if self.session.is_some() {
            ReadStrategy::ServerFilteredQuery
        } else {
            ReadStrategy::ClientFilteredScan
        }
    }
}
