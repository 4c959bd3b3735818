//! Closed error taxonomy shared by the gateway, the session store and the API.
//!
//! Backend failures are classified once, here, into a [`BackendErrorKind`] so
//! callers match on the kind instead of on message strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a call to the external backend.
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend error code for "relation does not exist".
pub const RELATION_NOT_FOUND: &str = "42P01";
/// PostgREST reports a missing table from its schema cache with this code.
pub const SCHEMA_CACHE_MISS: &str = "PGRST205";
/// Auth provider code for a signup address it refuses to use.
pub const EMAIL_ADDRESS_INVALID: &str = "email_address_invalid";
/// Auth provider codes for a wrong email/password pair.
const INVALID_CREDENTIALS: [&str; 2] = ["invalid_credentials", "invalid_grant"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendErrorKind {
    RelationNotFound,
    InvalidEmail,
    InvalidCredentials,
    /// The backend could not be reached or answered with something unreadable.
    Transport,
    Other,
}

impl BackendErrorKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(RELATION_NOT_FOUND) | Some(SCHEMA_CACHE_MISS) => Self::RelationNotFound,
            Some(EMAIL_ADDRESS_INVALID) => Self::InvalidEmail,
            Some(c) if INVALID_CREDENTIALS.contains(&c) => Self::InvalidCredentials,
            _ => Self::Other,
        }
    }
}

/// An error reported by (or while talking to) the external backend.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl BackendError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::from_code(code.as_deref()),
            code,
            message: message.into(),
        }
    }

    pub fn with_code(code: &str, message: impl Into<String>) -> Self {
        Self::new(Some(code.to_string()), message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Transport,
            code: None,
            message: message.into(),
        }
    }

    pub fn is_relation_not_found(&self) -> bool {
        self.kind == BackendErrorKind::RelationNotFound
    }
}

/// Local email check failure, raised before any network call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter an email address")]
    Empty,
    #[error("\"{0}\" is not a valid email address")]
    Malformed(String),
    #[error("Addresses at {0} are placeholders, please use a real email address")]
    PlaceholderDomain(String),
}

/// Failure of a session operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Failure of a record operation, split by whether it read or wrote.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0}")]
    Fetch(BackendError),
    #[error("{0}")]
    Mutation(BackendError),
}

impl GatewayError {
    pub fn backend(&self) -> &BackendError {
        match self {
            Self::Fetch(e) | Self::Mutation(e) => e,
        }
    }

    pub fn into_backend(self) -> BackendError {
        match self {
            Self::Fetch(e) | Self::Mutation(e) => e,
        }
    }
}
