//! Failures of the server plumbing itself (session store, settings).
//!
//! Backend answers are not errors at this level: they travel to the browser
//! as [`domain::BackendResult`] values so the UI can show the backend's own
//! message.

use dioxus::prelude::ServerFnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("could not reach the backend: {0}")]
    Unavailable(String),
}

impl From<ApiError> for ServerFnError {
    fn from(e: ApiError) -> Self {
        tracing::error!(error = %e, "server function failed");
        ServerFnError::new(e.to_string())
    }
}
