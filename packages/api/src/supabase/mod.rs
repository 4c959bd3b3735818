//! # Supabase over HTTP
//!
//! [`SupabaseClient`] implements both domain backend traits against a hosted
//! Supabase project:
//!
//! - [`domain::TableBackend`] via PostgREST (`/rest/v1/...`), see [`rest`].
//! - [`domain::AuthBackend`] via GoTrue (`/auth/v1/...`), see [`auth`].
//!
//! Every request carries the project's anon key as `apikey`. The
//! `Authorization` bearer is the user's access token when one is attached
//! with [`SupabaseClient::with_tokens`], the anon key otherwise, so row level
//! security decides what an anonymous caller may see.

mod auth;
mod error;
mod rest;

pub use error::decode_error;

use domain::{AuthEvents, BackendError, SessionTokens};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::error::ApiError;
use crate::settings::{settings, Supabase};

static HTTP: OnceCell<reqwest::Client> = OnceCell::const_new();

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    project: Supabase,
    tokens: Option<SessionTokens>,
    events: AuthEvents,
}

impl SupabaseClient {
    pub fn new(http: reqwest::Client, project: Supabase) -> Self {
        Self {
            http,
            project,
            tokens: None,
            events: AuthEvents::new(),
        }
    }

    /// A client for the configured project sharing one connection pool.
    pub async fn shared() -> Result<Self, ApiError> {
        let settings = settings().await?;
        let http = HTTP
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .user_agent(concat!("clientbook/", env!("CARGO_PKG_VERSION")))
                    .build()
            })
            .await
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        Ok(Self::new(http.clone(), settings.supabase.clone()))
    }

    /// Act on behalf of the user owning `tokens`.
    pub fn with_tokens(mut self, tokens: SessionTokens) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn tokens(&self) -> Option<&SessionTokens> {
        self.tokens.as_ref()
    }

    fn bearer(&self) -> &str {
        self.tokens
            .as_ref()
            .map(|t| t.access_token.as_str())
            .unwrap_or(&self.project.anon_key)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.project.endpoint(path))
            .header("apikey", &self.project.anon_key)
            .bearer_auth(self.bearer())
    }
}

/// Send `request` and decode a JSON body, mapping non-2xx answers through
/// [`decode_error`].
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    let response = checked(request).await?;
    response
        .json()
        .await
        .map_err(|e| BackendError::transport(format!("unreadable response: {e}")))
}

/// Send `request` and ignore the body of a successful answer.
async fn send_empty(request: RequestBuilder) -> Result<(), BackendError> {
    checked(request).await.map(drop)
}

async fn checked(request: RequestBuilder) -> Result<Response, BackendError> {
    let response = request
        .send()
        .await
        .map_err(|e| BackendError::transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = decode_error(status.as_u16(), &body);
    tracing::debug!(status = status.as_u16(), code = ?error.code, "backend rejected request");
    Err(error)
}
