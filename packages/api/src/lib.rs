//! # API crate: fullstack server functions for Clientbook
//!
//! Every Dioxus server function the web frontend calls lives here, together
//! with the server-only plumbing they need.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`settings`] | `server` | Layered configuration (defaults, `clientbook.toml`, environment) |
//! | [`session`] | `server` | The signed-in user and provider tokens kept in the cookie session |
//! | [`supabase`] | `server` | HTTP implementation of the domain backend traits |
//! | [`error`] | `server` | Plumbing failures and their conversion to `ServerFnError` |
//!
//! ## Server functions exposed here
//!
//! Each function is compiled twice: with the full server logic behind
//! `#[cfg(feature = "server")]`, and as a client stub that forwards the call
//! over HTTP.
//!
//! - **Authentication**: `get_current_user`, `login`, `register`, `logout`
//! - **Client records**: `list_clients`, `create_client`, `update_client`,
//!   `delete_client`, `ensure_schema`
//!
//! Backend rejections (bad credentials, RLS denials, constraint violations)
//! are returned as the inner `Err` of a [`BackendResult`] so the browser can
//! show the backend's message. The outer `ServerFnError` is reserved for the
//! server failing to do its job at all.

use dioxus::prelude::*;

#[cfg(feature = "server")]
pub mod error;
#[cfg(feature = "server")]
pub mod session;
#[cfg(feature = "server")]
pub mod settings;
#[cfg(feature = "server")]
pub mod supabase;

pub use domain::{AuthUser, BackendResult, Client, ClientId, NewClient};

#[cfg(feature = "server")]
use domain::error::EMAIL_ADDRESS_INVALID;
#[cfg(feature = "server")]
use domain::{AuthBackend, BackendError, EmailRules, RecordGateway};

#[cfg(feature = "server")]
use crate::{error::ApiError, settings::settings, supabase::SupabaseClient};

/// A Supabase client acting for whoever owns `session`, anonymous if nobody.
#[cfg(feature = "server")]
async fn client_for(session: &tower_sessions::Session) -> Result<SupabaseClient, ApiError> {
    let client = SupabaseClient::shared().await?;
    Ok(match session::load(session).await? {
        Some(stored) => client.with_tokens(stored.tokens),
        None => client,
    })
}

#[cfg(feature = "server")]
async fn gateway_for(
    session: &tower_sessions::Session,
) -> Result<RecordGateway<SupabaseClient>, ApiError> {
    let config = settings().await?.gateway.clone();
    Ok(RecordGateway::with_config(client_for(session).await?, config))
}

/// Get the signed-in user, refreshing stale provider tokens on the way.
///
/// A session the provider no longer accepts is cleared and reported as
/// signed out. An unreachable provider is an error and keeps the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    let Some(stored) = session::load(&session).await? else {
        return Ok(None);
    };
    let user_id = stored.user.id.clone();
    let client = SupabaseClient::shared().await?;

    match session::check(&client, stored, chrono::Utc::now().timestamp()).await {
        Ok(session::Checked::Valid { user, refreshed }) => {
            if let Some(refreshed) = refreshed {
                session::store(&session, &refreshed).await?;
            }
            Ok(Some(user))
        }
        Ok(session::Checked::Rejected(e)) => {
            tracing::info!(user = %user_id, error = %e, "session rejected, clearing");
            session::clear(&session).await?;
            Ok(None)
        }
        Err(e) => Err(ApiError::Unavailable(e.message).into()),
    }
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<AuthUser>, ServerFnError> {
    Ok(None)
}

/// Re-check an address the browser already validated, against the server's
/// rules. A refusal travels like any other backend rejection.
#[cfg(feature = "server")]
fn vet_email(rules: &EmailRules, email: &str) -> BackendResult<String> {
    rules
        .check(email)
        .map(str::to_string)
        .map_err(|e| BackendError::with_code(EMAIL_ADDRESS_INVALID, e.to_string()))
}

/// Sign in with email and password.
#[cfg(feature = "server")]
#[post("/api/auth/login", session: tower_sessions::Session)]
pub async fn login(email: String, password: String) -> Result<BackendResult<AuthUser>, ServerFnError> {
    let rules = &settings().await.map_err(ApiError::from)?.email;
    let email = match vet_email(rules, &email) {
        Ok(email) => email,
        Err(e) => return Ok(Err(e)),
    };

    let client = SupabaseClient::shared().await?;
    match client.sign_in_with_password(&email, &password).await {
        Ok(signed_in) => {
            session::store(&session, &signed_in).await?;
            tracing::info!(user = %signed_in.user.id, "user signed in");
            Ok(Ok(signed_in.user))
        }
        Err(e) => Ok(Err(e)),
    }
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/login")]
pub async fn login(email: String, password: String) -> Result<BackendResult<AuthUser>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Create an account. Returns the user when the provider signs them in right
/// away, `None` when it waits for email confirmation.
#[cfg(feature = "server")]
#[post("/api/auth/register", session: tower_sessions::Session)]
pub async fn register(
    email: String,
    password: String,
) -> Result<BackendResult<Option<AuthUser>>, ServerFnError> {
    let rules = &settings().await.map_err(ApiError::from)?.email;
    let email = match vet_email(rules, &email) {
        Ok(email) => email,
        Err(e) => return Ok(Err(e)),
    };

    let client = SupabaseClient::shared().await?;
    match client.sign_up(&email, &password).await {
        Ok(Some(signed_in)) => {
            session::store(&session, &signed_in).await?;
            Ok(Ok(Some(signed_in.user)))
        }
        Ok(None) => Ok(Ok(None)),
        Err(e) => Ok(Err(e)),
    }
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/register")]
pub async fn register(
    email: String,
    password: String,
) -> Result<BackendResult<Option<AuthUser>>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Revoke the provider session and clear the cookie session.
///
/// The cookie session is cleared even when the provider call fails.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<BackendResult<()>, ServerFnError> {
    let result = client_for(&session).await?.sign_out().await;
    session::clear(&session).await?;
    Ok(result)
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<BackendResult<()>, ServerFnError> {
    Ok(Ok(()))
}

/// All client rows visible to the caller, ordered by id.
#[cfg(feature = "server")]
#[get("/api/clients", session: tower_sessions::Session)]
pub async fn list_clients() -> Result<BackendResult<Vec<Client>>, ServerFnError> {
    let gateway = gateway_for(&session).await?;
    Ok(gateway.list().await.map_err(|e| e.into_backend()))
}

#[cfg(not(feature = "server"))]
#[get("/api/clients")]
pub async fn list_clients() -> Result<BackendResult<Vec<Client>>, ServerFnError> {
    Ok(Ok(Vec::new()))
}

#[cfg(feature = "server")]
#[post("/api/clients", session: tower_sessions::Session)]
pub async fn create_client(draft: NewClient) -> Result<BackendResult<Client>, ServerFnError> {
    let gateway = gateway_for(&session).await?;
    Ok(gateway.create(draft).await.map_err(|e| e.into_backend()))
}

#[cfg(not(feature = "server"))]
#[post("/api/clients")]
pub async fn create_client(draft: NewClient) -> Result<BackendResult<Client>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/clients/update", session: tower_sessions::Session)]
pub async fn update_client(id: ClientId, patch: NewClient) -> Result<BackendResult<()>, ServerFnError> {
    let gateway = gateway_for(&session).await?;
    Ok(gateway.update(id, patch).await.map_err(|e| e.into_backend()))
}

#[cfg(not(feature = "server"))]
#[post("/api/clients/update")]
pub async fn update_client(id: ClientId, patch: NewClient) -> Result<BackendResult<()>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

#[cfg(feature = "server")]
#[post("/api/clients/delete", session: tower_sessions::Session)]
pub async fn delete_client(id: ClientId) -> Result<BackendResult<()>, ServerFnError> {
    let gateway = gateway_for(&session).await?;
    Ok(gateway.delete(id).await.map_err(|e| e.into_backend()))
}

#[cfg(not(feature = "server"))]
#[post("/api/clients/delete")]
pub async fn delete_client(id: ClientId) -> Result<BackendResult<()>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Create the clients relation if it is missing. Returns whether the
/// bootstrap procedure ran; failures are logged, never returned.
#[cfg(feature = "server")]
#[post("/api/clients/ensure-schema", session: tower_sessions::Session)]
pub async fn ensure_schema() -> Result<bool, ServerFnError> {
    let gateway = gateway_for(&session).await?;
    Ok(gateway.ensure_schema().await)
}

#[cfg(not(feature = "server"))]
#[post("/api/clients/ensure-schema")]
pub async fn ensure_schema() -> Result<bool, ServerFnError> {
    Ok(false)
}
