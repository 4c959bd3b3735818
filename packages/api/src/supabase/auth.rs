//! GoTrue half of [`SupabaseClient`].
//!
//! Successful sign-in and sign-out are also published on the client's
//! [`AuthEvents`] channel, so server code can observe them the same way the
//! browser observes its own session.

use domain::{
    AuthBackend, AuthEvent, AuthEvents, AuthSession, AuthUser, BackendError, SessionTokens,
};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{send_empty, send_json, SupabaseClient};

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        Self {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|s| chrono::Utc::now().timestamp() + s));
        AuthSession {
            user: self.user.into(),
            tokens: Some(SessionTokens {
                access_token: self.access_token,
                refresh_token: self.refresh_token,
                expires_at,
            }),
        }
    }
}

/// Signup answers with a full session when email confirmation is off, and
/// with the bare (unconfirmed) user when it is on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    Pending(GoTrueUser),
}

impl SupabaseClient {
    async fn token(&self, grant_type: &str, body: serde_json::Value) -> Result<AuthSession, BackendError> {
        let request = self
            .request(Method::POST, "auth/v1/token")
            .query(&[("grant_type", grant_type)])
            .json(&body);
        let response: TokenResponse = send_json(request).await?;
        Ok(response.into_session())
    }

    /// Trade a refresh token for a fresh session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        self.token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    /// The user owning the attached access token.
    pub async fn get_user(&self) -> Result<AuthUser, BackendError> {
        let user: GoTrueUser = send_json(self.request(Method::GET, "auth/v1/user")).await?;
        Ok(user.into())
    }
}

impl AuthBackend for SupabaseClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let session = self
            .token("password", json!({ "email": email, "password": password }))
            .await?;
        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, BackendError> {
        let request = self
            .request(Method::POST, "auth/v1/signup")
            .json(&json!({ "email": email, "password": password }));
        let response: SignUpResponse = send_json(request).await?;
        match response {
            SignUpResponse::Session(response) => {
                let session = response.into_session();
                self.events.emit(AuthEvent::SignedIn(session.clone()));
                Ok(Some(session))
            }
            SignUpResponse::Pending(user) => {
                tracing::info!(user = %user.id, "signup awaiting email confirmation");
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.tokens.is_some() {
            send_empty(self.request(Method::POST, "auth/v1/logout")).await?;
        }
        self.events.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        let session = match &self.tokens {
            Some(tokens) => Some(AuthSession {
                user: self.get_user().await?,
                tokens: Some(tokens.clone()),
            }),
            None => None,
        };
        self.events.emit(AuthEvent::InitialSession(session.clone()));
        Ok(session)
    }

    fn events(&self) -> &AuthEvents {
        &self.events
    }
}
