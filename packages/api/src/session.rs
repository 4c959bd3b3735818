//! What the server keeps in the cookie session for a signed-in user.
//!
//! The provider's tokens never leave the server: the browser only ever sees
//! the [`AuthUser`] half.

use domain::{AuthBackend, AuthSession, AuthUser, BackendError, BackendErrorKind, SessionTokens};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::ApiError;
use crate::supabase::SupabaseClient;

/// Key for storing the signed-in user and tokens in the session.
pub const SESSION_AUTH_KEY: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: AuthUser,
    pub tokens: SessionTokens,
}

impl StoredSession {
    /// `None` when the provider returned a session without tokens.
    pub fn from_auth(session: &AuthSession) -> Option<Self> {
        Some(Self {
            user: session.user.clone(),
            tokens: session.tokens.clone()?,
        })
    }
}

/// What the provider made of a stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checked {
    /// Still good. `refreshed` carries the new tokens when the old access
    /// token had expired; the caller stores it.
    Valid {
        user: AuthUser,
        refreshed: Option<AuthSession>,
    },
    /// The provider refused the refresh token or the access token.
    Rejected(BackendError),
}

/// Re-check `stored` with the provider, refreshing an access token that has
/// expired by `now` (unix seconds).
///
/// Only a provider that could not be reached ends in `Err`; the session must
/// survive an outage.
pub async fn check(
    client: &SupabaseClient,
    mut stored: StoredSession,
    now: i64,
) -> Result<Checked, BackendError> {
    let mut refreshed = None;
    if stored.tokens.is_expired(now) {
        match client.refresh_session(&stored.tokens.refresh_token).await {
            Ok(session) => {
                if let Some(tokens) = &session.tokens {
                    stored.tokens = tokens.clone();
                }
                refreshed = Some(session);
            }
            Err(e) if e.kind == BackendErrorKind::Transport => return Err(e),
            Err(e) => return Ok(Checked::Rejected(e)),
        }
    }

    match client.clone().with_tokens(stored.tokens).current_session().await {
        Ok(Some(current)) => Ok(Checked::Valid {
            user: current.user,
            refreshed,
        }),
        Ok(None) => Ok(Checked::Rejected(BackendError::new(None, "no session"))),
        Err(e) if e.kind == BackendErrorKind::Transport => Err(e),
        Err(e) => Ok(Checked::Rejected(e)),
    }
}

pub async fn load(session: &Session) -> Result<Option<StoredSession>, ApiError> {
    Ok(session.get(SESSION_AUTH_KEY).await?)
}

pub async fn store(session: &Session, auth: &AuthSession) -> Result<(), ApiError> {
    let Some(stored) = StoredSession::from_auth(auth) else {
        tracing::warn!(user = %auth.user.id, "provider session carried no tokens, not storing");
        return Ok(());
    };
    // New identity, new session id.
    session.cycle_id().await?;
    session.insert(SESSION_AUTH_KEY, stored).await?;
    Ok(())
}

pub async fn clear(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}
