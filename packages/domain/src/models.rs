//! # Domain models for client records and auth sessions
//!
//! These types are `Serialize + Deserialize` so they can cross the
//! server/client boundary via Dioxus server functions and map directly onto
//! the rows of the `clients` relation.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Client`] | A persisted row. The `id` is assigned by the backend and always present. |
//! | [`NewClient`] | The insert/update payload. It has no id, so client code can never fabricate one. |
//! | [`AuthUser`] | The client-safe identity of the signed-in user. |
//! | [`AuthSession`] | A user plus the backend tokens. Tokens are never serialized. |

use serde::{Deserialize, Serialize};

/// Server-assigned primary key of a client row.
pub type ClientId = i64;

/// A client contact as stored in the `clients` relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    /// Optional in the UI; stored as an empty string when left blank.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

impl Client {
    /// The editable fields of this row, e.g. to send back as an update patch.
    pub fn to_new(&self) -> NewClient {
        NewClient {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Fields of a client that the user controls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl NewClient {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Attach a backend-assigned id.
    pub fn with_id(self, id: ClientId) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Identity of the authenticated user, safe to send to the browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Tokens issued by the auth provider. Server side only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is stale.
    pub expires_at: Option<i64>,
}

impl SessionTokens {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A signed-in session as reported by an [`crate::AuthBackend`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    #[serde(skip)]
    pub tokens: Option<SessionTokens>,
}

impl AuthSession {
    /// A session that carries no tokens (the browser side of the wire).
    pub fn for_user(user: AuthUser) -> Self {
        Self { user, tokens: None }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
