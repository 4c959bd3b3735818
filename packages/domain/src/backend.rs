//! # Backend seams
//!
//! The external backend-as-a-service is reached through two async traits,
//! mirroring the two halves of the hosted service:
//!
//! - [`TableBackend`]: select/insert/update/delete/rpc against a relation.
//! - [`AuthBackend`]: password sign-in, sign-up, sign-out, the current
//!   session, and a stream of auth-state changes ([`AuthEvents`]).
//!
//! [`ClientRecords`] sits one level higher: the record operations the catalog
//! needs. [`crate::RecordGateway`] implements it on top of a `TableBackend`;
//! the browser implements it by calling server functions.
//!
//! Implementations live in the `api` crate (Supabase over HTTP) and the `ui`
//! crate (server-function proxies); this crate's tests run against an
//! in-memory backend.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{BackendError, GatewayError};
use crate::models::{AuthSession, Client, ClientId, NewClient};

/// Sort direction for a select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }
}

/// Shape of a select request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Select {
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query/command interface to the external relational table.
pub trait TableBackend {
    fn select(
        &self,
        relation: &str,
        query: Select,
    ) -> impl Future<Output = Result<Vec<Client>, BackendError>>;
    fn insert(
        &self,
        relation: &str,
        row: NewClient,
    ) -> impl Future<Output = Result<Client, BackendError>>;
    fn update(
        &self,
        relation: &str,
        id: ClientId,
        patch: NewClient,
    ) -> impl Future<Output = Result<(), BackendError>>;
    fn delete(
        &self,
        relation: &str,
        id: ClientId,
    ) -> impl Future<Output = Result<(), BackendError>>;
    fn rpc(&self, procedure: &str) -> impl Future<Output = Result<(), BackendError>>;
}

/// A change in authentication state, as emitted by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session found when the listener first asked.
    InitialSession(Option<AuthSession>),
    SignedIn(AuthSession),
    SignedOut,
}

impl AuthEvent {
    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            Self::InitialSession(session) => session.as_ref(),
            Self::SignedIn(session) => Some(session),
            Self::SignedOut => None,
        }
    }
}

/// Broadcast channel for [`AuthEvent`]s. Cloning shares the channel.
///
/// Only the latest event is retained; a slow listener sees the newest state,
/// never a backlog.
#[derive(Clone, Debug)]
pub struct AuthEvents {
    tx: Arc<watch::Sender<Option<AuthEvent>>>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to every current subscriber.
    pub fn emit(&self, event: AuthEvent) {
        self.tx.send_replace(Some(event));
    }

    /// A receiver that wakes on every event emitted after this call.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthEvent>> {
        self.tx.subscribe()
    }
}

/// Hosted authentication provider.
pub trait AuthBackend {
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, BackendError>>;
    /// Returns the new session when the provider signs the user in right away,
    /// `None` when it waits for email confirmation.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Option<AuthSession>, BackendError>>;
    fn sign_out(&self) -> impl Future<Output = Result<(), BackendError>>;
    /// Looks up the current session and emits it as [`AuthEvent::InitialSession`].
    fn current_session(&self) -> impl Future<Output = Result<Option<AuthSession>, BackendError>>;
    fn events(&self) -> &AuthEvents;
}

/// Record operations consumed by the catalog.
pub trait ClientRecords {
    fn list(&self) -> impl Future<Output = Result<Vec<Client>, GatewayError>>;
    fn create(&self, draft: NewClient) -> impl Future<Output = Result<Client, GatewayError>>;
    fn update(
        &self,
        id: ClientId,
        patch: NewClient,
    ) -> impl Future<Output = Result<(), GatewayError>>;
    fn delete(&self, id: ClientId) -> impl Future<Output = Result<(), GatewayError>>;
    /// Best effort: never fails, problems are logged.
    fn ensure_schema(&self) -> impl Future<Output = ()>;
}
