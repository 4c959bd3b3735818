use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::backend::{AuthBackend, AuthEvent, AuthEvents, Select, TableBackend};
use crate::error::{BackendError, RELATION_NOT_FOUND};
use crate::models::{AuthSession, AuthUser, Client, ClientId, NewClient, SessionTokens};

/// Backend call kinds, for failure injection and call counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Rpc,
    SignIn,
    SignUp,
    SignOut,
    CurrentSession,
}

#[derive(Debug)]
struct Account {
    password: String,
    user: AuthUser,
}

#[derive(Debug, Default)]
struct State {
    schema_ready: bool,
    auto_confirm: bool,
    tables: HashMap<String, Vec<Client>>,
    next_ids: HashMap<String, ClientId>,
    accounts: HashMap<String, Account>,
    current: Option<AuthSession>,
    failures: HashMap<Operation, BackendError>,
    calls: HashMap<Operation, usize>,
    rpc_calls: Vec<String>,
}

/// In-memory auth provider and table backend for tests.
///
/// Clones share state, so a test can keep a handle for inspection while the
/// gateway or session store owns another.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    events: AuthEvents,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                schema_ready: true,
                ..State::default()
            })),
            events: AuthEvents::new(),
        }
    }

    /// A backend whose tables do not exist until a bootstrap procedure runs.
    pub fn without_schema() -> Self {
        let backend = Self::new();
        backend.lock().schema_ready = false;
        backend
    }

    /// Sign users in immediately on sign-up instead of waiting for email confirmation.
    pub fn auto_confirm(self) -> Self {
        self.lock().auto_confirm = true;
        self
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: Operation, error: BackendError) {
        self.lock().failures.insert(op, error);
    }

    /// Number of calls of `op` received so far, including failed ones.
    pub fn calls(&self, op: Operation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn rpc_calls(&self) -> Vec<String> {
        self.lock().rpc_calls.clone()
    }

    pub fn rows(&self, relation: &str) -> Vec<Client> {
        self.lock().tables.get(relation).cloned().unwrap_or_default()
    }

    pub fn add_account(&self, email: &str, password: &str) -> AuthUser {
        let mut state = self.lock();
        let user = AuthUser {
            id: format!("user-{}", state.accounts.len() + 1),
            email: email.to_string(),
        };
        state.accounts.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call, then return the injected failure if any.
    fn enter(&self, op: Operation) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;
        match state.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    fn enter_table(&self, op: Operation, relation: &str) -> Result<MutexGuard<'_, State>, BackendError> {
        let state = self.enter(op)?;
        if !state.schema_ready {
            return Err(BackendError::with_code(
                RELATION_NOT_FOUND,
                format!("relation \"public.{relation}\" does not exist"),
            ));
        }
        Ok(state)
    }
}

fn session_for(user: AuthUser) -> AuthSession {
    AuthSession {
        tokens: Some(SessionTokens {
            access_token: format!("access-{}", user.id),
            refresh_token: format!("refresh-{}", user.id),
            expires_at: None,
        }),
        user,
    }
}

impl TableBackend for MemoryBackend {
    async fn select(&self, relation: &str, query: Select) -> Result<Vec<Client>, BackendError> {
        let state = self.enter_table(Operation::Select, relation)?;
        let mut rows = state.tables.get(relation).cloned().unwrap_or_default();
        if let Some(order) = query.order {
            rows.sort_by_key(|c| c.id);
            if !order.ascending {
                rows.reverse();
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, relation: &str, row: NewClient) -> Result<Client, BackendError> {
        let mut state = self.enter_table(Operation::Insert, relation)?;
        let next = state.next_ids.entry(relation.to_string()).or_insert(0);
        *next += 1;
        let client = row.with_id(*next);
        state
            .tables
            .entry(relation.to_string())
            .or_default()
            .push(client.clone());
        Ok(client)
    }

    async fn update(&self, relation: &str, id: ClientId, patch: NewClient) -> Result<(), BackendError> {
        let mut state = self.enter_table(Operation::Update, relation)?;
        if let Some(row) = state
            .tables
            .get_mut(relation)
            .and_then(|rows| rows.iter_mut().find(|c| c.id == id))
        {
            *row = patch.with_id(id);
        }
        Ok(())
    }

    async fn delete(&self, relation: &str, id: ClientId) -> Result<(), BackendError> {
        let mut state = self.enter_table(Operation::Delete, relation)?;
        if let Some(rows) = state.tables.get_mut(relation) {
            rows.retain(|c| c.id != id);
        }
        Ok(())
    }

    async fn rpc(&self, procedure: &str) -> Result<(), BackendError> {
        let mut state = self.enter(Operation::Rpc)?;
        state.rpc_calls.push(procedure.to_string());
        state.schema_ready = true;
        Ok(())
    }
}

impl AuthBackend for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let session = {
            let mut state = self.enter(Operation::SignIn)?;
            let user = match state.accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => account.user.clone(),
                _ => {
                    return Err(BackendError::with_code(
                        "invalid_credentials",
                        "Invalid login credentials",
                    ))
                }
            };
            let session = session_for(user);
            state.current = Some(session.clone());
            session
        };
        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, BackendError> {
        let auto_confirm = {
            let state = self.enter(Operation::SignUp)?;
            if state.accounts.contains_key(&email.to_lowercase()) {
                return Err(BackendError::with_code(
                    "user_already_exists",
                    "User already registered",
                ));
            }
            state.auto_confirm
        };
        let user = self.add_account(email, password);
        if !auto_confirm {
            return Ok(None);
        }
        let session = session_for(user);
        self.lock().current = Some(session.clone());
        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.enter(Operation::SignOut)?.current = None;
        self.events.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        let current = self.enter(Operation::CurrentSession)?.current.clone();
        self.events.emit(AuthEvent::InitialSession(current.clone()));
        Ok(current)
    }

    fn events(&self) -> &AuthEvents {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Order;

    #[tokio::test]
    async fn test_insert_select_roundtrip() {
        let backend = MemoryBackend::new();

        assert!(backend.select("clients", Select::all()).await.unwrap().is_empty());

        let ana = backend
            .insert("clients", NewClient::new("Ana", "a@x.com", "555"))
            .await
            .unwrap();
        assert_eq!(ana.id, 1);

        let rows = backend
            .select("clients", Select::all().order(Order::asc("id")))
            .await
            .unwrap();
        assert_eq!(rows, vec![ana]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let backend = MemoryBackend::new();

        let first = backend.insert("clients", NewClient::default()).await.unwrap();
        backend.delete("clients", first.id).await.unwrap();
        let second = backend.insert("clients", NewClient::default()).await.unwrap();

        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_limit() {
        let backend = MemoryBackend::new();
        for _ in 0..3 {
            backend.insert("clients", NewClient::default()).await.unwrap();
        }

        let rows = backend.select("clients", Select::all().limit(1)).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_schema_until_rpc() {
        let backend = MemoryBackend::without_schema();

        let err = backend.select("clients", Select::all()).await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("42P01"));

        backend.rpc("create_clients_table").await.unwrap();
        assert!(backend.select("clients", Select::all()).await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let backend = MemoryBackend::new();
        backend.fail_next(Operation::Select, BackendError::transport("boom"));

        assert!(backend.select("clients", Select::all()).await.is_err());
        assert!(backend.select("clients", Select::all()).await.is_ok());
        assert_eq!(backend.calls(Operation::Select), 2);
    }

    #[tokio::test]
    async fn test_sign_in_emits_event() {
        let backend = MemoryBackend::new();
        backend.add_account("ana@clients.io", "secret");
        let mut rx = backend.events().subscribe();

        let session = backend
            .sign_in_with_password("ana@clients.io", "secret")
            .await
            .unwrap();
        assert!(session.tokens.is_some());

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(AuthEvent::SignedIn(session)));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let backend = MemoryBackend::new();
        backend.add_account("ana@clients.io", "secret");

        let err = backend
            .sign_in_with_password("ana@clients.io", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some("invalid_credentials"));
    }

    #[tokio::test]
    async fn test_sign_up_waits_for_confirmation_by_default() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.sign_up("bob@clients.io", "secret").await.unwrap(), None);

        let confirmed = MemoryBackend::new().auto_confirm();
        assert!(confirmed.sign_up("bob@clients.io", "secret").await.unwrap().is_some());
    }
}
