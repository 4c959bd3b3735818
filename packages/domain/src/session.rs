//! # Session Store: explicit, injectable auth state
//!
//! [`SessionStore`] wraps an [`AuthBackend`] and exposes the three user
//! actions (`login`, `register`, `logout`). Each action validates locally
//! first, then calls the provider, and describes what the UI should do next
//! as an [`AuthOutcome`]: a notice to show and an optional redirect.
//!
//! The observed `{user, loading}` pair lives in [`SessionState`] and follows a
//! typed lifecycle:
//!
//! 1. [`SessionStore::init`] subscribes to the provider's auth-state stream
//!    and returns a [`SessionSubscription`].
//! 2. [`SessionSubscription::next`] waits for the next emitted event and
//!    applies it with [`SessionState::update`], which replaces the user and
//!    clears `loading`.
//! 3. [`SessionSubscription::dispose`] (or dropping it) unsubscribes.

use tokio::sync::watch;

use crate::backend::{AuthBackend, AuthEvent};
use crate::error::{AuthError, BackendError, BackendErrorKind};
use crate::models::{AuthSession, AuthUser};
use crate::notice::Notice;
use crate::validation::EmailRules;

/// Client-side mirror of the provider's auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn update(&mut self, event: &AuthEvent) {
        self.user = event.session().map(|s| s.user.clone());
        self.loading = false;
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Where the UI should go after an auth action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Landing,
    Catalog,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Catalog => "/welcome",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOutcome {
    pub notice: Option<Notice>,
    pub redirect: Option<Destination>,
}

impl AuthOutcome {
    fn failed(title: &str, error: &AuthError) -> Self {
        Self {
            notice: Some(Notice::destructive(title).description(error.to_string())),
            redirect: None,
        }
    }
}

/// Auth actions over a provider, with local email validation in front.
#[derive(Clone, Debug)]
pub struct SessionStore<A: AuthBackend> {
    backend: A,
    rules: EmailRules,
}

impl<A: AuthBackend> SessionStore<A> {
    pub fn new(backend: A) -> Self {
        Self::with_rules(backend, EmailRules::default())
    }

    pub fn with_rules(backend: A, rules: EmailRules) -> Self {
        Self { backend, rules }
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    /// Subscribe to auth-state changes.
    pub fn init(&self) -> SessionSubscription {
        SessionSubscription {
            rx: Some(self.backend.events().subscribe()),
            state: SessionState::default(),
        }
    }

    /// Ask the provider for the current session; it is delivered to
    /// subscribers as an [`AuthEvent::InitialSession`].
    pub async fn restore(&self) -> Result<Option<AuthSession>, BackendError> {
        self.backend.current_session().await
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        match self.try_login(email, password).await {
            Ok(session) => {
                tracing::info!(user = %session.user.id, "signed in");
                AuthOutcome {
                    notice: Some(
                        Notice::plain("Signed in")
                            .description("Taking you to your client catalog."),
                    ),
                    redirect: Some(Destination::Catalog),
                }
            }
            Err(e) => AuthOutcome::failed("Could not sign in", &e),
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = self.rules.check(email)?;
        Ok(self.backend.sign_in_with_password(email, password).await?)
    }

    pub async fn register(&self, email: &str, password: &str) -> AuthOutcome {
        match self.try_register(email, password).await {
            Ok(_) => AuthOutcome {
                notice: Some(
                    Notice::plain("Account created")
                        .description("Check your email to confirm your registration."),
                ),
                redirect: None,
            },
            Err(AuthError::Backend(e)) => AuthOutcome::failed(
                "Could not create account",
                &AuthError::Backend(friendly_signup_error(e)),
            ),
            Err(e) => AuthOutcome::failed("Could not create account", &e),
        }
    }

    async fn try_register(&self, email: &str, password: &str) -> Result<Option<AuthSession>, AuthError> {
        let email = self.rules.check(email)?;
        Ok(self.backend.sign_up(email, password).await?)
    }

    /// Sign out, then always send the user to the landing page.
    ///
    /// The redirect does not depend on the provider acknowledging the
    /// sign-out; a failure is only logged.
    pub async fn logout(&self) -> AuthOutcome {
        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!(error = %e, "sign-out failed, leaving anyway");
        }
        AuthOutcome {
            notice: None,
            redirect: Some(Destination::Landing),
        }
    }
}

fn friendly_signup_error(error: BackendError) -> BackendError {
    match error.kind {
        BackendErrorKind::InvalidEmail => BackendError {
            message: "This email address can't be used. Please enter a real address you can access."
                .to_string(),
            ..error
        },
        _ => error,
    }
}

/// A live subscription to auth-state changes.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: Option<watch::Receiver<Option<AuthEvent>>>,
    state: SessionState,
}

impl SessionSubscription {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Wait for the next auth event and return the updated state.
    ///
    /// Returns `None` once disposed or when the provider is gone.
    pub async fn next(&mut self) -> Option<SessionState> {
        let rx = self.rx.as_mut()?;
        if rx.changed().await.is_err() {
            self.rx = None;
            return None;
        }
        let event = rx.borrow_and_update().clone();
        if let Some(event) = event {
            self.state.update(&event);
        }
        Some(self.state.clone())
    }

    /// Stop listening. Further calls to [`next`](Self::next) return `None`.
    pub fn dispose(&mut self) {
        self.rx = None;
    }

    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }
}
