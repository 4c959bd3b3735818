//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] owns one [`AuthStore`] for the lifetime of the app and
//! mirrors the provider's auth events into a `Signal<SessionState>`.

use dioxus::prelude::*;
use domain::{
    AuthBackend, AuthEvent, AuthEvents, AuthSession, BackendError, SessionState, SessionStore,
};

use crate::records::flatten;

/// [`AuthBackend`] over the `api` server functions.
///
/// The provider tokens stay in the server's cookie session; this side only
/// learns who the user is and republishes the change as an [`AuthEvent`].
#[derive(Clone, Debug, Default)]
pub struct ServerAuth {
    events: AuthEvents,
}

impl AuthBackend for ServerAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let user = flatten(api::login(email.to_string(), password.to_string()).await)?;
        let session = AuthSession::for_user(user);
        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthSession>, BackendError> {
        let user = flatten(api::register(email.to_string(), password.to_string()).await)?;
        let session = user.map(AuthSession::for_user);
        if let Some(session) = &session {
            self.events.emit(AuthEvent::SignedIn(session.clone()));
        }
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let result = flatten(api::logout().await);
        // The server drops its cookie session either way.
        self.events.emit(AuthEvent::SignedOut);
        result
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, BackendError> {
        let user = api::get_current_user()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;
        let session = user.map(AuthSession::for_user);
        self.events.emit(AuthEvent::InitialSession(session.clone()));
        Ok(session)
    }

    fn events(&self) -> &AuthEvents {
        &self.events
    }
}

/// The browser's session store.
///
/// It checks addresses with the built-in [`domain::EmailRules`] so obvious
/// typos fail without a round trip. The server re-checks every address
/// against its configured rules, and a refusal there comes back as an
/// `InvalidEmail` backend error, so a stricter server denylist still wins.
pub type AuthStore = SessionStore<ServerAuth>;

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// The app-wide session store, for `login`, `register` and `logout`.
pub fn use_session_store() -> AuthStore {
    use_context::<AuthStore>()
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let store = use_context_provider(|| AuthStore::new(ServerAuth::default()));
    let mut state = use_context_provider(|| Signal::new(SessionState::default()));

    let listener = use_hook(move || {
        spawn(async move {
            // Subscribe before restoring so the initial session is not missed.
            let mut subscription = store.init();
            if let Err(e) = store.restore().await {
                tracing::warn!(error = %e, "could not restore session");
                state.set(SessionState {
                    user: None,
                    loading: false,
                });
            }
            while let Some(next) = subscription.next().await {
                state.set(next);
            }
        })
    });
    use_drop(move || listener.cancel());

    rsx! {
        {children}
    }
}
