//! Record operations from the browser, proxied through server functions.

use dioxus::prelude::ServerFnError;
use domain::{BackendError, BackendResult, Client, ClientId, ClientRecords, GatewayError, NewClient};

/// Collapse a server-function answer: a failed call becomes a
/// [`domain::BackendErrorKind::Transport`] error.
pub(crate) fn flatten<T>(answer: Result<BackendResult<T>, ServerFnError>) -> BackendResult<T> {
    answer.unwrap_or_else(|e| Err(BackendError::transport(e.to_string())))
}

/// [`ClientRecords`] over the `api` server functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerRecords;

impl ClientRecords for ServerRecords {
    async fn list(&self) -> Result<Vec<Client>, GatewayError> {
        flatten(api::list_clients().await).map_err(GatewayError::Fetch)
    }

    async fn create(&self, draft: NewClient) -> Result<Client, GatewayError> {
        flatten(api::create_client(draft).await).map_err(GatewayError::Mutation)
    }

    async fn update(&self, id: ClientId, patch: NewClient) -> Result<(), GatewayError> {
        flatten(api::update_client(id, patch).await).map_err(GatewayError::Mutation)
    }

    async fn delete(&self, id: ClientId) -> Result<(), GatewayError> {
        flatten(api::delete_client(id).await).map_err(GatewayError::Mutation)
    }

    async fn ensure_schema(&self) {
        match api::ensure_schema().await {
            Ok(true) => tracing::info!("clients table created"),
            Ok(false) => {}
            Err(e) => tracing::error!(error = %e, "schema check failed"),
        }
    }
}
