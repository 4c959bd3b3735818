//! # Record Gateway: façade over the `clients` relation
//!
//! [`RecordGateway`] turns record-level intents into [`TableBackend`] calls and
//! classifies every failure into [`GatewayError::Fetch`] (reads) or
//! [`GatewayError::Mutation`] (writes). Nothing is retried.
//!
//! | Method | Backend call |
//! |--------|--------------|
//! | [`list`](RecordGateway::list) | `select *` ordered by `id` ascending |
//! | [`create`](RecordGateway::create) | `insert` returning the new row |
//! | [`update`](RecordGateway::update) | `update ... where id = ?` |
//! | [`delete`](RecordGateway::delete) | `delete ... where id = ?` |
//! | [`ensure_schema`](RecordGateway::ensure_schema) | one-row probe, then the bootstrap procedure if the relation is missing |

use crate::backend::{ClientRecords, Order, Select, TableBackend};
use crate::config::GatewayConfig;
use crate::error::{BackendError, GatewayError};
use crate::models::{Client, ClientId, NewClient};

/// Record operations against a [`TableBackend`].
pub struct RecordGateway<B: TableBackend> {
    backend: B,
    config: GatewayConfig,
}

impl<B: TableBackend> RecordGateway<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, GatewayConfig::default())
    }

    pub fn with_config(backend: B, config: GatewayConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All rows, ordered by id ascending.
    pub async fn list(&self) -> Result<Vec<Client>, GatewayError> {
        tracing::debug!(table = %self.config.table, "listing clients");
        self.backend
            .select(&self.config.table, Select::all().order(Order::asc("id")))
            .await
            .map_err(GatewayError::Fetch)
    }

    pub async fn create(&self, draft: NewClient) -> Result<Client, GatewayError> {
        tracing::debug!(table = %self.config.table, "inserting client");
        self.backend
            .insert(&self.config.table, draft)
            .await
            .map_err(GatewayError::Mutation)
    }

    pub async fn update(&self, id: ClientId, patch: NewClient) -> Result<(), GatewayError> {
        tracing::debug!(table = %self.config.table, id, "updating client");
        self.backend
            .update(&self.config.table, id, patch)
            .await
            .map_err(GatewayError::Mutation)
    }

    pub async fn delete(&self, id: ClientId) -> Result<(), GatewayError> {
        tracing::debug!(table = %self.config.table, id, "deleting client");
        self.backend
            .delete(&self.config.table, id)
            .await
            .map_err(GatewayError::Mutation)
    }

    /// Create the relation if the backend says it does not exist.
    ///
    /// Returns `true` when the bootstrap procedure ran successfully. Failures
    /// are logged and otherwise swallowed.
    pub async fn ensure_schema(&self) -> bool {
        let probe = self
            .backend
            .select(&self.config.table, Select::all().limit(1))
            .await;

        match probe {
            Err(e) if e.is_relation_not_found() => self.bootstrap().await,
            Err(e) => {
                tracing::warn!(table = %self.config.table, error = %e, "schema probe failed");
                false
            }
            Ok(_) => false,
        }
    }

    async fn bootstrap(&self) -> bool {
        tracing::info!(
            table = %self.config.table,
            procedure = %self.config.bootstrap_procedure,
            "relation missing, running bootstrap procedure"
        );
        match self.backend.rpc(&self.config.bootstrap_procedure).await {
            Ok(()) => true,
            Err(e) => {
                log_bootstrap_failure(&self.config.table, &e);
                false
            }
        }
    }
}

fn log_bootstrap_failure(table: &str, error: &BackendError) {
    tracing::error!(table, code = ?error.code, error = %error, "failed to create clients table");
}

impl<B: TableBackend> ClientRecords for RecordGateway<B> {
    async fn list(&self) -> Result<Vec<Client>, GatewayError> {
        RecordGateway::list(self).await
    }

    async fn create(&self, draft: NewClient) -> Result<Client, GatewayError> {
        RecordGateway::create(self, draft).await
    }

    async fn update(&self, id: ClientId, patch: NewClient) -> Result<(), GatewayError> {
        RecordGateway::update(self, id, patch).await
    }

    async fn delete(&self, id: ClientId) -> Result<(), GatewayError> {
        RecordGateway::delete(self, id).await
    }

    async fn ensure_schema(&self) {
        RecordGateway::ensure_schema(self).await;
    }
}
