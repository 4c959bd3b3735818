//! # Catalog: snapshot, search term and mutation orchestration
//!
//! The catalog page holds the full record collection as of the last
//! successful fetch ([`CatalogState`]) and derives the visible rows from it
//! with [`crate::search::filter_clients`].
//!
//! Every mutation follows one pattern: call the backend, wait for the answer,
//! produce a notice, and on success invalidate [`CLIENTS_LIST`] so the whole
//! collection is reloaded. There is no optimistic update and no local merge.

use crate::backend::ClientRecords;
use crate::error::GatewayError;
use crate::models::{Client, ClientId, NewClient};
use crate::notice::Notice;
use crate::search::filter_clients;

/// Cache key of the record collection.
pub const CLIENTS_LIST: &str = "clients-list";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    snapshot: Vec<Client>,
    search: String,
    phase: Phase,
}

impl CatalogState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> &[Client] {
        &self.snapshot
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: String) {
        self.search = term;
    }

    pub fn begin_load(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Apply the result of a `list()` call.
    ///
    /// A failed load keeps the previous snapshot and returns the notice to show.
    pub fn finish_load(&mut self, result: Result<Vec<Client>, GatewayError>) -> Option<Notice> {
        self.phase = Phase::Ready;
        match result {
            Ok(clients) => {
                self.snapshot = clients;
                None
            }
            Err(e) => Some(Notice::destructive("Could not load clients").description(e.to_string())),
        }
    }

    /// Rows to display: the snapshot filtered by the current search term.
    pub fn visible(&self) -> Vec<Client> {
        filter_clients(&self.snapshot, &self.search)
    }
}

/// A write against the record collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create(NewClient),
    Update(ClientId, NewClient),
    Delete(ClientId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationOutcome {
    pub notice: Notice,
    /// Whether [`CLIENTS_LIST`] must be reloaded.
    pub invalidate: bool,
}

impl Mutation {
    fn describe(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Create(_) => (
                "Client added",
                "The new client has been saved.",
                "Could not add client",
            ),
            Self::Update(..) => (
                "Client updated",
                "The client's details have been updated.",
                "Could not update client",
            ),
            Self::Delete(_) => (
                "Client removed",
                "The client has been removed.",
                "Could not remove client",
            ),
        }
    }
}

/// Run `mutation` against `records` and describe the result.
pub async fn apply<R: ClientRecords>(records: &R, mutation: Mutation) -> MutationOutcome {
    let (ok_title, ok_description, err_title) = mutation.describe();
    let result = match mutation {
        Mutation::Create(draft) => records.create(draft).await.map(|_| ()),
        Mutation::Update(id, patch) => records.update(id, patch).await,
        Mutation::Delete(id) => records.delete(id).await,
    };
    match result {
        Ok(()) => MutationOutcome {
            notice: Notice::success(ok_title).description(ok_description),
            invalidate: true,
        },
        Err(e) => {
            tracing::debug!(error = %e, "client mutation failed");
            MutationOutcome {
                notice: Notice::destructive(err_title).description(e.to_string()),
                invalidate: false,
            }
        }
    }
}

/// Load the collection into `state`, returning a notice on failure.
pub async fn reload<R: ClientRecords>(records: &R, state: &mut CatalogState) -> Option<Notice> {
    state.begin_load();
    let result = records.list().await;
    state.finish_load(result)
}
