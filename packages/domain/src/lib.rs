pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod models;
pub mod notice;
pub mod search;
pub mod session;
pub mod validation;

#[cfg(test)]
mod memory;

pub use backend::{AuthBackend, AuthEvent, AuthEvents, ClientRecords, Order, Select, TableBackend};
pub use catalog::{CatalogState, Mutation, MutationOutcome, Phase, CLIENTS_LIST};
pub use config::GatewayConfig;
pub use error::{AuthError, BackendError, BackendErrorKind, BackendResult, GatewayError, ValidationError};
pub use form::{ClientDraft, Field, FormState};
pub use gateway::RecordGateway;
pub use models::{AuthSession, AuthUser, Client, ClientId, NewClient, SessionTokens};
pub use notice::{Notice, NoticeVariant};
pub use search::filter_clients;
pub use session::{AuthOutcome, Destination, SessionState, SessionStore, SessionSubscription};
pub use validation::EmailRules;
