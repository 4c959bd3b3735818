//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const COMPONENTS_CSS: Asset = asset!("/assets/components.css");

mod auth;
pub use auth::{use_auth, use_session_store, AuthProvider, AuthStore, ServerAuth};

mod records;
pub use records::ServerRecords;

mod query;
pub use query::{use_query_client, QueryClient, QueryClientProvider};

mod notify;
pub use notify::notify;

mod theme;
pub use theme::{apply_theme, load_theme_from_storage, ThemeSignal, ThemeToggle};

mod client_form;
pub use client_form::ClientForm;

mod clients_table;
pub use clients_table::ClientsTable;

pub mod views;
