//! Names of the remote objects the record gateway talks to.
//!
//! ```toml
//! [gateway]
//! table = "clients"
//! bootstrap_procedure = "create_clients_table"
//! ```
//!
//! A missing section or key falls back to the defaults above.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Relation holding the client rows.
    #[serde(default = "default_table")]
    pub table: String,
    /// Remote procedure that creates the relation when it is missing.
    #[serde(default = "default_bootstrap_procedure")]
    pub bootstrap_procedure: String,
}

fn default_table() -> String {
    "clients".to_string()
}

fn default_bootstrap_procedure() -> String {
    "create_clients_table".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            bootstrap_procedure: default_bootstrap_procedure(),
        }
    }
}

impl GatewayConfig {
    /// Builder method to point the gateway at another relation.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}
