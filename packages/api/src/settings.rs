//! Server settings, layered: built-in defaults, then an optional
//! `clientbook.toml`, then `CLIENTBOOK__SECTION__KEY` environment variables.
//! The conventional `SUPABASE_URL` / `SUPABASE_ANON_KEY` variables win over
//! everything else.

use config::{Config, ConfigError, Environment, File, FileFormat};
use domain::{EmailRules, GatewayConfig};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;

static SETTINGS: OnceCell<Settings> = OnceCell::const_new();

#[derive(Debug, Clone, Deserialize)]
pub struct Supabase {
    pub url: String,
    pub anon_key: String,
}

impl Supabase {
    /// `path` joined onto the project URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Longest idle period a cookie session may be configured to survive.
pub const MAX_SESSION_DAYS: u64 = 365;

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub secure_cookies: bool,
    pub session_days: u64,
}

impl Server {
    /// How long an idle session lives.
    pub fn inactivity(&self) -> Duration {
        Duration::from_secs(60 * 60 * 24 * self.session_days)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub supabase: Supabase,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub email: EmailRules,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("clientbook.toml")
    }

    pub(crate) fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("supabase.url", "http://localhost:54321")?
            .set_default("supabase.anon_key", "")?
            .set_default("server.secure_cookies", false)?
            .set_default("server.session_days", 7)?
            .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("CLIENTBOOK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("supabase.url", std::env::var("SUPABASE_URL").ok())?
            .set_override_option("supabase.anon_key", std::env::var("SUPABASE_ANON_KEY").ok())?
            .build()?;

        let settings: Self = config.try_deserialize()?;
        if !(1..=MAX_SESSION_DAYS).contains(&settings.server.session_days) {
            return Err(ConfigError::Message(format!(
                "server.session_days must be between 1 and {MAX_SESSION_DAYS}, got {}",
                settings.server.session_days
            )));
        }
        Ok(settings)
    }
}

/// Process-wide settings, loaded on first use.
pub async fn settings() -> Result<&'static Settings, ConfigError> {
    SETTINGS
        .get_or_try_init(|| async {
            dotenvy::dotenv().ok();
            let settings = Settings::new()?;
            tracing::info!(supabase = %settings.supabase.url, table = %settings.gateway.table, "settings loaded");
            Ok(settings)
        })
        .await
}
