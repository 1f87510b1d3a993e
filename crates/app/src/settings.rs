//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` in the working directory, then overridden by
//! `PENNYWISE__SECTION__KEY` environment variables.
//!
//! ```toml
//! [app]
//! level = "info"
//! user_id = "default-user"
//! default_currency = "USD"
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 3000
//! database = { sqlite = "pennywise.db" }
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
    pub user_id: String,
    pub default_currency: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("app.user_id", engine::DEFAULT_USER_ID)?
            .set_default("app.default_currency", "USD")?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("PENNYWISE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
