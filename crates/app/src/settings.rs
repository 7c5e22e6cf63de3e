//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` and then from environment
//! variables prefixed with `RECIPES`, using `__` between sections
//! (`RECIPES__SERVER__PORT=8080`). See `settings.example.toml`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
    /// Apply migrations and exit without serving.
    pub migrate_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub prefix: String,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("app.migrate_only", false)?
            .set_default("server.port", 3000)?
            .set_default("server.prefix", "/api")?
            .set_default("server.database", "memory")?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("RECIPES").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
