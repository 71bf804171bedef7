use anyhow::{Context, Result};
use config::{builder::DefaultState, ConfigBuilder, Environment};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. When absent the in-memory store is used.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Config {
    /// Load configuration from `.env`, `HANGMAN__*` variables and `DATABASE_URL`.
    ///
    /// Nested keys use a double underscore, e.g. `HANGMAN__DATABASE__MAX_CONNECTIONS=20`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(Environment::with_prefix("HANGMAN").separator("__"))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())
            .context("Failed to read DATABASE_URL")?;

        Self::from_builder(builder)
    }

    /// Apply defaults on top of `builder` and deserialize.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .set_default("database.max_connections", 10)?
            .set_default("log.filter", "hangman_backend=debug")?
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Invalid configuration values")
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.url.as_deref()
    }
}
