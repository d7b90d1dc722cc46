//! Sink connection configuration.
//!
//! Loaded once from the environment and passed explicitly into the loader;
//! there is no process-wide configuration singleton.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgConnectOptions;
use std::env;

/// Connection parameters for the Postgres sink.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl SinkConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            host: env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("PGPORT")
                .unwrap_or_else(|_| "5432".to_string())
                .parse()
                .context("PGPORT must be a valid port number")?,
            user: env::var("PGUSER").unwrap_or_else(|_| "dbt_user".to_string()),
            password: env::var("PGPASSWORD").context("PGPASSWORD must be set")?,
            database: env::var("PGDATABASE").unwrap_or_else(|_| "nerd_facts".to_string()),
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}
