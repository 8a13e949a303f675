/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration from
 * environment variables, plus the optional PostgreSQL connection.
 *
 * # Configuration Sources
 *
 * | Variable                   | Default          |
 * |----------------------------|------------------|
 * | `SERVER_PORT`              | `3000`           |
 * | `DATABASE_URL`             | unset (in-memory)|
 * | `JWT_SECRET`               | required         |
 * | `JWT_AUDIENCE`             | unset            |
 * | `PUBLIC_SCHEME`            | `https`          |
 * | `PUBLIC_HOST`              | `localhost:3000` |
 * | `OG_IMAGE_PATH`            | `/api/og`        |
 * | `SHELL_DIR`                | unset            |
 * | `BLOB_DIR`                 | `./storage`      |
 * | `BLOB_BUCKET`              | `polaroids`      |
 * | `PREVIEW_FETCH_TIMEOUT_MS` | `3000`           |
 *
 * # Error Handling
 *
 * Malformed values are configuration errors. A database that cannot be
 * reached is not: it is logged and the server falls back to the in-memory
 * card store.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::backend::store::{spawn_change_listener, CardStore, MemoryCardStore, PgCardStore};
use crate::shared::{CardChange, ConfigError};

/// Everything the server reads from its environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub public_scheme: String,
    pub public_host: String,
    pub og_image_path: String,
    pub shell_dir: Option<PathBuf>,
    pub blob_dir: PathBuf,
    pub blob_bucket: String,
    pub preview_fetch_timeout: Duration,
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let preview_fetch_timeout = match get("PREVIEW_FETCH_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "PREVIEW_FETCH_TIMEOUT_MS",
                    value: raw,
                }
            })?),
            None => Duration::from_millis(3000),
        };

        let public_scheme = get("PUBLIC_SCHEME").unwrap_or_else(|| "https".to_string());
        if public_scheme != "http" && public_scheme != "https" {
            return Err(ConfigError::InvalidValue {
                key: "PUBLIC_SCHEME",
                value: public_scheme,
            });
        }

        let og_image_path = get("OG_IMAGE_PATH").unwrap_or_else(|| "/api/og".to_string());
        let og_image_path = format!("/{}", og_image_path.trim_matches('/'));

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            jwt_audience: get("JWT_AUDIENCE"),
            public_scheme,
            public_host: get("PUBLIC_HOST").unwrap_or_else(|| "localhost:3000".to_string()),
            og_image_path,
            shell_dir: get("SHELL_DIR").map(PathBuf::from),
            blob_dir: PathBuf::from(get("BLOB_DIR").unwrap_or_else(|| "./storage".to_string())),
            blob_bucket: get("BLOB_BUCKET").unwrap_or_else(|| "polaroids".to_string()),
            preview_fetch_timeout,
        })
    }

    /// Configuration for tests and local runs with the given secret
    pub fn for_secret(secret: impl Into<String>) -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: secret.into(),
            jwt_audience: None,
            public_scheme: "https".to_string(),
            public_host: "localhost:3000".to_string(),
            og_image_path: "/api/og".to_string(),
            shell_dir: None,
            blob_dir: PathBuf::from("./storage"),
            blob_bucket: "polaroids".to_string(),
            preview_fetch_timeout: Duration::from_millis(3000),
        }
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if `url` is `None` or connecting fails
///
/// Migration failures are logged; the server still starts.
pub async fn load_database(url: Option<&str>) -> Option<PgPool> {
    let database_url = match url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory card store.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to the in-memory card store.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Pick the card store for this process
///
/// With a database, change events come from the `polaroid_changes` listener;
/// otherwise the in-memory store reports its own mutations.
pub async fn load_card_store(
    config: &ServerConfig,
    changes: &broadcast::Sender<CardChange>,
) -> Arc<dyn CardStore> {
    match load_database(config.database_url.as_deref()).await {
        Some(pool) => {
            spawn_change_listener(pool.clone(), changes.clone());
            Arc::new(PgCardStore::new(pool))
        }
        None => Arc::new(MemoryCardStore::new().with_changes(changes.clone())),
    }
}
