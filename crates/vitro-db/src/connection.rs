//! SurrealDB connection management.

use std::env;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws, Wss};
use surrealdb::opt::auth::Root;
use tracing::info;
use vitro_core::error::{VitroError, VitroResult};

use crate::error::DbError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for connecting to the datastore.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Datastore host name or address.
    pub host: String,
    /// Datastore port.
    pub port: u16,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Connect over `wss://` instead of `ws://`.
    pub tls: bool,
    /// Upper bound on the whole connect + signin handshake.
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            namespace: "vitro".into(),
            database: "catalog".into(),
            username: "root".into(),
            password: "root".into(),
            tls: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

fn require_env(key: &str) -> VitroResult<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(VitroError::Configuration(format!(
            "missing required environment variable {key}"
        ))),
    }
}

impl DbConfig {
    /// Load the connection configuration from `VITRO_DB_*` environment
    /// variables.
    ///
    /// Host, port, and credentials are required; a missing or malformed
    /// value is a [`VitroError::Configuration`] and must halt startup
    /// before anything else runs.
    pub fn from_env() -> VitroResult<Self> {
        let host = require_env("VITRO_DB_HOST")?;
        let port = require_env("VITRO_DB_PORT")?
            .parse::<u16>()
            .map_err(|e| VitroError::Configuration(format!("invalid VITRO_DB_PORT: {e}")))?;
        let username = require_env("VITRO_DB_USER")?;
        let password = require_env("VITRO_DB_PASSWORD")?;

        let namespace = env::var("VITRO_DB_NAMESPACE").unwrap_or_else(|_| "vitro".into());
        let database = env::var("VITRO_DB_DATABASE").unwrap_or_else(|_| "catalog".into());
        let tls = env::var("VITRO_DB_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let connect_timeout = match env::var("VITRO_DB_CONNECT_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse::<u64>().map_err(|e| {
                VitroError::Configuration(format!("invalid VITRO_DB_CONNECT_TIMEOUT_SECS: {e}"))
            })?),
            Err(_) => DEFAULT_CONNECT_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            namespace,
            database,
            username,
            password,
            tls,
            connect_timeout,
        })
    }
}

/// Manages a connection to the datastore.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to the datastore using the provided configuration.
    ///
    /// Authenticates, selects the configured namespace and database, and
    /// returns a ready-to-use manager. The entire handshake is bounded by
    /// `config.connect_timeout`; on expiry the attempt fails with
    /// [`DbError::Timeout`] instead of hanging.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let endpoint = format!("{}:{}", config.host, config.port);
        info!(
            endpoint = %endpoint,
            namespace = %config.namespace,
            database = %config.database,
            tls = config.tls,
            "Connecting to datastore"
        );

        let db = tokio::time::timeout(config.connect_timeout, open(config, &endpoint))
            .await
            .map_err(|_| DbError::Timeout {
                seconds: config.connect_timeout.as_secs(),
            })??;

        info!("Successfully connected to datastore");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

async fn open(config: &DbConfig, endpoint: &str) -> Result<Surreal<Client>, surrealdb::Error> {
    let db = if config.tls {
        Surreal::new::<Wss>(endpoint).await?
    } else {
        Surreal::new::<Ws>(endpoint).await?
    };

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_local() {
        let config = DbConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert!(!config.tls);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }
}
