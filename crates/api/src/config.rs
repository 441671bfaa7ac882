//! Process configuration, read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use lumiere_session::DEFAULT_IDLE_TTL_SECS;

pub const BIND_ADDR_VAR: &str = "LUMIERE_BIND_ADDR";
pub const CATALOG_PATH_VAR: &str = "LUMIERE_CATALOG_PATH";
pub const SESSION_IDLE_SECS_VAR: &str = "LUMIERE_SESSION_IDLE_SECS";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a socket address: {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{var}={value:?} is not a positive number of seconds")]
    InvalidSessionTtl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Catalogue document to serve; the bundled seed catalogue when `None`.
    pub catalog_path: Option<PathBuf>,
    /// Idle time after which shopper sessions are dropped.
    pub session_idle_ttl: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: raw_addr.clone(),
                source,
            })?;

        let catalog_path = lookup(CATALOG_PATH_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let session_idle_ttl = match lookup(SESSION_IDLE_SECS_VAR).filter(|v| !v.trim().is_empty()) {
            None => Duration::seconds(DEFAULT_IDLE_TTL_SECS),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds)
                .ok_or(ConfigError::InvalidSessionTtl {
                    var: SESSION_IDLE_SECS_VAR,
                    value: raw,
                })?,
        };

        Ok(Self {
            bind_addr,
            catalog_path,
            session_idle_ttl,
        })
    }
}
