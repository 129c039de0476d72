//! Configuration loading and representation.
//!
//! Settings come from `VENDING_*` environment variables with defaults suited
//! to a local single-file database.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://vending.sqlite";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which record store backs the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("expected `sqlite` or `memory`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_or(&lookup, "VENDING_BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let store = parse_or(&lookup, "VENDING_STORE", "sqlite")?;
        let database_url = lookup("VENDING_DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections: u32 = parse_or(
            &lookup,
            "VENDING_DB_MAX_CONNECTIONS",
            &DEFAULT_MAX_CONNECTIONS.to_string(),
        )?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "VENDING_DB_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let timeout_secs: u64 = parse_or(
            &lookup,
            "VENDING_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            bind_addr,
            store,
            database_url,
            max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
