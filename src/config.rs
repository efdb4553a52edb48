//! Service configuration from environment variables (after `.env` is loaded).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::time::Duration;

/// Which gateway backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// In-process tables; contents are lost on exit.
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub request_timeout: Duration,
    pub body_limit: usize,
    /// Prefix under which the registry routes are nested, e.g. `/api/demo`.
    pub base_path: String,
    pub store: StoreKind,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/student_registry".into());
        let bind_addr = parse(&lookup, "BIND_ADDR", "0.0.0.0:3000")?;
        let max_connections = parse(&lookup, "DB_MAX_CONNECTIONS", "5")?;
        let timeout_secs: u64 = parse(&lookup, "REQUEST_TIMEOUT_SECS", "30")?;
        let body_limit = parse(&lookup, "BODY_LIMIT_BYTES", "65536")?;
        let store = parse(&lookup, "STORE", "postgres")?;

        let base_path = lookup("BASE_PATH").unwrap_or_else(|| "/api/demo".into());
        let base_path = format!("/{}", base_path.trim_matches('/'));
        if base_path == "/" {
            return Err(ConfigError::InvalidValue {
                key: "BASE_PATH",
                value: base_path,
            });
        }

        Ok(ServiceConfig {
            database_url,
            bind_addr,
            max_connections,
            request_timeout: Duration::from_secs(timeout_secs),
            body_limit,
            base_path,
            store,
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
