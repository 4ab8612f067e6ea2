//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Staff web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Dashboard auto-refresh interval in seconds.
    pub refresh_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `STAFF_ADDR` | Server bind address | `127.0.0.1:8791` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:railcare.db?mode=rwc` |
    /// | `REFRESH_SECS` | Dashboard auto-refresh interval in seconds | `15` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("STAFF_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8791".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:railcare.db?mode=rwc".to_string());

        let refresh_secs: u64 = env::var("REFRESH_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidRefreshSecs)?;
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidRefreshSecs);
        }

        Ok(Self {
            addr,
            database_url,
            refresh_secs,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid STAFF_ADDR format")]
    InvalidAddr,

    #[error("REFRESH_SECS must be a positive number of seconds")]
    InvalidRefreshSecs,
}
