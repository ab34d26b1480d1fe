//! Environment configuration for the HTTP server.
//!
//! # Invariants
//! - Values are trimmed; empty values count as unset.
//! - `db_file` and `log_dir` are absolute (resolved against the working
//!   directory when given relative).

use scheduler_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 7540;
const DEFAULT_DB_FILE: &str = "scheduler.db";
const DEFAULT_WEB_DIR: &str = "web";
const DEFAULT_LOG_DIR: &str = "logs";

pub const PORT_ENV: &str = "SCHEDULER_PORT";
pub const DB_FILE_ENV: &str = "SCHEDULER_DB_FILE";
pub const WEB_DIR_ENV: &str = "SCHEDULER_WEB_DIR";
pub const LOG_DIR_ENV: &str = "SCHEDULER_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "SCHEDULER_LOG_LEVEL";

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => write!(f, "invalid {PORT_ENV} value `{value}`"),
            Self::CurrentDir(err) => write!(f, "failed to resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPort(_) => None,
            Self::CurrentDir(err) => Some(err),
        }
    }
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub db_file: PathBuf,
    /// Static front-end directory served for non-API paths.
    pub web_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(&cwd, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(
        cwd: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let port = match value(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            db_file: cwd.join(value(DB_FILE_ENV).unwrap_or_else(|| DEFAULT_DB_FILE.to_string())),
            web_dir: PathBuf::from(value(WEB_DIR_ENV).unwrap_or_else(|| DEFAULT_WEB_DIR.to_string())),
            log_dir: cwd.join(value(LOG_DIR_ENV).unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
        })
    }

    /// Listen address on all interfaces.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Loads a `.env` file when present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}
