use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "vAIdya";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database file used when `VAIDYA_DB` is unset (relative to the working directory).
pub const DEFAULT_DB_FILE: &str = "vAIdya.db";

/// Listen address used when `VAIDYA_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

pub const ENV_DB: &str = "VAIDYA_DB";
pub const ENV_ADDR: &str = "VAIDYA_ADDR";

/// Tracing filter applied when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "vaidya_lib=info,vaidya=info"
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = non_blank(ENV_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid {ENV_ADDR} '{addr}': {e}"))?;

        let db_path = non_blank(ENV_DB)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        Ok(Self { bind_addr, db_path })
    }
}
