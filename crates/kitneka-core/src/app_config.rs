use std::path::PathBuf;

use crate::retailers::{load_retailers, RetailerLists};
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Log filter used when neither `RUST_LOG` nor `KITNEKA_LOG_LEVEL` is set.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Test => "warn",
            Environment::Production => "info",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub env: Environment,
    pub log_level: String,
    /// City sent with URL searches so local sellers are ranked for it.
    pub location: String,
    pub retailers_path: Option<PathBuf>,
    pub cache_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl AppConfig {
    /// Retailer lists from `retailers_path`, or the built-in defaults when unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured file cannot be loaded.
    pub fn retailers(&self) -> Result<RetailerLists, ConfigError> {
        match &self.retailers_path {
            Some(path) => load_retailers(path),
            None => Ok(RetailerLists::default()),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The base URL may embed credentials for a private deployment.
        let api_base = self
            .api_base
            .split_once("://")
            .and_then(|(scheme, rest)| {
                rest.split_once('@')
                    .map(|(_, host)| format!("{scheme}://[redacted]@{host}"))
            })
            .unwrap_or_else(|| self.api_base.clone());
        f.debug_struct("AppConfig")
            .field("api_base", &api_base)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("location", &self.location)
            .field("retailers_path", &self.retailers_path)
            .field("cache_dir", &self.cache_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
