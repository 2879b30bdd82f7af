use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_base = or_default("KITNEKA_API_BASE", "http://127.0.0.1:8000");
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "KITNEKA_API_BASE".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base}'"),
        });
    }
    let api_base = api_base.trim_end_matches('/').to_string();

    let env = parse_environment(&or_default("KITNEKA_ENV", "development"));
    let log_level = or_default("KITNEKA_LOG_LEVEL", env.default_log_level());
    let location = or_default("KITNEKA_LOCATION", "Mumbai").trim().to_string();
    let retailers_path = lookup("KITNEKA_RETAILERS_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let cache_dir = PathBuf::from(or_default("KITNEKA_CACHE_DIR", "./.kitneka-cache"));

    let request_timeout_secs = parse_u64("KITNEKA_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "KITNEKA_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("KITNEKA_USER_AGENT", "kitneka/0.1 (price-comparison)");
    let max_retries = parse_u32("KITNEKA_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("KITNEKA_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        api_base,
        env,
        log_level,
        location,
        retailers_path,
        cache_dir,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim().to_ascii_lowercase().as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
