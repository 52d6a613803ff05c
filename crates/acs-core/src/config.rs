use url::Url;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.acs.ir";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

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
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ACS_ENV", "development"))?;
    let log_level = or_default("ACS_LOG_LEVEL", "info");

    let base_url = parse_base_url(&or_default("ACS_BASE_URL", DEFAULT_BASE_URL))?;
    let cache_dir = PathBuf::from(or_default("ACS_CACHE_DIR", ".cache/acs"));

    let fetch_timeout_ms = parse_u64("ACS_FETCH_TIMEOUT_MS", "8000")?;
    let fetch_max_attempts = parse_u32("ACS_FETCH_MAX_ATTEMPTS", "3")?;
    if fetch_max_attempts == 0 {
        return Err(invalid(
            "ACS_FETCH_MAX_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }
    let fetch_backoff_ms = parse_u64("ACS_FETCH_BACKOFF_MS", "600")?;
    let revalidate_secs = parse_u64("ACS_REVALIDATE_SECS", "300")?;
    let cache_ttl_secs = parse_u64("ACS_CACHE_TTL_SECS", "300")?;
    let user_agent = or_default("ACS_USER_AGENT", DEFAULT_USER_AGENT);
    let skip_network = lookup("ACS_SKIP_NETWORK").is_ok_and(|v| parse_flag(&v));

    let self_hosts = match lookup("ACS_SELF_HOSTS") {
        Ok(raw) => raw
            .split(',')
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect(),
        Err(_) => host_of(&base_url).into_iter().collect(),
    };

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        cache_dir,
        fetch_timeout_ms,
        fetch_max_attempts,
        fetch_backoff_ms,
        revalidate_secs,
        cache_ttl_secs,
        user_agent,
        skip_network,
        self_hosts,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ACS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Accepts an absolute http(s) URL with a host and strips any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let is_http_with_host = Url::parse(trimmed)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some());
    if !is_http_with_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "ACS_BASE_URL".to_string(),
            reason: format!("\"{raw}\" is not an absolute http(s) URL"),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn host_of(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
