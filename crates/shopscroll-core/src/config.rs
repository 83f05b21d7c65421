use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let store_domain = require("SHOPSCROLL_STORE_DOMAIN")?;
    let storefront_token = require("SHOPSCROLL_STOREFRONT_TOKEN")?;
    let storefront_api_version = or_default("SHOPSCROLL_STOREFRONT_API_VERSION", "2024-10");

    let env = parse_environment(&or_default("SHOPSCROLL_ENV", "development"))?;
    let bind_addr = parse(&or_default, "SHOPSCROLL_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPSCROLL_LOG_LEVEL", "info");

    let request_timeout_secs = parse(&or_default, "SHOPSCROLL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPSCROLL_USER_AGENT", "shopscroll/0.1 (storefront)");
    let max_retries = parse(&or_default, "SHOPSCROLL_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse(&or_default, "SHOPSCROLL_RETRY_BACKOFF_BASE_SECS", "1")?;

    let page_size = parse_page_size(&or_default, "SHOPSCROLL_PAGE_SIZE", "8")?;
    let collections_page_size = parse_page_size(&or_default, "SHOPSCROLL_COLLECTIONS_PAGE_SIZE", "4")?;

    let look_ahead_px: f64 = parse(&or_default, "SHOPSCROLL_LOOK_AHEAD_PX", "100")?;
    if !look_ahead_px.is_finite() || look_ahead_px < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPSCROLL_LOOK_AHEAD_PX".to_string(),
            reason: "must be a non-negative number of pixels".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_domain,
        storefront_api_version,
        storefront_token,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        page_size,
        collections_page_size,
        look_ahead_px,
    })
}

fn parse<T>(
    or_default: &impl Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    or_default(var, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Page sizes must be at least 1; the storefront rejects `first: 0`.
fn parse_page_size(
    or_default: &impl Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<u32, ConfigError> {
    let size: u32 = parse(or_default, var, default)?;
    if size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }
    Ok(size)
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPSCROLL_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
