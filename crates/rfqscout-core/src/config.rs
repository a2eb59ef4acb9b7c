use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_LISTING_URL: &str =
    "https://sourcing.alibaba.com/rfq/rfq_search_list.htm?country=AE&recently=Y&page={page}";
pub const DEFAULT_SITE_ORIGIN: &str = "https://sourcing.alibaba.com";
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let env = parse_environment(&or_default("RFQSCOUT_ENV", "development"))?;
    let log_level = or_default("RFQSCOUT_LOG_LEVEL", "info");

    let listing_url_template = or_default("RFQSCOUT_LISTING_URL", DEFAULT_LISTING_URL);
    if !listing_url_template.contains("{page}") {
        return Err(invalid(
            "RFQSCOUT_LISTING_URL",
            "template must contain a {page} placeholder".to_string(),
        ));
    }

    let site_origin = or_default("RFQSCOUT_SITE_ORIGIN", DEFAULT_SITE_ORIGIN)
        .trim_end_matches('/')
        .to_string();
    if !(site_origin.starts_with("http://") || site_origin.starts_with("https://")) {
        return Err(invalid(
            "RFQSCOUT_SITE_ORIGIN",
            format!("\"{site_origin}\" is not an http(s) origin"),
        ));
    }

    let max_pages = parse_u32("RFQSCOUT_MAX_PAGES", "3")?;
    if max_pages == 0 {
        return Err(invalid("RFQSCOUT_MAX_PAGES", "must be at least 1".to_string()));
    }

    let output_path = PathBuf::from(or_default("RFQSCOUT_OUTPUT_PATH", "output.csv"));
    let request_timeout_secs = parse_u64("RFQSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let fetch_timeout_secs = parse_u64("RFQSCOUT_FETCH_TIMEOUT_SECS", "60")?;
    let page_delay_ms = parse_u64("RFQSCOUT_PAGE_DELAY_MS", "0")?;
    let empty_page_retries = parse_u32("RFQSCOUT_EMPTY_PAGE_RETRIES", "0")?;
    let user_agent = or_default("RFQSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("RFQSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("RFQSCOUT_RETRY_BACKOFF_BASE_SECS", "2")?;
    let snapshot_dir = lookup("RFQSCOUT_SNAPSHOT_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        listing_url_template,
        site_origin,
        max_pages,
        output_path,
        request_timeout_secs,
        fetch_timeout_secs,
        page_delay_ms,
        empty_page_retries,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        snapshot_dir,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RFQSCOUT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
