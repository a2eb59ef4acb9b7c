use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "RFQSCOUT_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.listing_url_template, DEFAULT_LISTING_URL);
    assert_eq!(cfg.site_origin, DEFAULT_SITE_ORIGIN);
    assert_eq!(cfg.max_pages, 3);
    assert_eq!(cfg.output_path, PathBuf::from("output.csv"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.fetch_timeout_secs, 60);
    assert_eq!(cfg.page_delay_ms, 0);
    assert_eq!(cfg.empty_page_retries, 0);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
    assert!(cfg.snapshot_dir.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_ENV", "production");
    map.insert("RFQSCOUT_MAX_PAGES", "10");
    map.insert("RFQSCOUT_SITE_ORIGIN", "https://rfq.example.com/");
    map.insert("RFQSCOUT_EMPTY_PAGE_RETRIES", "1");
    map.insert("RFQSCOUT_SNAPSHOT_DIR", "/tmp/pages");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.max_pages, 10);
    assert_eq!(cfg.site_origin, "https://rfq.example.com");
    assert_eq!(cfg.empty_page_retries, 1);
    assert_eq!(cfg.snapshot_dir, Some(PathBuf::from("/tmp/pages")));
}

#[test]
fn build_app_config_ignores_empty_snapshot_dir() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_SNAPSHOT_DIR", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.snapshot_dir.is_none());
}

#[test]
fn build_app_config_rejects_template_without_page_placeholder() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_LISTING_URL", "https://rfq.example.com/search?page=1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RFQSCOUT_LISTING_URL"),
        "expected InvalidEnvVar(RFQSCOUT_LISTING_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_pages() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_MAX_PAGES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RFQSCOUT_MAX_PAGES"),
        "expected InvalidEnvVar(RFQSCOUT_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_FETCH_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RFQSCOUT_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(RFQSCOUT_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_origin() {
    let mut map = HashMap::new();
    map.insert("RFQSCOUT_SITE_ORIGIN", "sourcing.alibaba.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RFQSCOUT_SITE_ORIGIN"),
        "expected InvalidEnvVar(RFQSCOUT_SITE_ORIGIN), got: {result:?}"
    );
}

#[test]
fn only_production_logs_json() {
    assert!(Environment::Production.json_logs());
    assert!(!Environment::Development.json_logs());
    assert!(!Environment::Test.json_logs());
}
