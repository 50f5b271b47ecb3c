//! Configuration loaded from files on disk.

use std::fs;

use episode_search::config::{BASE_URL_ENV, TIMEOUT_ENV};
use episode_search::{ConfigError, SanitizePolicy, SessionConfig};
use tempfile::TempDir;

fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("episode-search.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn loads_a_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"{ "base_url": "https://archive.example", "request_timeout_ms": 2500 }"#,
    );

    let config = SessionConfig::from_json_file(&path).unwrap();

    assert_eq!(config.base_url, "https://archive.example");
    assert_eq!(config.request_timeout_ms, 2500);
    assert_eq!(config.first_page_limit, 50);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.sanitize, SanitizePolicy::EmphasisOnly);
}

#[test]
fn missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let err = SessionConfig::from_json_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "{ base_url: nope");

    assert!(matches!(
        SessionConfig::from_json_file(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "base_url": "  " }"#);

    assert!(matches!(
        SessionConfig::from_json_file(&path),
        Err(ConfigError::Invalid { field: "base_url", .. })
    ));
}

#[test]
fn environment_overrides_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "base_url": "https://from-file.example" }"#);

    let config = SessionConfig::from_json_file(&path)
        .unwrap()
        .apply_env_from(|key| match key {
            k if k == BASE_URL_ENV => Some("https://from-env.example".to_string()),
            k if k == TIMEOUT_ENV => Some("750".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.base_url, "https://from-env.example");
    assert_eq!(config.request_timeout_ms, 750);
}
