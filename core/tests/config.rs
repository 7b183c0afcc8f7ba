//! Loading storage and API config from a data directory.

use roi_core::config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_EXPORT_CAPACITY};
use std::fs;
use std::path::PathBuf;

fn data_dir(storage: &str, api: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roi-config-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("storage.json"), storage).unwrap();
    fs::write(dir.join("api.json"), api).unwrap();
    dir
}

#[test]
fn missing_fields_take_defaults() {
    let dir = data_dir(r#"{"calculation_capacity": 250}"#, r#"{"api_key": "iw_live"}"#);
    let config = AppConfig::load(dir.to_str().unwrap()).unwrap();

    assert_eq!(config.storage.calculation_capacity, 250);
    assert_eq!(config.storage.export_capacity, DEFAULT_EXPORT_CAPACITY);
    assert_eq!(config.storage.db_path, ":memory:");
    assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.api.api_key.as_deref(), Some("iw_live"));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn zero_capacity_is_rejected() {
    let dir = data_dir(r#"{"export_capacity": 0}"#, "{}");
    assert!(AppConfig::load(dir.to_str().unwrap()).is_err());
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_directory_is_an_error() {
    let err = AppConfig::load("/nonexistent/roi-config").unwrap_err();
    assert!(err.to_string().contains("storage.json"));
}

#[test]
fn test_defaults_validate() {
    AppConfig::default_test().validate().unwrap();
}
