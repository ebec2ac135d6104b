//! Provider credential resolution tests
//!
//! Uses serial_test: every test touching KEEPA_API_KEY is #[serial] so the
//! environment is never mutated concurrently.

use serial_test::serial;

use rankscout_common::config::TomlConfig;
use rankscout_common::Error;
use rankscout_enrich::config::{build_provider_source, resolve_provider_api_key, API_KEY_ENV};

fn toml_with_key(key: Option<&str>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.provider.api_key = key.map(str::to_string);
    config
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(API_KEY_ENV, "env-key");

    let result = resolve_provider_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(result, "env-key");

    std::env::remove_var(API_KEY_ENV);
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    std::env::remove_var(API_KEY_ENV);

    let result = resolve_provider_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(result, "toml-key");
}

#[test]
#[serial]
fn test_blank_env_falls_back_to_toml() {
    std::env::set_var(API_KEY_ENV, "   ");

    let result = resolve_provider_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(result, "toml-key");

    std::env::remove_var(API_KEY_ENV);
}

#[test]
#[serial]
fn test_missing_key_is_config_error() {
    std::env::remove_var(API_KEY_ENV);

    let result = resolve_provider_api_key(&toml_with_key(None));
    assert!(matches!(result, Err(Error::Config(_))));

    let result = resolve_provider_api_key(&toml_with_key(Some("")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_build_provider_source_requires_key() {
    std::env::remove_var(API_KEY_ENV);

    assert!(build_provider_source(&toml_with_key(None)).is_err());
    assert!(build_provider_source(&toml_with_key(Some("toml-key"))).is_ok());
}
