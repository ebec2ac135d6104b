//! Root folder resolution priority: CLI → ENV → TOML → OS default
//!
//! #[serial] because RANKSCOUT_ROOT is process-global.

use serial_test::serial;
use std::path::{Path, PathBuf};

use rankscout_common::config::{resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};

fn toml_with_root(root: Option<&str>) -> TomlConfig {
    TomlConfig {
        root_folder: root.map(PathBuf::from),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    std::env::set_var(ROOT_FOLDER_ENV, "/from/env");

    let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml_with_root(Some("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/cli"));

    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(ROOT_FOLDER_ENV, "/from/env");

    let resolved = resolve_root_folder(None, &toml_with_root(Some("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/env"));

    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_without_env() {
    std::env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &toml_with_root(Some("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_blank_env_ignored() {
    std::env::set_var(ROOT_FOLDER_ENV, "  ");

    let resolved = resolve_root_folder(None, &toml_with_root(Some("/from/toml")));
    assert_eq!(resolved, PathBuf::from("/from/toml"));

    std::env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_os_default_last() {
    std::env::remove_var(ROOT_FOLDER_ENV);

    let resolved = resolve_root_folder(None, &toml_with_root(None));
    assert!(resolved.ends_with("rankscout") || resolved.ends_with("rankscout_data"));
}
