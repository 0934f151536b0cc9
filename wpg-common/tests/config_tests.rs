//! Configuration loading and root folder resolution
//!
//! Tests that manipulate WPG_ROOT_FOLDER are marked with #[serial] so they
//! never run in parallel with each other.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;
use wpg_common::config::{
    default_root_folder, load_toml_config, write_toml_config, BrandConfig, RootFolderResolver, TomlConfig,
    ROOT_FOLDER_ENV,
};

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolver = RootFolderResolver::new(None, &TomlConfig::default());
    assert_eq!(resolver.resolve(), default_root_folder());
}

#[test]
#[serial]
fn test_resolver_cli_arg_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/wpg-from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/wpg-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/wpg-from-cli")), &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/wpg-from-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/wpg-from-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/wpg-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/wpg-from-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_used_without_env() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/wpg-from-toml")),
        ..Default::default()
    };

    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/wpg-from-toml"));
}

#[test]
fn test_write_then_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("config.toml");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/music/wpg")),
        brand: BrandConfig {
            artist: "someone else".to_string(),
            ..BrandConfig::default()
        },
        ..Default::default()
    };

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!temp_dir.path().join("config.toml.tmp").exists());
    assert_eq!(load_toml_config(&target).unwrap(), config);
}

#[test]
fn test_write_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("wpg").join("config.toml");

    write_toml_config(&TomlConfig::default(), &target).unwrap();
    assert!(target.exists());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_toml_config(&temp_dir.path().join("nope.toml"));
    assert!(matches!(result, Err(wpg_common::Error::Io(_))));
}
