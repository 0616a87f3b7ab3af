//! Tests for configuration file discovery and extension dispatch

use serial_test::serial;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::loader;
use crate::app::models::Group;
use crate::app::services::config_loader::{format_for_path, resolve_config_path, ConfigFormat};
use crate::app::services::registry_store::Registry;
use crate::constants::REGISTRY_ENV_VAR;
use crate::RegistryError;

#[test]
fn test_format_dispatch() {
    assert_eq!(
        format_for_path(Path::new("reg.ini")).unwrap(),
        ConfigFormat::Ini
    );
    assert_eq!(
        format_for_path(Path::new("/etc/registry.json")).unwrap(),
        ConfigFormat::Json
    );

    // Anything else would be a scripted configuration.
    let err = format_for_path(Path::new("registry.pm")).unwrap_err();
    assert!(matches!(err, RegistryError::BadInput { .. }));
    let err = format_for_path(Path::new(".ensembl_init")).unwrap_err();
    assert!(matches!(err, RegistryError::BadInput { .. }));
}

#[test]
fn test_explicit_path_wins() {
    let path = resolve_config_path(Some(PathBuf::from("/tmp/explicit.ini"))).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/explicit.ini"));
}

#[test]
#[serial]
fn test_environment_variable_fallback() {
    std::env::set_var(REGISTRY_ENV_VAR, "/tmp/from-env.json");
    let path = resolve_config_path(None).unwrap();
    std::env::remove_var(REGISTRY_ENV_VAR);
    assert_eq!(path, PathBuf::from("/tmp/from-env.json"));
}

#[test]
#[serial]
fn test_home_directory_fallback() {
    let temp = TempDir::new().unwrap();
    let init = temp.path().join(".ensembl_init");
    std::fs::write(&init, "").unwrap();

    std::env::remove_var(REGISTRY_ENV_VAR);
    let old_home = std::env::var("HOME").ok();
    std::env::set_var("HOME", temp.path());

    let path = resolve_config_path(None).unwrap();

    match old_home {
        Some(home) => std::env::set_var("HOME", home),
        None => std::env::remove_var("HOME"),
    }
    assert_eq!(path, init);
}

#[tokio::test]
async fn test_load_file_by_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("registry.ini");
    std::fs::write(
        &path,
        "[human_core]\nspecies=homo_sapiens\ngroup=core\nhost=db.test\ndbname=homo_sapiens_core_65_37\n",
    )
    .unwrap();

    let registry = Registry::new();
    loader().load_file(&registry, &path).await.unwrap();
    assert!(registry.get_db_adaptor("homo_sapiens", Group::Core).is_some());
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let registry = Registry::new();
    let err = loader()
        .load_file(&registry, Path::new("/nonexistent/registry.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
}
