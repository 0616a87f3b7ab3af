//! Tests for JSON decoding boundaries

use super::loader;
use crate::app::models::Group;
use crate::app::services::config_loader::{parse_json, ConfigFormat};
use crate::app::services::registry_store::Registry;
use crate::RegistryError;

#[test]
fn test_empty_object_is_bad_input() {
    let err = parse_json("{}").unwrap_err();
    assert!(matches!(err, RegistryError::BadInput { .. }));
}

#[test]
fn test_half_empty_documents_are_tolerated() {
    assert!(parse_json(r#"{"aliases":{}}"#).is_ok());
    assert!(parse_json(r#"{"adaptors":[]}"#).is_ok());
}

#[test]
fn test_malformed_json_is_a_json_error() {
    let err = parse_json("{adaptors:[}").unwrap_err();
    assert!(matches!(err, RegistryError::Json(_)));
}

#[test]
fn test_non_object_document() {
    let err = parse_json("[1,2,3]").unwrap_err();
    assert!(matches!(err, RegistryError::TypeMismatch { .. }));
}

#[tokio::test]
async fn test_load_json_document() {
    let text = r#"{
        "adaptors": [
            {"species": "homo_sapiens", "group": "core",
             "host": "db.test", "port": 3306, "user": "ensro",
             "dbname": "homo_sapiens_core_65_37"}
        ],
        "aliases": {"homo_sapiens": ["9606", "human"]}
    }"#;
    let registry = Registry::new();
    loader()
        .load_str(&registry, text, ConfigFormat::Json)
        .await
        .unwrap();

    assert!(registry.get_db_adaptor("human", Group::Core).is_some());
    assert_eq!(
        registry.get_alias("9606").as_deref(),
        Some("homo_sapiens")
    );
}
