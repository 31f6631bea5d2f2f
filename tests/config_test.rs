use std::fs;
use std::path::PathBuf;
use taskgrid::config::{GridConfig, StoreBackend};
use taskgrid::store::GroupExpansionStore;

#[test]
fn test_defaults() {
    let config = GridConfig::default();
    assert_eq!(config.store, StoreBackend::File);
    assert_eq!(config.state_file, PathBuf::from(".taskgrid").join("state.json"));
    assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
    assert!(config.auto_refresh);
    assert_eq!(config.workflow_id, None);

    assert_eq!(GridConfig::from_yaml("").unwrap(), config);
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let config = GridConfig::from_yaml("store: memory\nauto_refresh: false\n").unwrap();
    assert_eq!(config.store, StoreBackend::Memory);
    assert!(!config.auto_refresh);
    assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let err = GridConfig::from_yaml("store: sqlite\n").unwrap_err();
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn test_load_from_file_and_open_store() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state_file = temp_dir.path().join("state.json");
    let config_path = temp_dir.path().join("taskgrid.yaml");
    fs::write(
        &config_path,
        format!("workflow_id: etl\nstore: file\nstate_file: {}\n", state_file.display()),
    )
    .unwrap();

    let config = GridConfig::load(&config_path).unwrap();
    assert_eq!(config.workflow_id.as_deref(), Some("etl"));
    assert_eq!(config.state_file, state_file);

    let store = config.open_store().unwrap();
    assert_eq!(store.name(), "file");
}

#[test]
fn test_bad_redis_url_is_rejected() {
    let config = GridConfig {
        store: StoreBackend::Redis,
        redis_url: "not a url".to_string(),
        ..GridConfig::default()
    };
    assert!(config.open_store().is_err());

    let config = GridConfig {
        store: StoreBackend::Redis,
        ..GridConfig::default()
    };
    assert_eq!(config.open_store().unwrap().name(), "redis");
}
