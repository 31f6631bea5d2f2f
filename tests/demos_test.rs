use std::path::PathBuf;
use std::sync::Arc;
use taskgrid::config::{GridConfig, StoreBackend};
use taskgrid::grid::TreeGrid;
use taskgrid::model::loader::load_snapshot;
use taskgrid::store::InMemoryExpansionStore;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn test_demo_config_parses() {
    let config = GridConfig::load(&demo("taskgrid.yaml")).expect("demo config");
    assert_eq!(config.workflow_id.as_deref(), Some("example_dag"));
    assert_eq!(config.store, StoreBackend::File);
}

#[tokio::test]
async fn test_demo_snapshot_drives_grid() {
    let snapshot = load_snapshot(&demo("example_dag.yaml")).expect("demo snapshot");
    let mut grid = TreeGrid::mount("example_dag", Arc::new(InMemoryExpansionStore::new())).await;
    grid.apply_snapshot(snapshot);

    let ids: Vec<_> = grid.visible_rows().map(|r| r.task_id().to_string()).collect();
    assert_eq!(ids, vec!["extract", "transform", "load"]);

    grid.toggle_group("transform").await;
    let labels: Vec<_> = grid.visible_rows().map(|r| r.label).collect();
    assert_eq!(labels, vec!["extract", "transform", "clean", "fan_out [ ]", "nested", "load"]);

    // The nested task never ran, so every slot is a placeholder.
    grid.toggle_group("transform.nested").await;
    assert_eq!(grid.visible_rows().count(), 7);
    let deep = grid.cells("transform.nested.deep").unwrap();
    assert!(deep.iter().all(|c| c.is_placeholder()));
}
