use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use taskgrid::error::GridError;
use taskgrid::store::file_storage::FileExpansionStore;
use taskgrid::store::{storage_key, GroupExpansionStore, InMemoryExpansionStore};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_storage_key_format() {
    assert_eq!(storage_key("example_dag"), "example_dag-open-groups");
}

#[tokio::test]
async fn test_memory_defaults_to_closed() {
    let store = InMemoryExpansionStore::new();
    assert_eq!(store.open_groups("wf").await.unwrap(), None);
    assert!(!store.is_open("wf", "g").await.unwrap());
}

#[tokio::test]
async fn test_memory_set_open_is_idempotent() {
    let store = InMemoryExpansionStore::new();
    store.set_open("wf", "g", true).await.unwrap();
    let once = store.open_groups("wf").await.unwrap();
    store.set_open("wf", "g", true).await.unwrap();
    let twice = store.open_groups("wf").await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice, Some(set(&["g"])));
}

#[tokio::test]
async fn test_memory_records_are_scoped_per_workflow() {
    let store = InMemoryExpansionStore::new();
    store.set_open("wf1", "g", true).await.unwrap();

    assert!(store.is_open("wf1", "g").await.unwrap());
    assert!(!store.is_open("wf2", "g").await.unwrap());

    store.set_open("wf1", "g", false).await.unwrap();
    assert!(!store.is_open("wf1", "g").await.unwrap());

    store.set_open("wf1", "h", true).await.unwrap();
    store.clear("wf1").await.unwrap();
    assert_eq!(store.open_groups("wf1").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_concurrent_toggles_do_not_clobber() {
    let store = Arc::new(InMemoryExpansionStore::new());
    let mut handles = Vec::new();
    for i in 0..50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set_open("wf", &format!("g{}", i), true).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let groups = store.open_groups("wf").await.unwrap().unwrap();
    assert_eq!(groups.len(), 50);
}

#[tokio::test]
async fn test_file_round_trip_across_restart() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("state.json");

    {
        let store = FileExpansionStore::new(&path);
        store.set_open("wf", "B", true).await.unwrap();
        store.set_open("wf", "C.D", true).await.unwrap();
        store.set_open("other", "X", true).await.unwrap();
    }

    // A fresh store on the same file stands in for a process restart.
    let reopened = FileExpansionStore::new(&path);
    assert!(reopened.is_open("wf", "B").await.unwrap());
    assert!(reopened.is_open("wf", "C.D").await.unwrap());
    assert!(!reopened.is_open("wf", "X").await.unwrap());
    assert_eq!(reopened.open_groups("other").await.unwrap(), Some(set(&["X"])));

    reopened.set_open("wf", "B", false).await.unwrap();
    let again = FileExpansionStore::new(&path);
    assert_eq!(again.open_groups("wf").await.unwrap(), Some(set(&["C.D"])));

    again.clear("wf").await.unwrap();
    assert_eq!(again.open_groups("wf").await.unwrap(), None);
    assert!(again.is_open("other", "X").await.unwrap());
}

#[tokio::test]
async fn test_file_missing_means_closed() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileExpansionStore::new(temp_dir.path().join("absent.json"));

    assert_eq!(store.open_groups("wf").await.unwrap(), None);
    // Closing something never opened does not create the file.
    store.set_open("wf", "g", false).await.unwrap();
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_file_corruption_is_reported_then_overwritten() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");
    fs::write(&path, "{ not json").unwrap();

    let store = FileExpansionStore::new(&path);
    let err = store.open_groups("wf").await.unwrap_err();
    assert!(matches!(err.downcast_ref::<GridError>(), Some(GridError::StoreCorrupted { .. })));

    store.set_open("wf", "g", true).await.unwrap();
    assert_eq!(store.open_groups("wf").await.unwrap(), Some(set(&["g"])));
}

#[tokio::test]
async fn test_file_unknown_format_version_is_ignored() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");
    fs::write(&path, r#"{"formatVersion": 99, "records": {"wf-open-groups": ["g"]}}"#).unwrap();

    let store = FileExpansionStore::new(&path);
    assert_eq!(store.open_groups("wf").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_concurrent_toggles_do_not_clobber() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(FileExpansionStore::new(temp_dir.path().join("state.json")));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set_open("wf", &format!("g{}", i), true).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let groups = store.open_groups("wf").await.unwrap().unwrap();
    assert_eq!(groups.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_instances_sharing_a_path_do_not_clobber() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");
    let stores = [
        Arc::new(FileExpansionStore::new(&path)),
        Arc::new(FileExpansionStore::new(&path)),
    ];

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = stores[i % 2].clone();
        handles.push(tokio::spawn(async move {
            store.set_open("wf", &format!("g{}", i), true).await
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    let reopened = FileExpansionStore::new(&path);
    let groups = reopened.open_groups("wf").await.unwrap().unwrap();
    assert_eq!(groups.len(), 40);

    // Only the state file and its lock remain; no temp files are left behind.
    let mut names: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["state.json", "state.json.lock"]);
}
