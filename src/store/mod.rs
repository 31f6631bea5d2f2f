pub mod file_storage;
pub mod redis_storage;

use async_trait::async_trait;
use anyhow::Result;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Set of open group ids for one workflow.
pub type GroupSet = BTreeSet<String>;

/// Key under which a workflow's open groups are persisted.
pub fn storage_key(workflow_id: &str) -> String {
    format!("{}-open-groups", workflow_id)
}

// --- Interfaces ---

/// Durable mapping from group id to open/closed, scoped per workflow.
///
/// `set_open` must be an atomic read-modify-write of the workflow's set:
/// two toggles on different groups may race and both must survive.
#[async_trait]
pub trait GroupExpansionStore: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// `None` when nothing was ever persisted for the workflow.
    async fn open_groups(&self, workflow_id: &str) -> Result<Option<GroupSet>>;

    async fn set_open(&self, workflow_id: &str, group_id: &str, open: bool) -> Result<()>;

    async fn clear(&self, workflow_id: &str) -> Result<()>;

    /// Absent records and absent groups both read as closed.
    async fn is_open(&self, workflow_id: &str, group_id: &str) -> Result<bool> {
        let groups = self.open_groups(workflow_id).await?;
        Ok(groups.is_some_and(|g| g.contains(group_id)))
    }
}

// --- In-Memory Implementation ---

/// Process-local store. State lives as long as the store value does.
#[derive(Default)]
pub struct InMemoryExpansionStore {
    // Map<StorageKey, OpenGroups>
    records: DashMap<String, GroupSet>,
}

impl InMemoryExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupExpansionStore for InMemoryExpansionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn open_groups(&self, workflow_id: &str) -> Result<Option<GroupSet>> {
        Ok(self.records.get(&storage_key(workflow_id)).map(|g| g.value().clone()))
    }

    async fn set_open(&self, workflow_id: &str, group_id: &str, open: bool) -> Result<()> {
        let key = storage_key(workflow_id);
        // The entry guard holds the shard lock for the whole mutation.
        if open {
            self.records.entry(key).or_default().insert(group_id.to_string());
        } else if let Some(mut groups) = self.records.get_mut(&key) {
            groups.remove(group_id);
        }
        Ok(())
    }

    async fn clear(&self, workflow_id: &str) -> Result<()> {
        self.records.remove(&storage_key(workflow_id));
        Ok(())
    }
}
