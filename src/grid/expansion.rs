use tracing::{debug, warn};
use crate::store::{GroupExpansionStore, GroupSet};

/// In-process view of a workflow's open groups.
///
/// Read from the store once per mount (or explicit reload) and handed to the
/// tree walk, so one render pass never mixes two versions of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenGroups {
    groups: GroupSet,
}

impl OpenGroups {
    pub fn new(groups: GroupSet) -> Self {
        Self { groups }
    }

    /// Loads the record for `workflow_id`. Any store failure reads as
    /// "everything closed" so rendering never breaks on a bad record.
    pub async fn load(store: &dyn GroupExpansionStore, workflow_id: &str) -> Self {
        match store.open_groups(workflow_id).await {
            Ok(Some(groups)) => {
                debug!(workflow_id, store = store.name(), count = groups.len(), "Loaded open groups");
                Self::new(groups)
            }
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(workflow_id, store = store.name(), error = %e, "Could not read open groups, treating all as closed");
                Self::default()
            }
        }
    }

    pub fn is_open(&self, group_id: &str) -> bool {
        self.groups.contains(group_id)
    }

    /// Returns whether the set changed.
    pub fn set_open(&mut self, group_id: &str, open: bool) -> bool {
        if open {
            self.groups.insert(group_id.to_string())
        } else {
            self.groups.remove(group_id)
        }
    }

    /// Flips `group_id` and returns its new state.
    pub fn toggle(&mut self, group_id: &str) -> bool {
        let open = !self.is_open(group_id);
        self.set_open(group_id, open);
        open
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
