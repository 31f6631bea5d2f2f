use anyhow::{anyhow, Result, Context as AnyhowContext};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::error::GridError;
use crate::store::{GroupExpansionStore, InMemoryExpansionStore};
use crate::store::file_storage::FileExpansionStore;
use crate::store::redis_storage::RedisExpansionStore;

/// Where open-group records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory only; lost on exit.
    Memory,
    /// JSON file on local disk.
    #[default]
    File,
    /// Redis SET per workflow.
    Redis,
}

/// Grid settings, read from YAML. Missing fields take their defaults.
///
/// ```yaml
/// workflow_id: example_dag
/// store: file
/// state_file: .taskgrid/state.json
/// redis_url: redis://127.0.0.1:6379/0
/// auto_refresh: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub store: StoreBackend,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".taskgrid").join("state.json")
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/0".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            workflow_id: None,
            store: StoreBackend::default(),
            state_file: default_state_file(),
            redis_url: default_redis_url(),
            auto_refresh: true,
        }
    }
}

impl GridConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| GridError::Config(e.to_string()).into())
    }

    /// Workflow id to act on: `explicit` first, then the configured id, then
    /// the snapshot file stem when a snapshot is given.
    pub fn resolve_workflow(&self, explicit: Option<String>, snapshot: Option<&Path>) -> Result<String> {
        explicit
            .or_else(|| self.workflow_id.clone())
            .or_else(|| snapshot.and_then(Path::file_stem).map(|s| s.to_string_lossy().into_owned()))
            .ok_or_else(|| anyhow!("No workflow id given and none configured"))
    }

    /// Builds the configured store. Redis URLs are validated here; the
    /// connection itself is opened lazily on first use.
    pub fn open_store(&self) -> Result<Arc<dyn GroupExpansionStore>> {
        let store: Arc<dyn GroupExpansionStore> = match self.store {
            StoreBackend::Memory => Arc::new(InMemoryExpansionStore::new()),
            StoreBackend::File => Arc::new(FileExpansionStore::new(&self.state_file)),
            StoreBackend::Redis => {
                let client = redis::Client::open(self.redis_url.as_str())
                    .map_err(|e| GridError::Config(format!("invalid redis url '{}': {}", self.redis_url, e)))?;
                Arc::new(RedisExpansionStore::new(client))
            }
        };
        Ok(store)
    }
}
