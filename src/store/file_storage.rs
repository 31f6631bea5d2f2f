use async_trait::async_trait;
use anyhow::{Result, Context as AnyhowContext};
use serde::{Serialize, Deserialize};
use fd_lock::RwLock;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use crate::error::GridError;
use crate::store::{storage_key, GroupExpansionStore, GroupSet};

/// On-disk layout: one JSON document holding every workflow's record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateFile {
    format_version: u32,
    #[serde(default)]
    records: BTreeMap<String, GroupSet>,
}

const STORE_NAME: &str = "file";

impl StateFile {
    const FORMAT_VERSION: u32 = 1;
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            records: BTreeMap::new(),
        }
    }
}

/// Decodes a state document. A wrong format version reads as empty.
fn decode(path: &Path, raw: &str) -> Result<StateFile> {
    let state: StateFile = serde_json::from_str(raw).map_err(|e| GridError::StoreCorrupted {
        store: STORE_NAME.to_string(),
        reason: format!("{}: {}", path.display(), e),
    })?;

    if state.format_version != StateFile::FORMAT_VERSION {
        warn!(
            stored = state.format_version,
            expected = StateFile::FORMAT_VERSION,
            "Expansion state format version mismatch, ignoring stored state"
        );
        return Ok(StateFile::default());
    }

    Ok(state)
}

/// Read-modify-write under an exclusive lock on `lock_path`.
///
/// `apply` returns whether it changed the document; nothing is written otherwise.
/// The new document is written to a uniquely named temp file in the same
/// directory and persisted over `path`.
fn update_locked(path: &Path, lock_path: &Path, apply: impl FnOnce(&mut StateFile) -> bool) -> Result<bool> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
    let mut lock = RwLock::new(lock_file);
    let _guard = lock
        .write()
        .with_context(|| format!("Failed to lock {}", lock_path.display()))?;

    let mut state = match std::fs::read_to_string(path) {
        Ok(raw) => match decode(path, &raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Overwriting corrupted expansion state");
                StateFile::default()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => StateFile::default(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read expansion state from {}", path.display()));
        }
    };

    if !apply(&mut state) {
        return Ok(false);
    }

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, &state)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move expansion state into {}", path.display()))?;
    Ok(true)
}

/// JSON file store that survives process restarts.
///
/// Every mutation holds an advisory lock on a sibling `<file>.lock` for its
/// whole read-modify-write, so separate instances and separate processes on
/// the same file do not lose each other's writes. Readers never observe a
/// half-written document since each write is renamed into place.
pub struct FileExpansionStore {
    path: PathBuf,
    lock_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileExpansionStore {
    /// The file does not need to exist; it is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        Self {
            path,
            lock_path: PathBuf::from(lock_path),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<StateFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => decode(&self.path, &raw),
            // First run
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StateFile::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read expansion state from {}", self.path.display())),
        }
    }

    async fn update<F>(&self, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut StateFile) -> bool + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        tokio::task::spawn_blocking(move || update_locked(&path, &lock_path, apply))
            .await
            .context("Expansion state writer panicked")?
    }
}

#[async_trait]
impl GroupExpansionStore for FileExpansionStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn open_groups(&self, workflow_id: &str) -> Result<Option<GroupSet>> {
        let mut state = self.read_file().await?;
        Ok(state.records.remove(&storage_key(workflow_id)))
    }

    async fn set_open(&self, workflow_id: &str, group_id: &str, open: bool) -> Result<()> {
        let key = storage_key(workflow_id);
        let group = group_id.to_string();
        let written = self
            .update(move |state| {
                if open {
                    state.records.entry(key).or_default().insert(group)
                } else {
                    state.records.get_mut(&key).is_some_and(|g| g.remove(&group))
                }
            })
            .await?;

        if written {
            debug!(workflow_id, group_id, open, path = %self.path.display(), "Persisted group state");
        }
        Ok(())
    }

    async fn clear(&self, workflow_id: &str) -> Result<()> {
        let key = storage_key(workflow_id);
        self.update(move |state| state.records.remove(&key).is_some()).await?;
        Ok(())
    }
}
