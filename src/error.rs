use thiserror::Error;

/// Domain errors raised by the grid state model and its stores.
#[derive(Debug, Error)]
pub enum GridError {
    /// Snapshot file could not be read or parsed.
    #[error("Failed to load snapshot from {path}: {reason}")]
    SnapshotLoad { path: String, reason: String },

    /// Persisted expansion record exists but cannot be decoded.
    #[error("Expansion store '{store}' is corrupted: {reason}")]
    StoreCorrupted { store: String, reason: String },

    /// Backend cannot be reached.
    #[error("Expansion store '{store}' unavailable: {reason}")]
    StoreUnavailable { store: String, reason: String },

    /// Task id not present in the current snapshot.
    #[error("Task not found: {0}")]
    UnknownTask(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
