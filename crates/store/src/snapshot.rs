//! JSON snapshots of the document collections.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_core::budget::Budget;
use tally_core::store::StoreError;
use tally_core::transaction::Transaction;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors while reading or writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File could not be read or written.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid snapshot document.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot content violates a store constraint.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Every stored document, as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Budget documents.
    #[serde(default)]
    pub budgets: Vec<Budget>,
    /// Transaction documents.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Reads a snapshot from `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let data = tokio::fs::read_to_string(path).await?;
        let snapshot: Self = serde_json::from_str(&data)?;
        debug!(
            path = %path.display(),
            budgets = snapshot.budgets.len(),
            transactions = snapshot.transactions.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Reads a snapshot, or starts empty if `path` does not exist.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(SnapshotError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "snapshot not found, starting empty");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes the snapshot to `path` as pretty JSON, creating parent
    /// directories.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        debug!(path = %path.display(), "saved snapshot");
        Ok(())
    }
}
