//! Recovery store: crash-resilient snapshots and the issue history on top of a
//! pluggable backend.

use crate::core::db::Database;
use crate::core::db::error::DatabaseError;
use crate::core::file_storage::FileStorage;
use crate::core::file_storage::error::FileStorageError;
use crate::types::{BackendKind, Config, IssueHistory, IssueKey, Retention, Snapshot};
use error::OpenError;
use std::time::SystemTime;

pub mod backend;
pub mod db;
pub mod file_storage;

pub use backend::Backend;
pub use backend::error::BackendError;

pub mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum OpenError {
        #[error("Database error: {0}")]
        Database(#[from] DatabaseError),

        #[error("File storage error: {0}")]
        FileStorage(#[from] FileStorageError),
    }
}

/// Owns saved snapshots, one per issue, and applies lazy expiry on load.
///
/// Persistence failures never escape: they are logged and reported as `false`
/// or as an absent snapshot.
pub struct RecoveryStore<B: Backend> {
    backend: B,
    retention: Retention,
}

impl RecoveryStore<Box<dyn Backend + Send>> {
    /// Opens the backend selected in `config`.
    pub fn open(config: &Config) -> Result<Self, OpenError> {
        let backend: Box<dyn Backend + Send> = match config.backend {
            BackendKind::Database => Box::new(Database::new(config)?),
            BackendKind::Files => Box::new(FileStorage::new(config)?),
        };
        tracing::debug!(
            backend = %config.backend,
            path = %config.base_path.display(),
            "Opened recovery store"
        );
        Ok(Self::new(backend, config.retention))
    }
}

impl<B: Backend> RecoveryStore<B> {
    pub fn new(backend: B, retention: Retention) -> Self {
        Self { backend, retention }
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Snapshot operations.
impl<B: Backend> RecoveryStore<B> {
    /// Inserts or replaces the snapshot for its issue. Returns `false` if the
    /// write failed.
    pub fn save(&mut self, snapshot: &Snapshot) -> bool {
        let name = snapshot.issue.storage_name();
        match self.backend.put_snapshot(&name, snapshot) {
            Ok(()) => {
                tracing::debug!(
                    issue = %snapshot.issue,
                    elapsed = ?snapshot.elapsed,
                    "Saved snapshot"
                );
                true
            }
            Err(err) => {
                tracing::warn!(issue = %snapshot.issue, error = %err, "Failed to save snapshot");
                false
            }
        }
    }

    /// Returns the live snapshot for `issue`.
    ///
    /// Missing, undecodable and mismatched records are absent. An expired
    /// record is absent and deleted.
    pub fn load(&mut self, issue: &IssueKey, now: SystemTime) -> Option<Snapshot> {
        let name = issue.storage_name();
        let snapshot = match self.backend.get_snapshot(&name) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(issue = %issue, error = %err, "Ignoring unreadable snapshot");
                return None;
            }
        };

        if &snapshot.issue != issue {
            tracing::debug!(
                issue = %issue,
                stored = %snapshot.issue,
                "Snapshot belongs to another issue"
            );
            return None;
        }

        if snapshot.is_expired(now, self.retention.window) {
            tracing::info!(issue = %issue, "Purging expired snapshot");
            self.remove(&name, issue);
            return None;
        }

        Some(snapshot)
    }

    /// Removes the snapshot for `issue`, if any.
    pub fn delete(&mut self, issue: &IssueKey) {
        self.remove(&issue.storage_name(), issue);
    }

    fn remove(&mut self, name: &str, issue: &IssueKey) {
        match self.backend.remove_snapshot(name) {
            Ok(true) => tracing::debug!(issue = %issue, "Deleted snapshot"),
            Ok(false) => {}
            Err(err) => tracing::warn!(issue = %issue, error = %err, "Failed to delete snapshot"),
        }
    }
}

/// History operations.
impl<B: Backend> RecoveryStore<B> {
    pub fn load_history(&self) -> IssueHistory {
        match self.backend.load_history() {
            Ok(keys) => IssueHistory::from_keys(keys),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load issue history");
                IssueHistory::new()
            }
        }
    }

    pub fn save_history(&mut self, history: &IssueHistory) -> bool {
        match self.backend.save_history(history.as_slice()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to save issue history");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests;
