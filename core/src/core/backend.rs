//! Key/value persistence behind the recovery store.

use crate::core::db::error::DatabaseError;
use crate::core::file_storage::error::FileStorageError;
use crate::types::{IssueKey, Snapshot};

pub mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum BackendError {
        #[error("Database error: {0}")]
        Database(#[from] DatabaseError),

        #[error("File storage error: {0}")]
        FileStorage(#[from] FileStorageError),
    }
}

use error::BackendError;

/// Upsert/read/delete of snapshots by storage name, plus the issue history.
///
/// `name` is always [`IssueKey::storage_name`] of the snapshot's issue.
pub trait Backend {
    fn put_snapshot(&mut self, name: &str, snapshot: &Snapshot) -> Result<(), BackendError>;

    fn get_snapshot(&self, name: &str) -> Result<Option<Snapshot>, BackendError>;

    /// Returns `true` if a snapshot was present.
    fn remove_snapshot(&mut self, name: &str) -> Result<bool, BackendError>;

    fn load_history(&self) -> Result<Vec<IssueKey>, BackendError>;

    fn save_history(&mut self, keys: &[IssueKey]) -> Result<(), BackendError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn put_snapshot(&mut self, name: &str, snapshot: &Snapshot) -> Result<(), BackendError> {
        (**self).put_snapshot(name, snapshot)
    }

    fn get_snapshot(&self, name: &str) -> Result<Option<Snapshot>, BackendError> {
        (**self).get_snapshot(name)
    }

    fn remove_snapshot(&mut self, name: &str) -> Result<bool, BackendError> {
        (**self).remove_snapshot(name)
    }

    fn load_history(&self) -> Result<Vec<IssueKey>, BackendError> {
        (**self).load_history()
    }

    fn save_history(&mut self, keys: &[IssueKey]) -> Result<(), BackendError> {
        (**self).save_history(keys)
    }
}
