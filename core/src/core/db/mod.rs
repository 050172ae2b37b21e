//! Database layer for unitrack storage.
//!
//! This module handles all redb operations including:
//! - Snapshot storage (storage name → versioned snapshot bytes)
//! - Metadata storage (JSON strings), currently the issue history

use crate::core::backend::Backend;
use crate::core::backend::error::BackendError;
use crate::core::db::error::DatabaseError;
use crate::types::snapshot::versioned_snapshot::VersionedSnapshot;
use crate::types::{Config, IssueKey, Snapshot};
use redb::{ReadableDatabase, ReadableTable, TableDefinition};

pub mod error {
    use crate::types::snapshot::versioned_snapshot::error::DecodeError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DatabaseError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Encode error: {0}")]
        Encode(#[from] postcard::Error),

        #[error("Corrupt snapshot: {0}")]
        Corrupt(#[from] DecodeError),

        #[error("Corrupt metadata: {0}")]
        Metadata(#[from] serde_json::Error),
    }
}

/// Snapshot table: storage name → version byte ++ postcard body
const SNAPSHOT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Metadata table: &str → JSON string
const METADATA_TABLE: TableDefinition<&str, &str> = TableDefinition::new("metadata");

/// Metadata key for the issue history.
const METADATA_KEY_HISTORY: &str = "history";

/// The main database struct wrapping redb.
pub struct Database {
    db: redb::Database,
}

impl Database {
    /// Creates or opens a database using paths from the config.
    pub fn new(config: &Config) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SNAPSHOT_TABLE)?;
            let _ = write_txn.open_table(METADATA_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

/// Snapshot operations.
impl Database {
    /// Inserts or replaces the snapshot stored under `name`.
    pub fn put(&mut self, name: &str, snapshot: &Snapshot) -> Result<(), DatabaseError> {
        let bytes = VersionedSnapshot::from(snapshot).encode()?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SNAPSHOT_TABLE)?;
            table.insert(name, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Retrieves a snapshot by storage name.
    ///
    /// Returns `Err(Corrupt)` if the stored bytes cannot be decoded.
    pub fn get(&self, name: &str) -> Result<Option<Snapshot>, DatabaseError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOT_TABLE)?;

        match table.get(name)? {
            None => Ok(None),
            Some(guard) => {
                let snapshot = VersionedSnapshot::decode(guard.value())?.into_snapshot()?;
                Ok(Some(snapshot))
            }
        }
    }

    /// Returns `true` if the snapshot was present.
    pub fn remove(&mut self, name: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.db.begin_write()?;
        let removed;
        {
            let mut table = write_txn.open_table(SNAPSHOT_TABLE)?;
            removed = table.remove(name)?.is_some();
        }
        write_txn.commit()?;
        Ok(removed)
    }
}

/// Metadata operations.
impl Database {
    pub fn history(&self) -> Result<Vec<IssueKey>, DatabaseError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(METADATA_TABLE)?;

        match table.get(METADATA_KEY_HISTORY)? {
            None => Ok(Vec::new()),
            Some(guard) => Ok(serde_json::from_str(guard.value())?),
        }
    }

    pub fn set_history(&mut self, keys: &[IssueKey]) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(keys)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(METADATA_TABLE)?;
            table.insert(METADATA_KEY_HISTORY, json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl Backend for Database {
    fn put_snapshot(&mut self, name: &str, snapshot: &Snapshot) -> Result<(), BackendError> {
        Ok(self.put(name, snapshot)?)
    }

    fn get_snapshot(&self, name: &str) -> Result<Option<Snapshot>, BackendError> {
        Ok(self.get(name)?)
    }

    fn remove_snapshot(&mut self, name: &str) -> Result<bool, BackendError> {
        Ok(self.remove(name)?)
    }

    fn load_history(&self) -> Result<Vec<IssueKey>, BackendError> {
        Ok(self.history()?)
    }

    fn save_history(&mut self, keys: &[IssueKey]) -> Result<(), BackendError> {
        Ok(self.set_history(keys)?)
    }
}
