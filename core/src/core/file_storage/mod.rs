//! Plain-file backend: one JSON document per snapshot and a newline-separated
//! history file.

use crate::core::backend::Backend;
use crate::core::backend::error::BackendError;
use crate::types::snapshot::versioned_snapshot::error::DecodeError;
use crate::types::snapshot::versioned_snapshot::{SnapshotVariant, latest_snapshot};
use crate::types::{Config, IssueKey, Snapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod error {
    use crate::types::snapshot::versioned_snapshot::error::DecodeError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum FileStorageError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("Corrupt snapshot: {0}")]
        Corrupt(#[from] DecodeError),
    }
}

use error::FileStorageError;

/// JSON layout of a snapshot file.
#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    schema_version: u8,
    #[serde(flatten)]
    snapshot: latest_snapshot::Snapshot,
}

pub struct FileStorage {
    pub snapshots_path: PathBuf,
    pub history_path: PathBuf,
}

impl FileStorage {
    pub fn new(config: &Config) -> Result<Self, FileStorageError> {
        let snapshots_path = config.snapshots_path();
        fs::create_dir_all(&snapshots_path)?;

        Ok(Self {
            snapshots_path,
            history_path: config.history_path(),
        })
    }

    pub fn snapshot_file_path(&self, name: &str) -> PathBuf {
        self.snapshots_path.join(format!("saved_timer_{name}.json"))
    }
}

/// Writes through a sibling `.tmp` file so a crash never leaves a half-written
/// target behind.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FileStorageError> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if path.exists() {
                fs::remove_file(path)?;
                fs::rename(&tmp_path, path)?;
                Ok(())
            } else {
                Err(rename_err.into())
            }
        }
    }
}

/// Snapshot file operations.
impl FileStorage {
    pub fn write_snapshot(&self, name: &str, snapshot: &Snapshot) -> Result<(), FileStorageError> {
        let file = SnapshotFile {
            schema_version: latest_snapshot::Snapshot::VERSION,
            snapshot: latest_snapshot::Snapshot::from(snapshot),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        write_atomically(&self.snapshot_file_path(name), &bytes)
    }

    pub fn read_snapshot(&self, name: &str) -> Result<Option<Snapshot>, FileStorageError> {
        let data = match fs::read(self.snapshot_file_path(name)) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let file: SnapshotFile = serde_json::from_slice(&data)?;
        if file.schema_version != latest_snapshot::Snapshot::VERSION {
            return Err(DecodeError::UnsupportedVersion(file.schema_version).into());
        }

        Ok(Some(Snapshot::try_from(file.snapshot)?))
    }

    /// Returns `true` if the file existed.
    pub fn remove_snapshot_file(&self, name: &str) -> Result<bool, FileStorageError> {
        match fs::remove_file(self.snapshot_file_path(name)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// History file operations.
impl FileStorage {
    pub fn read_history(&self) -> Result<Vec<IssueKey>, FileStorageError> {
        let content = match fs::read_to_string(&self.history_path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let keys = content
            .lines()
            .filter_map(|line| match IssueKey::try_from(line) {
                Ok(key) => Some(key),
                Err(err) => {
                    if !line.trim().is_empty() {
                        tracing::warn!(line, %err, "Skipping invalid history entry");
                    }
                    None
                }
            })
            .collect();
        Ok(keys)
    }

    pub fn write_history(&self, keys: &[IssueKey]) -> Result<(), FileStorageError> {
        if let Some(parent) = self.history_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = keys
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(&self.history_path, content)?;
        Ok(())
    }
}

impl Backend for FileStorage {
    fn put_snapshot(&mut self, name: &str, snapshot: &Snapshot) -> Result<(), BackendError> {
        Ok(self.write_snapshot(name, snapshot)?)
    }

    fn get_snapshot(&self, name: &str) -> Result<Option<Snapshot>, BackendError> {
        Ok(self.read_snapshot(name)?)
    }

    fn remove_snapshot(&mut self, name: &str) -> Result<bool, BackendError> {
        Ok(self.remove_snapshot_file(name)?)
    }

    fn load_history(&self) -> Result<Vec<IssueKey>, BackendError> {
        Ok(self.read_history()?)
    }

    fn save_history(&mut self, keys: &[IssueKey]) -> Result<(), BackendError> {
        Ok(self.write_history(keys)?)
    }
}
