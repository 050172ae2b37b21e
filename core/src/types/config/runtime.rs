use super::{AppConfig, BackendKind, Retention};
use std::path::PathBuf;

/// Core configuration for opening a recovery store.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
    pub backend: BackendKind,
    pub retention: Retention,
}

impl Config {
    pub fn new(base_path: PathBuf, app: &AppConfig) -> Self {
        Self {
            base_path,
            backend: app.recovery.backend,
            retention: Retention::from(&app.recovery),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("unitrack.redb")
    }

    pub fn snapshots_path(&self) -> PathBuf {
        self.base_path.join("snapshots")
    }

    pub fn history_path(&self) -> PathBuf {
        self.base_path.join("history")
    }
}
