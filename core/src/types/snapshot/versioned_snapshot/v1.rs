use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use super::SnapshotVariant;

#[cfg_attr(test, derive(Eq, PartialEq))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub issue: String,
    pub elapsed: Duration,
    pub started_at: SystemTime,
    pub accumulated_pause: Duration,
    pub saved_at: SystemTime,
    pub limited: bool,
    /// Zero when `limited` is false.
    pub limit: Duration,
}

impl SnapshotVariant for Snapshot {
    const VERSION: u8 = 1;
}
