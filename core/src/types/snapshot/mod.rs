//! Durable surrogate of an in-progress timer session.

use crate::types::{IssueKey, TimeLimit};
use std::time::{Duration, SystemTime};

pub(crate) mod versioned_snapshot;

/// Point-in-time record of a running session, used to resume after a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub issue: IssueKey,
    /// Elapsed time at the moment of saving.
    pub elapsed: Duration,
    pub started_at: SystemTime,
    pub accumulated_pause: Duration,
    pub saved_at: SystemTime,
    pub limit: Option<TimeLimit>,
}

impl Snapshot {
    /// A snapshot is expired once strictly more than `retention` has passed
    /// since it was saved. A `saved_at` in the future never expires.
    pub fn is_expired(&self, now: SystemTime, retention: Duration) -> bool {
        match now.duration_since(self.saved_at) {
            Ok(age) => age > retention,
            Err(_) => false,
        }
    }
}
