//! Delivery of completed time entries.

use crate::timer::billing::BillableTime;
use crate::types::IssueKey;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user submitted.
    Manual,
    /// A bounded session reached its limit.
    Auto,
}

/// A finished session, ready to be booked against its issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub issue: IssueKey,
    pub elapsed: Duration,
    pub billable: BillableTime,
    pub trigger: Trigger,
}

/// Receives completions after the engine has cleared the session.
///
/// Implementations must not block for long; failures are theirs to log.
pub trait CompletionSink {
    fn complete(&self, completion: Completion);
}

impl CompletionSink for mpsc::Sender<Completion> {
    fn complete(&self, completion: Completion) {
        if let Err(err) = self.send(completion) {
            tracing::warn!(issue = %err.0.issue, "Completion receiver is gone");
        }
    }
}
