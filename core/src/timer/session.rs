//! Clock bookkeeping of a single timer session.

use crate::timer::SAVE_INTERVAL;
use crate::types::{IssueKey, Snapshot, TimeLimit};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused { since: SystemTime },
}

/// An active or paused timer.
///
/// `elapsed` is derived from wall-clock instants while running and frozen while
/// paused. It never goes negative and never exceeds the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    issue: IssueKey,
    phase: Phase,
    started_at: SystemTime,
    accumulated_pause: Duration,
    elapsed: Duration,
    limit: Option<TimeLimit>,
    last_saved_at: SystemTime,
}

impl Session {
    pub(crate) fn fresh(issue: IssueKey, limit: Option<TimeLimit>, now: SystemTime) -> Self {
        Self {
            issue,
            phase: Phase::Running,
            started_at: now,
            accumulated_pause: Duration::ZERO,
            elapsed: Duration::ZERO,
            limit,
            last_saved_at: now,
        }
    }

    /// Continues from a snapshot, rebasing the start so that `elapsed` picks up
    /// where the snapshot left off.
    pub(crate) fn resumed(snapshot: Snapshot, now: SystemTime) -> Self {
        let started_at = now.checked_sub(snapshot.elapsed).unwrap_or(now);
        let mut session = Self {
            issue: snapshot.issue,
            phase: Phase::Running,
            started_at,
            accumulated_pause: Duration::ZERO,
            elapsed: snapshot.elapsed,
            limit: snapshot.limit,
            last_saved_at: now,
        };
        session.clamp();
        session
    }

    /// Recomputes `elapsed` from `now`. No-op while paused.
    pub(crate) fn refresh(&mut self, now: SystemTime) {
        if self.phase != Phase::Running {
            return;
        }
        let wall = now.duration_since(self.started_at).unwrap_or(Duration::ZERO);
        self.elapsed = wall.saturating_sub(self.accumulated_pause);
        self.clamp();
    }

    fn clamp(&mut self) {
        if let Some(limit) = self.limit {
            self.elapsed = self.elapsed.min(limit.duration());
        }
    }

    pub(crate) fn pause(&mut self, now: SystemTime) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.refresh(now);
        self.phase = Phase::Paused { since: now };
        true
    }

    pub(crate) fn resume(&mut self, now: SystemTime) -> bool {
        let Phase::Paused { since } = self.phase else {
            return false;
        };
        let paused_for = now.duration_since(since).unwrap_or(Duration::ZERO);
        self.accumulated_pause += paused_for;
        // The save clock counts running time only.
        self.last_saved_at = self
            .last_saved_at
            .checked_add(paused_for)
            .unwrap_or(self.last_saved_at);
        self.phase = Phase::Running;
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed >= limit.duration())
    }

    /// A clock that moved backwards never triggers a save.
    pub(crate) fn save_due(&self, now: SystemTime) -> bool {
        now.duration_since(self.last_saved_at)
            .is_ok_and(|since| since >= SAVE_INTERVAL)
    }

    pub(crate) fn snapshot(&self, now: SystemTime) -> Snapshot {
        Snapshot {
            issue: self.issue.clone(),
            elapsed: self.elapsed,
            started_at: self.started_at,
            accumulated_pause: self.accumulated_pause,
            saved_at: now,
            limit: self.limit,
        }
    }

    pub(crate) fn mark_saved(&mut self, now: SystemTime) {
        self.last_saved_at = now;
    }

    pub(crate) fn into_issue(self) -> IssueKey {
        self.issue
    }
}

/// Accessors.
impl Session {
    pub fn issue(&self) -> &IssueKey {
        &self.issue
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    pub fn accumulated_pause(&self) -> Duration {
        self.accumulated_pause
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn limit(&self) -> Option<TimeLimit> {
        self.limit
    }

    pub fn last_saved_at(&self) -> SystemTime {
        self.last_saved_at
    }

    /// Time left before a bounded session completes.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.duration().saturating_sub(self.elapsed))
    }

    /// Fraction of the limit used, in `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        self.limit.map(|limit| self.elapsed.as_secs_f64() / limit.duration().as_secs_f64())
    }
}
