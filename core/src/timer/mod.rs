//! The timer state machine.
//!
//! Every operation takes the current wall-clock time; the engine never reads a
//! clock itself. Running sessions are snapshotted to the [`RecoveryStore`]
//! every [`SAVE_INTERVAL`] and the snapshot is offered back on the next start
//! of the same issue.

use crate::core::{Backend, RecoveryStore};
use crate::types::{IssueHistory, IssueKey, IssueKeyError, LimitError, Snapshot, TimeLimit};
use error::EngineError;
use std::mem;
use std::time::{Duration, SystemTime};

pub mod billing;
pub mod session;
pub mod sink;

pub use billing::{BillableTime, format_clock};
pub use session::{Phase, Session};
pub use sink::{Completion, CompletionSink, Trigger};

/// How often the front end is expected to call [`TimerEngine::tick`].
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Running time between two snapshots.
pub const SAVE_INTERVAL: Duration = Duration::from_secs(60);

pub mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("Invalid issue key: {0}")]
        InvalidIssueKey(#[from] IssueKeyError),

        #[error("Invalid limit: {0}")]
        InvalidLimit(#[from] LimitError),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A live snapshot exists; call [`TimerEngine::resolve_recovery`].
    RecoveryPending,
    /// The engine was not idle.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryDecision {
    Resume,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No running session.
    Ignored,
    Advanced,
    Saved,
    AutoCompleted,
}

/// A decision the engine is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt<'a> {
    ConfirmCancel { session: &'a Session },
    Limit { issue: &'a IssueKey },
    Recovery { snapshot: &'a Snapshot },
}

enum Mode {
    Idle,
    Active(Session),
    ConfirmingCancel(Session),
    AwaitingLimit {
        issue: IssueKey,
    },
    AwaitingRecovery {
        snapshot: Snapshot,
        requested_limit: Option<TimeLimit>,
    },
}

pub struct TimerEngine<B: Backend> {
    store: RecoveryStore<B>,
    history: IssueHistory,
    sink: Box<dyn CompletionSink + Send>,
    mode: Mode,
}

impl<B: Backend> TimerEngine<B> {
    /// Creates an idle engine, loading the issue history from `store`.
    pub fn new(store: RecoveryStore<B>, sink: Box<dyn CompletionSink + Send>) -> Self {
        let history = store.load_history();
        Self {
            store,
            history,
            sink,
            mode: Mode::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        match self.session() {
            None => TimerState::Idle,
            Some(session) if session.is_running() => TimerState::Running,
            Some(_) => TimerState::Paused,
        }
    }

    /// The current session, including one awaiting cancel confirmation.
    pub fn session(&self) -> Option<&Session> {
        match &self.mode {
            Mode::Active(session) | Mode::ConfirmingCancel(session) => Some(session),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Option<Prompt<'_>> {
        match &self.mode {
            Mode::Idle | Mode::Active(_) => None,
            Mode::ConfirmingCancel(session) => Some(Prompt::ConfirmCancel { session }),
            Mode::AwaitingLimit { issue } => Some(Prompt::Limit { issue }),
            Mode::AwaitingRecovery { snapshot, .. } => Some(Prompt::Recovery { snapshot }),
        }
    }

    pub fn history(&self) -> &IssueHistory {
        &self.history
    }

    /// For recall navigation only; recorded keys are persisted by the engine.
    pub fn history_mut(&mut self) -> &mut IssueHistory {
        &mut self.history
    }

    pub fn store(&self) -> &RecoveryStore<B> {
        &self.store
    }
}

/// Starting a session.
impl<B: Backend> TimerEngine<B> {
    pub fn start(&mut self, issue: &str, now: SystemTime) -> Result<StartOutcome, EngineError> {
        let issue = IssueKey::try_from(issue)?;
        if !matches!(self.mode, Mode::Idle) {
            return Ok(StartOutcome::Ignored);
        }
        Ok(self.open_session(issue, None, now))
    }

    pub fn start_bounded(
        &mut self,
        issue: &str,
        limit: TimeLimit,
        now: SystemTime,
    ) -> Result<StartOutcome, EngineError> {
        let issue = IssueKey::try_from(issue)?;
        if !matches!(self.mode, Mode::Idle) {
            return Ok(StartOutcome::Ignored);
        }
        Ok(self.open_session(issue, Some(limit), now))
    }

    /// Enters the limit prompt for `issue`. Returns `false` if not idle.
    pub fn begin_limit_setup(&mut self, issue: &str) -> Result<bool, EngineError> {
        let issue = IssueKey::try_from(issue)?;
        if !matches!(self.mode, Mode::Idle) {
            return Ok(false);
        }
        tracing::debug!(issue = %issue, "Awaiting limit");
        self.mode = Mode::AwaitingLimit { issue };
        Ok(true)
    }

    /// Parses the minutes typed at the limit prompt and starts a bounded
    /// session. Invalid input keeps the prompt open.
    pub fn submit_limit(
        &mut self,
        input: &str,
        now: SystemTime,
    ) -> Result<StartOutcome, EngineError> {
        if !matches!(self.mode, Mode::AwaitingLimit { .. }) {
            return Ok(StartOutcome::Ignored);
        }
        let limit = TimeLimit::from_minutes_input(input)?;

        let Mode::AwaitingLimit { issue } = mem::replace(&mut self.mode, Mode::Idle) else {
            return Ok(StartOutcome::Ignored);
        };
        Ok(self.open_session(issue, Some(limit), now))
    }

    pub fn abort_limit_setup(&mut self) -> bool {
        if !matches!(self.mode, Mode::AwaitingLimit { .. }) {
            return false;
        }
        self.mode = Mode::Idle;
        true
    }

    /// Answers the resume/discard prompt.
    pub fn resolve_recovery(&mut self, decision: RecoveryDecision, now: SystemTime) -> bool {
        if !matches!(self.mode, Mode::AwaitingRecovery { .. }) {
            return false;
        }
        let Mode::AwaitingRecovery {
            snapshot,
            requested_limit,
        } = mem::replace(&mut self.mode, Mode::Idle)
        else {
            return false;
        };

        let session = match decision {
            RecoveryDecision::Resume => {
                tracing::info!(
                    issue = %snapshot.issue,
                    elapsed = ?snapshot.elapsed,
                    "Resuming saved timer"
                );
                Session::resumed(snapshot, now)
            }
            RecoveryDecision::Discard => {
                tracing::info!(issue = %snapshot.issue, "Discarding saved timer");
                self.store.delete(&snapshot.issue);
                Session::fresh(snapshot.issue, requested_limit, now)
            }
        };
        self.begin(session);
        true
    }

    fn open_session(
        &mut self,
        issue: IssueKey,
        limit: Option<TimeLimit>,
        now: SystemTime,
    ) -> StartOutcome {
        if let Some(snapshot) = self.store.load(&issue, now) {
            tracing::info!(issue = %issue, "Found saved timer");
            self.mode = Mode::AwaitingRecovery {
                snapshot,
                requested_limit: limit,
            };
            return StartOutcome::RecoveryPending;
        }

        self.begin(Session::fresh(issue, limit, now));
        StartOutcome::Started
    }

    fn begin(&mut self, session: Session) {
        let issue = session.issue().clone();
        if self.history.record(issue.clone()) {
            self.store.save_history(&self.history);
        }
        self.history.reset_recall();

        match session.limit() {
            Some(limit) => {
                tracing::info!(issue = %issue, limit_minutes = limit.minutes(), "Timer started")
            }
            None => tracing::info!(issue = %issue, "Timer started"),
        }
        self.mode = Mode::Active(session);
    }
}

/// Running a session.
impl<B: Backend> TimerEngine<B> {
    /// Advances a running session: auto-completes a bounded session that
    /// reached its limit, otherwise saves a snapshot when one is due.
    pub fn tick(&mut self, now: SystemTime) -> TickOutcome {
        let Mode::Active(session) = &mut self.mode else {
            return TickOutcome::Ignored;
        };
        if !session.is_running() {
            return TickOutcome::Ignored;
        }

        session.refresh(now);
        if session.limit_reached() {
            self.finish(Trigger::Auto);
            return TickOutcome::AutoCompleted;
        }

        if session.save_due(now) {
            self.store.save(&session.snapshot(now));
            session.mark_saved(now);
            return TickOutcome::Saved;
        }
        TickOutcome::Advanced
    }

    pub fn pause(&mut self, now: SystemTime) -> bool {
        let Mode::Active(session) = &mut self.mode else {
            return false;
        };
        let paused = session.pause(now);
        if paused {
            tracing::debug!(issue = %session.issue(), elapsed = ?session.elapsed(), "Timer paused");
        }
        paused
    }

    pub fn resume(&mut self, now: SystemTime) -> bool {
        let Mode::Active(session) = &mut self.mode else {
            return false;
        };
        let resumed = session.resume(now);
        if resumed {
            tracing::debug!(issue = %session.issue(), "Timer resumed");
        }
        resumed
    }

    /// Books the session: rounds it, deletes its snapshot and hands the
    /// completion to the sink.
    pub fn submit(&mut self, now: SystemTime) -> bool {
        let Mode::Active(session) = &mut self.mode else {
            return false;
        };
        session.refresh(now);
        self.finish(Trigger::Manual);
        true
    }

    fn finish(&mut self, trigger: Trigger) {
        let Mode::Active(session) = mem::replace(&mut self.mode, Mode::Idle) else {
            return;
        };
        let elapsed = session.elapsed();
        let issue = session.into_issue();
        self.store.delete(&issue);

        let completion = Completion {
            billable: BillableTime::from_elapsed(elapsed),
            issue,
            elapsed,
            trigger,
        };
        tracing::info!(
            issue = %completion.issue,
            elapsed = %format_clock(elapsed),
            billable = %completion.billable,
            ?trigger,
            "Timer completed"
        );
        self.sink.complete(completion);
    }
}

/// Cancelling a session.
impl<B: Backend> TimerEngine<B> {
    /// Discards the session and its snapshot without booking anything.
    pub fn cancel(&mut self) -> bool {
        if !matches!(self.mode, Mode::Active(_) | Mode::ConfirmingCancel(_)) {
            return false;
        }
        let (Mode::Active(session) | Mode::ConfirmingCancel(session)) =
            mem::replace(&mut self.mode, Mode::Idle)
        else {
            return false;
        };
        self.store.delete(session.issue());
        tracing::info!(issue = %session.issue(), elapsed = ?session.elapsed(), "Timer cancelled");
        true
    }

    /// Asks for confirmation before cancelling. Ticks are ignored meanwhile.
    pub fn request_cancel(&mut self) -> bool {
        if !matches!(self.mode, Mode::Active(_)) {
            return false;
        }
        let Mode::Active(session) = mem::replace(&mut self.mode, Mode::Idle) else {
            return false;
        };
        self.mode = Mode::ConfirmingCancel(session);
        true
    }

    pub fn confirm_cancel(&mut self) -> bool {
        if !matches!(self.mode, Mode::ConfirmingCancel(_)) {
            return false;
        }
        self.cancel()
    }

    /// Returns to the session as it was; a running session kept accruing.
    pub fn abort_cancel(&mut self, now: SystemTime) -> bool {
        if !matches!(self.mode, Mode::ConfirmingCancel(_)) {
            return false;
        }
        let Mode::ConfirmingCancel(mut session) = mem::replace(&mut self.mode, Mode::Idle) else {
            return false;
        };
        session.refresh(now);
        self.mode = Mode::Active(session);
        true
    }
}
