//! Background worker thread owning the timer engine.
//!
//! User commands and ticks arrive on one channel, so the engine sees them
//! strictly one at a time.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;
use unitrack_core::core::{Backend, RecoveryStore};
use unitrack_core::timer::{
    CompletionSink, Prompt, RecoveryDecision, StartOutcome, TICK_INTERVAL, TickOutcome,
    TimerEngine, TimerState, format_clock,
};
use unitrack_core::types::normalize_issue_key;

pub enum Request {
    /// `issue` is `None` to use the entry recalled from history.
    Start {
        issue: Option<String>,
    },
    /// Bounded start; without `minutes` the limit is asked for.
    Limit {
        issue: String,
        minutes: Option<String>,
    },
    /// Answer to the limit prompt.
    Minutes {
        input: String,
    },
    Pause,
    Resume,
    Submit,
    Cancel,
    Yes,
    No,
    Status,
    History,
    Prev,
    Next,
    Tick,
    Shutdown,
}

/// Starts the worker thread. Every request except `Tick` and `Shutdown` gets
/// exactly one line of text on the returned receiver.
pub fn start<B>(
    store: RecoveryStore<B>,
    sink: Box<dyn CompletionSink + Send>,
    prefix: String,
) -> (Sender<Request>, Receiver<String>, JoinHandle<()>)
where
    B: Backend + Send + 'static,
{
    let (request_tx, request_rx) = mpsc::channel::<Request>();
    let (reply_tx, reply_rx) = mpsc::channel::<String>();

    let handle = thread::spawn(move || {
        let mut worker = Worker::new(TimerEngine::new(store, sink), prefix);
        worker_loop(&mut worker, request_rx, reply_tx);
    });

    (request_tx, reply_rx, handle)
}

/// Sends `Tick` every [`TICK_INTERVAL`] until the worker is gone.
pub fn start_ticker(requests: Sender<Request>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            thread::sleep(TICK_INTERVAL);
            if requests.send(Request::Tick).is_err() {
                break;
            }
        }
    })
}

fn worker_loop<B: Backend>(
    worker: &mut Worker<B>,
    requests: Receiver<Request>,
    replies: Sender<String>,
) {
    for request in requests {
        if matches!(request, Request::Shutdown) {
            tracing::debug!("Worker shutting down");
            break;
        }
        if let Some(reply) = worker.handle(request, SystemTime::now()) {
            let _ = replies.send(reply);
        }
    }
}

pub struct Worker<B: Backend> {
    engine: TimerEngine<B>,
    prefix: String,
}

impl<B: Backend> Worker<B> {
    pub fn new(engine: TimerEngine<B>, prefix: String) -> Self {
        Self { engine, prefix }
    }

    #[cfg(test)]
    pub fn engine(&self) -> &TimerEngine<B> {
        &self.engine
    }

    pub fn handle(&mut self, request: Request, now: SystemTime) -> Option<String> {
        let reply = match request {
            Request::Start { issue } => self.handle_start(issue, now),
            Request::Limit { issue, minutes } => self.handle_limit(&issue, minutes, now),
            Request::Minutes { input } => self.handle_minutes(&input, now),
            Request::Pause => reply_if(self.engine.pause(now), "Paused.", "No running timer."),
            Request::Resume => reply_if(self.engine.resume(now), "Resumed.", "No paused timer."),
            Request::Submit => {
                reply_if(self.engine.submit(now), "Submitted.", "No timer to submit.")
            }
            Request::Cancel => reply_if(
                self.engine.request_cancel(),
                "Cancel the timer and discard its time? [yes/no]",
                "No timer to cancel.",
            ),
            Request::Yes => self.handle_answer(true, now),
            Request::No => self.handle_answer(false, now),
            Request::Status => self.status(),
            Request::History => self.history(),
            Request::Prev => self.recall(true),
            Request::Next => self.recall(false),
            Request::Tick => {
                if self.engine.tick(now) == TickOutcome::Saved {
                    tracing::debug!("Snapshot written");
                }
                return None;
            }
            Request::Shutdown => return None,
        };
        Some(reply)
    }

    fn handle_start(&mut self, issue: Option<String>, now: SystemTime) -> String {
        let issue = match issue {
            Some(issue) => normalize_issue_key(&issue, &self.prefix),
            None => match self.engine.history().recalled() {
                Some(recalled) => recalled.to_string(),
                None => return "Usage: start ISSUE (or recall one with prev/next)".to_string(),
            },
        };

        match self.engine.start(&issue, now) {
            Ok(outcome) => self.describe_start(outcome),
            Err(err) => err.to_string(),
        }
    }

    fn handle_limit(&mut self, issue: &str, minutes: Option<String>, now: SystemTime) -> String {
        let issue = normalize_issue_key(issue, &self.prefix);
        match self.engine.begin_limit_setup(&issue) {
            Ok(true) => {}
            Ok(false) => return self.busy(),
            Err(err) => return err.to_string(),
        }

        match minutes {
            Some(input) => self.handle_minutes(&input, now),
            None => format!("Time limit for {issue} in minutes? (minutes N)"),
        }
    }

    fn handle_minutes(&mut self, input: &str, now: SystemTime) -> String {
        match self.engine.submit_limit(input, now) {
            Ok(StartOutcome::Ignored) => "No limit was asked for.".to_string(),
            Ok(outcome) => self.describe_start(outcome),
            Err(err) => format!("{err}. Enter a positive whole number of minutes."),
        }
    }

    fn describe_start(&self, outcome: StartOutcome) -> String {
        match outcome {
            StartOutcome::Started => self.status(),
            StartOutcome::RecoveryPending => match self.engine.prompt() {
                Some(Prompt::Recovery { snapshot }) => format!(
                    "Found a saved timer for {} at {}. Resume it? [yes/no]",
                    snapshot.issue,
                    format_clock(snapshot.elapsed)
                ),
                _ => self.status(),
            },
            StartOutcome::Ignored => self.busy(),
        }
    }

    /// Why a new timer cannot be set up right now.
    fn busy(&self) -> String {
        match self.engine.prompt() {
            Some(Prompt::Limit { issue }) => {
                format!("A limit for {issue} is already pending. Enter it with: minutes N")
            }
            Some(Prompt::Recovery { snapshot }) => format!(
                "A saved timer for {} is waiting. Answer yes or no first.",
                snapshot.issue
            ),
            Some(Prompt::ConfirmCancel { .. }) => {
                "Cancel is waiting for confirmation. Answer yes or no first.".to_string()
            }
            None => "A timer is already active.".to_string(),
        }
    }

    /// Answers whichever prompt is open.
    fn handle_answer(&mut self, yes: bool, now: SystemTime) -> String {
        enum Open {
            Cancel,
            Limit,
            Recovery,
        }

        let open = match self.engine.prompt() {
            Some(Prompt::ConfirmCancel { .. }) => Open::Cancel,
            Some(Prompt::Limit { .. }) => Open::Limit,
            Some(Prompt::Recovery { .. }) => Open::Recovery,
            None => return "Nothing to answer.".to_string(),
        };

        match (open, yes) {
            (Open::Cancel, true) => {
                self.engine.confirm_cancel();
                "Timer cancelled.".to_string()
            }
            (Open::Cancel, false) => {
                self.engine.abort_cancel(now);
                self.status()
            }
            (Open::Limit, true) => "Enter the limit with: minutes N".to_string(),
            (Open::Limit, false) => {
                self.engine.abort_limit_setup();
                "Limit setup aborted.".to_string()
            }
            (Open::Recovery, yes) => {
                let decision = if yes {
                    RecoveryDecision::Resume
                } else {
                    RecoveryDecision::Discard
                };
                self.engine.resolve_recovery(decision, now);
                self.status()
            }
        }
    }

    pub fn status(&self) -> String {
        let Some(session) = self.engine.session() else {
            return "Idle.".to_string();
        };

        let state = match self.engine.state() {
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Idle => "idle",
        };
        let mut line = format!(
            "{} {} {}",
            session.issue(),
            state,
            format_clock(session.elapsed())
        );
        if let (Some(limit), Some(remaining), Some(progress)) =
            (session.limit(), session.remaining(), session.progress())
        {
            line.push_str(&format!(
                " (limit {} min, {} left, {:.0}% done)",
                limit.minutes(),
                format_clock(remaining),
                progress * 100.0
            ));
        }
        line
    }

    fn history(&self) -> String {
        let history = self.engine.history();
        if history.is_empty() {
            return "No issues yet.".to_string();
        }
        history
            .iter()
            .map(|key| key.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn recall(&mut self, previous: bool) -> String {
        let history = self.engine.history_mut();
        let recalled = if previous {
            history.recall_previous()
        } else {
            history.recall_next()
        };
        match recalled {
            Some(key) => format!("Recalled {key}. Type start to use it."),
            None => "Nothing recalled.".to_string(),
        }
    }
}

fn reply_if(done: bool, ok: &str, noop: &str) -> String {
    let reply = if done { ok } else { noop };
    reply.to_string()
}
