//! Completion side effects: the submission log line and, for bounded sessions,
//! a terminal notification.

use std::io::Write;
use std::thread;
use unitrack_core::timer::{Completion, CompletionSink, Trigger, format_clock};

/// Reports completions from a detached thread so the worker never waits on
/// the terminal.
pub struct ConsoleSink;

impl CompletionSink for ConsoleSink {
    fn complete(&self, completion: Completion) {
        thread::spawn(move || report(&completion));
    }
}

fn report(completion: &Completion) {
    let label = submission_label(completion.trigger);
    tracing::info!(
        "{label} {} elapsed={} rounded={}",
        completion.issue,
        format_clock(completion.elapsed),
        completion.billable
    );

    let mut stdout = std::io::stdout().lock();
    let result = match completion.trigger {
        Trigger::Manual => writeln!(stdout, "{}", summary(completion)),
        Trigger::Auto => write!(
            stdout,
            "\n{}\n{}",
            summary(completion),
            notification(completion)
        ),
    }
    .and_then(|()| stdout.flush());

    if let Err(err) = result {
        tracing::warn!(issue = %completion.issue, error = %err, "Failed to report completion");
    }
}

fn submission_label(trigger: Trigger) -> &'static str {
    match trigger {
        Trigger::Manual => "SUBMIT ISSUE",
        Trigger::Auto => "AUTO-SUBMIT ISSUE",
    }
}

pub fn summary(completion: &Completion) -> String {
    format!(
        "{} {}: {} tracked, {} booked",
        submission_label(completion.trigger),
        completion.issue,
        format_clock(completion.elapsed),
        completion.billable
    )
}

/// OSC 9 desktop notification, understood by most terminal emulators.
pub fn notification(completion: &Completion) -> String {
    format!(
        "\x1b]9;Time limit reached for {} ({})\x07",
        completion.issue, completion.billable
    )
}
