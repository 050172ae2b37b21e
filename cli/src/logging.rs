//! File-based logging.
//!
//! Writes to `unitrack.log` in the data directory so that log lines never mix
//! with the interactive prompt. Set `DEBUG_LOGGING=1` to enable debug output
//! for unitrack crates.

use std::path::Path;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "unitrack.log";

/// Initializes logging to `<data_dir>/unitrack.log`.
///
/// Returns a `WorkerGuard` that must be held for the process lifetime so
/// buffered lines are flushed on exit. Falls back to stderr and returns `None`
/// if the directory cannot be created.
pub fn init(data_dir: &Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    if let Err(e) = std::fs::create_dir_all(data_dir) {
        // Subscriber is not installed yet.
        eprintln!(
            "Failed to create log directory {:?}: {}, logging to stderr",
            data_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(
        log_file = ?data_dir.join(LOG_FILE_NAME),
        debug_logging,
        "unitrack logging initialized"
    );

    Some(guard)
}

fn init_stderr_only(debug_logging: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "unitrack logging initialized (stderr only)");
}

fn filter(debug_logging: bool) -> EnvFilter {
    let directive = if debug_logging {
        "info,unitrack=debug,unitrack_core=debug,unitrack_cli=debug"
    } else {
        "info"
    };
    EnvFilter::new(directive)
}
