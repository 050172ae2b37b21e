mod logging;
mod repl;
mod sink;
mod worker;

use clap::Parser;
use sink::ConsoleSink;
use std::path::{Path, PathBuf};
use unitrack_core::core::RecoveryStore;
use unitrack_core::types::{AppConfig, Config};
use worker::Request;

#[derive(Parser)]
#[command(version, about = "Personal work timer with crash recovery")]
struct Args {
    /// Directory holding config.toml, saved timers and the log file.
    #[arg(long, env = "UNITRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    let data_dir = args
        .data_dir
        .or_else(|| dirs::config_dir().map(|dir| dir.join("unitrack")))
        .ok_or("error: no data directory; pass --data-dir")?;

    let _log_guard = logging::init(&data_dir);

    let app_config = load_app_config(&data_dir);
    let prefix = app_config.general.prefix.clone();
    let config = Config::new(data_dir, &app_config);

    let store = RecoveryStore::open(&config).map_err(|e| e.to_string())?;
    let (requests, replies, worker) = worker::start(store, Box::new(ConsoleSink), prefix);
    let _ticker = worker::start_ticker(requests.clone());

    let result = repl::run(&requests, &replies);

    let _ = requests.send(Request::Shutdown);
    if worker.join().is_err() {
        tracing::error!("Timer worker panicked");
    }
    tracing::info!("unitrack exiting");
    result
}

/// Loads config.toml, writing the defaults on first run. Invalid values are
/// replaced by their defaults.
fn load_app_config(data_dir: &Path) -> AppConfig {
    let path = AppConfig::path(data_dir);
    if !path.exists() {
        let config = AppConfig::default();
        if let Err(err) = config.save(&path) {
            tracing::warn!(path = ?path, error = %err, "Failed to write default config");
        }
        return config;
    }

    let config = match AppConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = ?path, error = %err, "Failed to load config, using defaults");
            return AppConfig::default();
        }
    };

    let errors = config.validate();
    if errors.is_empty() {
        return config;
    }
    for error in &errors {
        tracing::warn!(path = ?path, "Invalid config: {error}");
    }
    config.with_defaults_for_invalid()
}
