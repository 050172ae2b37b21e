mod app;
mod runtime;
mod retention;

pub use app::{AppConfig, AppConfigError, BackendKind, GeneralConfig, RecoveryConfig};
pub use runtime::Config;
pub use retention::Retention;
