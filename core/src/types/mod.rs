pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, BackendKind, Config, GeneralConfig, RecoveryConfig, Retention,
};

pub(crate) mod key;
pub use key::{IssueKey, IssueKeyError, MAX_ISSUE_KEY_LENGTH, normalize_issue_key};

pub(crate) mod limit;
pub use limit::TimeLimit;
pub use limit::error::LimitError;

pub(crate) mod snapshot;
pub use snapshot::Snapshot;
pub use snapshot::versioned_snapshot::error::DecodeError;

pub(crate) mod history;
pub use history::IssueHistory;
