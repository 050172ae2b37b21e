use super::RecoveryConfig;
use std::time::Duration;

/// How long a saved snapshot stays recoverable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retention {
    pub window: Duration,
}

impl Retention {
    pub const DEFAULT_DAYS: u32 = 5;

    pub fn from_days(days: u32) -> Self {
        Self {
            window: Duration::from_secs(days as u64 * 24 * 60 * 60),
        }
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self::from_days(Self::DEFAULT_DAYS)
    }
}

impl From<&RecoveryConfig> for Retention {
    fn from(config: &RecoveryConfig) -> Self {
        Self::from_days(config.timer_expire_days)
    }
}
