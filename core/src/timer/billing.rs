//! Rounding of elapsed time to the 15-minute billing quantum.

use std::fmt;
use std::time::Duration;

pub const QUANTUM_MINUTES: u64 = 15;

const QUANTUM_MS: u128 = QUANTUM_MINUTES as u128 * 60 * 1000;

/// Elapsed times within this margin below a quantum boundary round down.
const GRACE_MS: u128 = 60;

/// Elapsed time rounded up to a whole number of quanta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BillableTime {
    minutes: u64,
}

impl BillableTime {
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let quarters = (elapsed.as_millis() + QUANTUM_MS - GRACE_MS) / QUANTUM_MS;
        let minutes = u64::try_from(quarters)
            .unwrap_or(u64::MAX / QUANTUM_MINUTES)
            .saturating_mul(QUANTUM_MINUTES);
        Self { minutes }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes.saturating_mul(60))
    }
}

/// `H:MM`
impl fmt::Display for BillableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Renders a duration as `HH:MM:SS`.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
