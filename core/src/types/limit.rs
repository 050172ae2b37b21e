use nutype::nutype;
use std::time::Duration;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum LimitError {
        #[error("limit is empty")]
        Empty,

        #[error("limit is not a whole number of minutes")]
        NotANumber,

        #[error("limit must be a positive number of minutes")]
        NotPositive,

        #[error("limit is too large")]
        TooLarge,
    }
}

use error::LimitError;

/// Maximum duration of a bounded session. Never zero.
#[nutype(
    validate(predicate = |limit| !limit.is_zero()),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Into,
        Serialize,
        Deserialize,
    )
)]
pub struct TimeLimit(Duration);

impl TimeLimit {
    pub fn from_minutes(minutes: u64) -> Result<Self, LimitError> {
        let secs = minutes.checked_mul(60).ok_or(LimitError::TooLarge)?;
        Self::try_new(Duration::from_secs(secs)).map_err(|_| LimitError::NotPositive)
    }

    /// Parses the minutes a user typed into the limit prompt.
    pub fn from_minutes_input(input: &str) -> Result<Self, LimitError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LimitError::Empty);
        }

        let minutes: i64 = input.parse().map_err(|_| LimitError::NotANumber)?;
        if minutes <= 0 {
            return Err(LimitError::NotPositive);
        }

        Self::from_minutes(minutes as u64)
    }

    pub fn duration(&self) -> Duration {
        *self.as_ref()
    }

    /// Whole minutes, rounded down.
    pub fn minutes(&self) -> u64 {
        self.duration().as_secs() / 60
    }
}
