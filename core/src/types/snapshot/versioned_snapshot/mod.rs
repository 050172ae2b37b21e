use crate::types::snapshot::Snapshot;
use crate::types::{IssueKey, TimeLimit};
use error::DecodeError;
use std::time::Duration;

pub use v1 as latest_snapshot;

pub mod v1;

pub mod error {
    use crate::types::IssueKeyError;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum DecodeError {
        #[error("empty snapshot record")]
        Empty,

        #[error("unsupported snapshot version: {0}")]
        UnsupportedVersion(u8),

        #[error("malformed snapshot record: {0}")]
        Postcard(#[from] postcard::Error),

        #[error("invalid issue key in snapshot: {0}")]
        InvalidIssueKey(#[from] IssueKeyError),

        #[error("limited snapshot has a zero limit")]
        ZeroLimit,
    }
}

pub trait SnapshotVariant {
    const VERSION: u8;
}

/// On-disk snapshot record, tagged with its schema version.
#[derive(Debug, Clone)]
pub enum VersionedSnapshot {
    V1(v1::Snapshot),
}

impl VersionedSnapshot {
    /// Encodes as a version byte followed by the postcard body.
    pub fn encode(&self) -> Result<Vec<u8>, postcard::Error> {
        match self {
            VersionedSnapshot::V1(v1) => postcard::to_extend(v1, vec![v1::Snapshot::VERSION]),
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let (version, data) = data.split_first().ok_or(DecodeError::Empty)?;
        match *version {
            v1::Snapshot::VERSION => {
                let v1 = postcard::from_bytes::<v1::Snapshot>(data)?;
                Ok(VersionedSnapshot::V1(v1))
            }
            version => Err(DecodeError::UnsupportedVersion(version)),
        }
    }

    pub fn into_snapshot(self) -> Result<Snapshot, DecodeError> {
        match self {
            VersionedSnapshot::V1(v1) => Snapshot::try_from(v1),
        }
    }
}

impl From<&Snapshot> for VersionedSnapshot {
    fn from(snapshot: &Snapshot) -> Self {
        VersionedSnapshot::V1(latest_snapshot::Snapshot::from(snapshot))
    }
}

impl From<&Snapshot> for v1::Snapshot {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            issue: snapshot.issue.to_string(),
            elapsed: snapshot.elapsed,
            started_at: snapshot.started_at,
            accumulated_pause: snapshot.accumulated_pause,
            saved_at: snapshot.saved_at,
            limited: snapshot.limit.is_some(),
            limit: snapshot.limit.map(|l| l.duration()).unwrap_or(Duration::ZERO),
        }
    }
}

impl TryFrom<v1::Snapshot> for Snapshot {
    type Error = DecodeError;

    fn try_from(record: v1::Snapshot) -> Result<Self, Self::Error> {
        let limit = if record.limited {
            Some(TimeLimit::try_new(record.limit).map_err(|_| DecodeError::ZeroLimit)?)
        } else {
            None
        };

        Ok(Self {
            issue: IssueKey::try_from(record.issue)?,
            elapsed: record.elapsed,
            started_at: record.started_at,
            accumulated_pause: record.accumulated_pause,
            saved_at: record.saved_at,
            limit,
        })
    }
}
