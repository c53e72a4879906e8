//! Consensus timestamps.
//!
//! The network orders topic messages by consensus time, expressed as seconds
//! and nanoseconds since the Unix epoch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::HbarError;

/// A consensus timestamp with nanosecond resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConsensusTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl ConsensusTimestamp {
    /// The epoch; used as "from the beginning of history".
    pub const EPOCH: Self = Self { seconds: 0, nanos: 0 };

    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Current wall-clock time. Falls back to the epoch if the system clock
    /// is set before 1970.
    pub fn now() -> Self {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            seconds: elapsed.as_secs() as i64,
            nanos: elapsed.subsec_nanos(),
        }
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i128 {
        self.seconds as i128 * 1_000_000_000 + self.nanos as i128
    }
}

/// Renders as `"<seconds>.<nanos>"` with nanos zero-padded to nine digits.
impl fmt::Display for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for ConsensusTimestamp {
    type Err = HbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HbarError::InvalidTimestamp(s.to_string());
        let (seconds, nanos) = s.split_once('.').unwrap_or((s, "0"));
        if nanos.is_empty() || nanos.len() > 9 || !nanos.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
        let nanos: u32 = format!("{nanos:0<9}").parse().map_err(|_| invalid())?;
        Ok(Self { seconds, nanos })
    }
}
