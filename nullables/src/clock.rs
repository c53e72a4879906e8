//! Nullable clock: deterministic consensus time for testing.

use hbar_types::ConsensusTimestamp;
use std::sync::atomic::{AtomicU64, Ordering};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A deterministic clock for testing.
///
/// Time only advances through [`advance`](Self::advance), or by one
/// microsecond per [`tick`](Self::tick) so consecutive consensus timestamps
/// stay distinct.
pub struct NullClock {
    nanos: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            nanos: AtomicU64::new(initial_secs * NANOS_PER_SEC),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> ConsensusTimestamp {
        to_timestamp(self.nanos.load(Ordering::SeqCst))
    }

    /// Return the current time, then step forward one microsecond.
    pub fn tick(&self) -> ConsensusTimestamp {
        to_timestamp(self.nanos.fetch_add(1_000, Ordering::SeqCst))
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.nanos.fetch_add(secs * NANOS_PER_SEC, Ordering::SeqCst);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

fn to_timestamp(nanos: u64) -> ConsensusTimestamp {
    ConsensusTimestamp::new((nanos / NANOS_PER_SEC) as i64, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_strictly_increasing() {
        let clock = NullClock::new(10);
        let a = clock.tick();
        let b = clock.tick();
        assert!(b > a);
        assert_eq!(a, ConsensusTimestamp::new(10, 0));
        assert_eq!(b, ConsensusTimestamp::new(10, 1_000));
    }

    #[test]
    fn advance_moves_now() {
        let clock = NullClock::new(10);
        clock.advance(5);
        assert_eq!(clock.now(), ConsensusTimestamp::new(15, 0));
        assert_eq!(clock.tick(), ConsensusTimestamp::new(15, 0));
    }
}
