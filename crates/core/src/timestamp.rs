//! Monotonic session timestamps.
//!
//! Sessions carry `start_time`/`end_time` that only need to be mutually
//! orderable — the advisor never interprets them as wall-clock time, only
//! as a monotonic axis for windowing (`sessions_in`) and skew segmentation.

use serde::{Deserialize, Serialize};

/// A monotonic tick on the workload's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The earliest representable timestamp.
    pub const MIN: Timestamp = Timestamp(0);

    /// Construct a timestamp from a raw tick count.
    pub fn from_ticks(ticks: u64) -> Self {
        Timestamp(ticks)
    }

    /// The raw tick count.
    pub fn ticks(self) -> u64 {
        self.0
    }

    /// Distance to another timestamp, saturating at zero if `other` precedes `self`.
    pub fn saturating_sub(self, other: Timestamp) -> u64 {
        self.0.saturating_sub(other.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
