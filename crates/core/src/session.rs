//! Sessions: ordered query sequences representing one user conversation.

use serde::{Deserialize, Serialize};

use crate::query::Query;
use crate::timestamp::Timestamp;

/// An ordered sequence of queries bounded by `start_time`/`end_time`.
///
/// Consecutive queries in a session are candidates for embedding absorption
/// (§4.4) — a query on an embedded child collection immediately following a
/// select on its parent rides for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Start of the session on the workload's monotonic time axis.
    pub start_time: Timestamp,
    /// End of the session on the workload's monotonic time axis.
    pub end_time: Timestamp,
    /// Queries in trace order.
    pub queries: Vec<Query>,
}

impl Session {
    /// Construct a session from its bounds and queries.
    pub fn new(start_time: Timestamp, end_time: Timestamp, queries: Vec<Query>) -> Self {
        Session {
            start_time,
            end_time,
            queries,
        }
    }
}
