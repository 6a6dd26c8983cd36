//! The workload: an ordered trace of sessions sampled from production
//! traffic (or, in tests, synthesized directly).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::timestamp::Timestamp;

/// An ordered sequence of sessions, sorted by `start_time`.
///
/// Immutable once constructed. `sub_workload` and `sessions_in` produce new
/// `Workload` views rather than mutating in place — per-collection share
/// ratios are always *computed* from whatever session set a given `Workload`
/// wraps, so a view automatically reflects its own subset without any extra
/// bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    sessions: Vec<Session>,
}

impl Workload {
    /// Build a workload from sessions, sorting them by `start_time`.
    pub fn new(mut sessions: Vec<Session>) -> Self {
        sessions.sort_by_key(|s| s.start_time);
        Workload { sessions }
    }

    /// An empty workload of the same shape — the peer-construction method
    /// used to build up time-slice sub-workloads one session at a time.
    pub fn factory(&self) -> Workload {
        Workload {
            sessions: Vec::new(),
        }
    }

    /// Append a session, preserving sort order by `start_time`.
    ///
    /// Segment construction (skew cost, §4.4) appends sessions in trace
    /// order, which is already start_time order, so this is O(1) amortized
    /// rather than a full re-sort.
    pub fn add_session(&mut self, session: Session) {
        self.sessions.push(session);
    }

    /// The sessions, in `start_time` order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of sessions in this workload.
    pub fn length(&self) -> usize {
        self.sessions.len()
    }

    /// True if the workload has no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The ordered sub-view of sessions whose `end_time <= end` and
    /// `start_time >= start`.
    pub fn sessions_in(&self, start: Timestamp, end: Timestamp) -> Workload {
        let subset: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| s.start_time >= start && s.end_time <= end)
            .cloned()
            .collect();
        Workload { sessions: subset }
    }

    /// A workload-shaped view over exactly the given sessions (already
    /// selected by the caller), re-sorted by `start_time`.
    pub fn sub_workload(&self, sessions: Vec<Session>) -> Workload {
        Workload::new(sessions)
    }

    /// Fraction of queries in this workload that target each collection —
    /// recomputed from whichever sessions this `Workload` currently wraps.
    pub fn collection_shares(&self) -> HashMap<String, f64> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut total = 0u64;
        for session in &self.sessions {
            for query in &session.queries {
                *counts.entry(query.collection.clone()).or_insert(0) += 1;
                total += 1;
            }
        }
        if total == 0 {
            return HashMap::new();
        }
        counts
            .into_iter()
            .map(|(col, n)| (col, n as f64 / total as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;

    fn session(start: u64, end: u64, queries: Vec<Query>) -> Session {
        Session::new(Timestamp::from_ticks(start), Timestamp::from_ticks(end), queries)
    }

    #[test]
    fn new_sorts_by_start_time() {
        let w = Workload::new(vec![
            session(10, 12, vec![]),
            session(1, 3, vec![]),
            session(5, 6, vec![]),
        ]);
        let starts: Vec<_> = w.sessions().iter().map(|s| s.start_time.ticks()).collect();
        assert_eq!(starts, vec![1, 5, 10]);
    }

    #[test]
    fn sessions_in_filters_by_bounds() {
        let w = Workload::new(vec![
            session(0, 5, vec![]),
            session(5, 10, vec![]),
            session(10, 15, vec![]),
        ]);
        let view = w.sessions_in(Timestamp::from_ticks(5), Timestamp::from_ticks(10));
        assert_eq!(view.length(), 1);
        assert_eq!(view.sessions()[0].start_time.ticks(), 5);
    }

    #[test]
    fn factory_is_empty_and_independent() {
        let w = Workload::new(vec![session(0, 1, vec![])]);
        let mut peer = w.factory();
        assert!(peer.is_empty());
        peer.add_session(session(2, 3, vec![]));
        assert_eq!(w.length(), 1);
        assert_eq!(peer.length(), 1);
    }

    #[test]
    fn collection_shares_recomputed_per_view() {
        use crate::query::OperationType;
        let q_a = Query::with_predicates("a", OperationType::Select, vec![]);
        let q_b = Query::with_predicates("b", OperationType::Select, vec![]);
        let full = Workload::new(vec![
            session(0, 1, vec![q_a.clone(), q_b.clone()]),
            session(1, 2, vec![q_a.clone()]),
        ]);
        let shares = full.collection_shares();
        assert!((shares["a"] - 2.0 / 3.0).abs() < 1e-9);
        assert!((shares["b"] - 1.0 / 3.0).abs() < 1e-9);

        let view = full.sessions_in(Timestamp::from_ticks(0), Timestamp::from_ticks(1));
        let view_shares = view.collection_shares();
        assert_eq!(view_shares["a"], 1.0);
        assert!(!view_shares.contains_key("b"));
    }
}
