//! Skew cost: penalizes designs whose routing quality varies across time,
//! rather than being uniformly good or uniformly bad.

use rayon::prelude::*;

use advisor_core::{Catalog, Deadline, Design, Workload};

use crate::network::partial_network_cost;

/// Split `workload` into `skew_intervals - 1` time-equal segments by
/// `end_time`, in session-trace order (§4.4 `Skew(D, W')`).
///
/// A session is assigned to the segment it is consumed under; when its
/// `end_time` first exceeds the current threshold, the in-progress segment
/// is closed and the threshold advances by one interval width — at most one
/// advance per session, exactly mirroring the source's single `if` check
/// (a session whose `end_time` jumps arbitrarily far ahead still only closes
/// one segment, never several at once). The trailing (possibly partial)
/// segment absorbs whatever sessions remain after the loop ends.
pub fn segment_workload(workload: &Workload, skew_intervals: u32) -> Vec<Workload> {
    let sessions = workload.sessions();
    if sessions.is_empty() {
        return Vec::new();
    }

    let start = sessions[0].start_time.ticks() as f64;
    let end = sessions[sessions.len() - 1].end_time.ticks() as f64;
    let segment_count = skew_intervals.saturating_sub(1).max(1);
    let width = (end - start) / segment_count as f64;

    let mut segments = Vec::new();
    let mut current = workload.factory();
    let mut threshold = start + width;

    for session in sessions {
        if session.end_time.ticks() as f64 > threshold {
            threshold += width;
            segments.push(current);
            current = workload.factory();
        }
        current.add_session(session.clone());
    }
    segments.push(current);
    segments
}

/// Skew cost over the whole workload (§4.4 `Skew(D)`).
///
/// Zero when the workload is empty. Otherwise each segment contributes
/// `(1 - net_i) * qc_i`, aggregated and divided by the total processed-query
/// count across all segments (zero if that total is itself zero).
///
/// `deadline` is checked before each segment is evaluated (§5 "between
/// parallel skew-segment evaluations") and again inside every segment's own
/// session loop, since `partial_network_cost` takes it too — a segment
/// already in flight when the deadline passes still stops at its own
/// session boundary rather than running to completion.
pub fn skew_cost(
    design: &Design,
    catalog: &Catalog,
    workload: &Workload,
    nodes: u32,
    skew_intervals: u32,
    deadline: &Deadline,
) -> f64 {
    if workload.is_empty() {
        return 0.0;
    }

    // Segments are independent (§5 "Segment evaluation inside skew cost is
    // embarrassingly parallel across time segments"): each one only reads
    // `design`/`catalog`, which are immutable and `Sync`, so fanning the
    // per-segment network-cost walk out across a `rayon` pool changes
    // nothing about the result, only how it's computed.
    let segments = segment_workload(workload, skew_intervals);
    let segment_costs: Vec<(f64, u64)> = segments
        .par_iter()
        .map(|segment| {
            if deadline.expired() {
                return (0.0, 0);
            }
            partial_network_cost(design, catalog, segment.sessions(), nodes, deadline)
        })
        .collect();

    let mut sum_intervals = 0.0f64;
    let mut sum_query_counts = 0u64;
    for (net, qc) in &segment_costs {
        let skew = 1.0 - net;
        sum_intervals += skew * (*qc as f64);
        sum_query_counts += qc;
    }

    if sum_query_counts == 0 {
        0.0
    } else {
        sum_intervals / sum_query_counts as f64
    }
}
