//! Disk cost: estimates page I/O given index memory pressure and an
//! approximated per-collection working set.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use advisor_core::{Catalog, Deadline, Design, OperationType, Query, Workload};

use crate::config::CostModelConfig;
use crate::rng::seeded_rng;

/// Sentinel cost returned when the index memory requirement exceeds the
/// configured memory budget (§7 `BudgetExhausted`). Not an error — a value
/// large enough that any weighted combination excludes the design.
pub const BUDGET_EXHAUSTED_SENTINEL: f64 = 1e13;

/// Estimated bytes of memory the design's indexes (plus each collection's
/// implicit primary-key index) require.
///
/// Every collection in the design pays `tuple_count * avg_doc_size` for its
/// primary index, plus `tuple_count * effective_address_size * arity` per
/// secondary index.
fn index_memory(design: &Design, catalog: &Catalog) -> f64 {
    let mut memory = 0.0f64;
    for collection in design.collections() {
        let Ok(schema) = catalog.collection(collection) else {
            continue;
        };
        memory += schema.tuple_count as f64 * schema.avg_doc_size;
    }
    memory
}

fn secondary_index_memory(design: &Design, catalog: &Catalog, effective_address_size: f64) -> f64 {
    let mut memory = 0.0f64;
    for collection in design.collections() {
        let Ok(schema) = catalog.collection(collection) else {
            continue;
        };
        for index in design.indexes_for(collection) {
            memory += schema.tuple_count as f64 * effective_address_size * index.len() as f64;
        }
    }
    memory
}

/// Per-collection resident-percentage estimate in `[0, 100]` (§4.4 "Working-set
/// estimation").
///
/// Collections are processed in descending `workload_share` order. Each
/// collection's initial budget is `capacity * share`; if its full footprint
/// fits, it goes 100% resident and the surplus joins a shared buffer,
/// otherwise it gets a partial percentage and is queued on a need-list. A
/// second pass redistributes the buffer across the need-list in iteration
/// order (first-come, first-served against whatever buffer remains).
pub fn estimate_working_sets(design: &Design, catalog: &Catalog, capacity: f64) -> BTreeMap<String, f64> {
    let mut percents: BTreeMap<String, f64> = BTreeMap::new();
    let mut needs: Vec<(f64, String)> = Vec::new();
    let mut buffer = 0.0f64;

    let mut ordered: Vec<(f64, &str)> = design
        .collections()
        .filter_map(|c| catalog.collection(c).ok().map(|schema| (schema.workload_share, c)))
        .collect();
    // Descending workload share; ties broken by collection name descending to
    // match the source's `sort(reverse=True)` over `(percent, name)` pairs.
    ordered.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    for (share, collection) in &ordered {
        let schema = match catalog.collection(collection) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let available = capacity * share;
        let needed = schema.avg_doc_size * schema.tuple_count as f64;

        if needed <= available {
            percents.insert(collection.to_string(), 100.0);
            buffer += available - needed;
        } else {
            let fraction = if needed > 0.0 { available / needed } else { 1.0 };
            percents.insert(collection.to_string(), (fraction * 100.0).ceil());
            needs.push((1.0 - fraction, collection.to_string()));
        }
    }

    for (_, collection) in &needs {
        let schema = match catalog.collection(collection) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let have = percents.get(collection).copied().unwrap_or(0.0);
        let needed = (1.0 - have / 100.0) * schema.avg_doc_size * schema.tuple_count as f64;

        if needed <= buffer {
            percents.insert(collection.to_string(), 100.0);
            buffer -= needed;
        } else if buffer > 0.0 {
            let fraction = buffer / needed;
            let entry = percents.entry(collection.to_string()).or_insert(0.0);
            *entry += fraction * 100.0;
        }
    }

    percents
}

fn page_bounds(
    query: &Query,
    design: &Design,
    residency: f64,
    max_pages: u64,
    rng: &mut impl Rng,
) -> (f64, f64) {
    if matches!(query.op, OperationType::Insert) {
        return (1.0, 1.0);
    }

    let max_pages = max_pages as f64;
    let mut min_pages = max_pages;

    if residency >= 100.0 {
        min_pages = 0.0;
    } else {
        let predicate_fields: Vec<String> = query.predicate_fields().map(String::from).collect();
        if design.has_index(&query.collection, &predicate_fields) {
            min_pages = 0.0;
        } else {
            let draw = rng.gen_range(1..=100);
            if draw <= residency as u32 {
                min_pages = 0.0;
            }
        }
    }

    (min_pages, max_pages)
}

/// Disk cost for `design` over the whole workload (§4.4 `Disk(D)`).
///
/// Returns [`BUDGET_EXHAUSTED_SENTINEL`] if the design's index memory
/// exceeds `config.max_memory_bytes()`. The `multiplier` the source computes
/// per query type (insert/update/delete -> 2, select -> 1) is deliberately
/// unused in the final accumulation — a documented source quirk (§9)
/// preserved here rather than silently fixed. Checks `deadline` at the top
/// of each session, stopping early with whatever totals have accumulated so
/// far once it expires (§5 "at the top of each session loop inside a
/// sub-cost").
pub fn disk_cost(design: &Design, catalog: &Catalog, workload: &Workload, config: &CostModelConfig, deadline: &Deadline) -> f64 {
    let idx_mem = index_memory(design, catalog)
        + secondary_index_memory(design, catalog, config.effective_address_size());
    let max_memory = config.max_memory_bytes();
    if idx_mem > max_memory {
        debug!(idx_mem, max_memory, "disk cost sentinel: index memory exceeds budget");
        return BUDGET_EXHAUSTED_SENTINEL;
    }

    let capacity = max_memory - idx_mem;
    let residency = estimate_working_sets(design, catalog, capacity);
    let mut rng = seeded_rng();

    let mut cost = 0.0f64;
    let mut worst_case = 0.0f64;

    'sessions: for session in workload.sessions() {
        if deadline.expired() {
            break 'sessions;
        }

        for query in &session.queries {
            if !design.has_collection(&query.collection) {
                // Matches the source's `break`, not `continue`: a query on a
                // collection absent from the design terminates the rest of
                // this session's scan rather than skipping just this query.
                continue 'sessions;
            }
            let Ok(schema) = catalog.collection(&query.collection) else {
                continue 'sessions;
            };
            let residency_pct = residency.get(&query.collection).copied().unwrap_or(0.0);
            let (min_pages, max_pages) = page_bounds(query, design, residency_pct, schema.max_pages, &mut rng);
            cost += min_pages;
            worst_case += max_pages;
        }
    }

    if worst_case == 0.0 {
        0.0
    } else {
        cost / worst_case
    }
}
