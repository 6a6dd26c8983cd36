//! Derivation of raw candidate lists from a catalog and workload.

use std::collections::{BTreeMap, BTreeSet};

use advisor_core::{Catalog, OperationType, Workload};

/// Bounded arity for generated shard-key and index-key tuples. The source
/// system never considers composite keys wider than this in practice.
pub const MAX_CANDIDATE_ARITY: usize = 2;

fn candidate_fields(catalog: &Catalog, collection: &str) -> Vec<String> {
    let Ok(schema) = catalog.collection(collection) else {
        return Vec::new();
    };
    schema
        .fields
        .iter()
        .filter(|(_, stats)| stats.query_use_count > 0)
        .map(|(name, _)| name.clone())
        .collect()
}

/// All field tuples up to [`MAX_CANDIDATE_ARITY`], drawn from `fields`, in
/// deterministic (alphabetical, increasing arity) order. Arity-1 tuples
/// come first so a greedy consumer sees single-field keys before composites.
fn tuples_up_to_arity(mut fields: Vec<String>, max_arity: usize) -> Vec<Vec<String>> {
    fields.sort();
    let mut out = Vec::new();
    for f in &fields {
        out.push(vec![f.clone()]);
    }
    if max_arity >= 2 {
        for i in 0..fields.len() {
            for j in (i + 1)..fields.len() {
                out.push(vec![fields[i].clone(), fields[j].clone()]);
            }
        }
    }
    out
}

/// Candidate shard-key tuples for `collection`: field tuples up to
/// [`MAX_CANDIDATE_ARITY`] drawn from fields with non-zero
/// `query_use_count`, reserved `$`-prefixed names excluded.
pub fn shard_key_candidates(catalog: &Catalog, collection: &str) -> Vec<Vec<String>> {
    tuples_up_to_arity(candidate_fields(catalog, collection), MAX_CANDIDATE_ARITY)
}

/// Candidate index-key tuples for `collection`: same derivation as shard
/// keys — both are drawn from predicate-appearing fields, i.e. fields with
/// a non-zero `query_use_count`.
pub fn index_key_candidates(catalog: &Catalog, collection: &str) -> Vec<Vec<String>> {
    tuples_up_to_arity(candidate_fields(catalog, collection), MAX_CANDIDATE_ARITY)
}

/// Candidate embedding parents for `collection`: every other collection
/// that co-occurs with it as an immediately-adjacent query in some session
/// (a proxy for an equi-join-like access pattern), plus `None` (no
/// embedding), which is always a candidate.
pub fn parent_candidates(
    catalog: &Catalog,
    workload: &Workload,
    collection: &str,
) -> Vec<Option<String>> {
    let mut adjacent: BTreeSet<String> = BTreeSet::new();
    for session in workload.sessions() {
        let mut prev: Option<&str> = None;
        for query in &session.queries {
            if let Some(p) = prev {
                if p != query.collection && query.collection == collection {
                    adjacent.insert(p.to_string());
                }
            }
            prev = Some(query.collection.as_str());
        }
    }
    adjacent.retain(|c| catalog.collection(c).is_ok());

    let mut out: Vec<Option<String>> = vec![None];
    out.extend(adjacent.into_iter().map(Some));
    out
}

/// Count of adjacent `(prev, cur)` collection pairs across the whole
/// workload, ignoring operation type — used only to derive
/// [`parent_candidates`]; exposed for testing.
pub fn adjacency_counts(workload: &Workload) -> BTreeMap<(String, String), u64> {
    let mut counts = BTreeMap::new();
    for session in workload.sessions() {
        let mut prev: Option<&str> = None;
        for query in &session.queries {
            if let Some(p) = prev {
                if p != query.collection {
                    *counts
                        .entry((p.to_string(), query.collection.clone()))
                        .or_insert(0u64) += 1;
                }
            }
            prev = Some(query.collection.as_str());
        }
    }
    counts
}

/// True if `op` ever carries predicates (used by callers deriving
/// predicate-appearing fields directly from a workload rather than from
/// precomputed `FieldStats`).
pub fn op_has_predicates(op: OperationType) -> bool {
    !matches!(op, OperationType::Insert)
}
