//! Branch-and-bound inner solver (C6): exhaustive search over a relaxed
//! subset of collections, pruned by an incumbent-cost upper bound (§4.6).

use advisor_candidates::{CandidateSpace, CollectionCandidates};
use advisor_core::{Catalog, Design, Workload};
use advisor_costmodel::CostModelConfig;
use tracing::{debug, trace};

use crate::deadline::Deadline;
use crate::fingerprint::CostCache;

/// One fully-specified per-collection assignment a BB leaf may commit.
///
/// The candidate space (§4.3) enumerates shard keys, index keys, and
/// parents as three independent axes; a BB branch needs one concrete choice
/// per axis. We cap the index axis at "no index" or "exactly one index" —
/// §4.6 doesn't specify how index *sets* should be enumerated (only shard
/// keys and parents are single-valued decisions), so trying every index
/// subset would blow up the branching factor for little benefit.
/// This is recorded as an Open Question resolution in DESIGN.md.
#[derive(Debug, Clone)]
struct CollectionAssignment {
    shard_key: Vec<String>,
    index: Option<Vec<String>>,
    parent: Option<String>,
}

fn enumerate_assignments(candidates: &CollectionCandidates) -> Vec<CollectionAssignment> {
    let mut shard_keys = candidates.shard_keys.clone();
    if !shard_keys.iter().any(Vec::is_empty) {
        shard_keys.insert(0, Vec::new());
    }

    let mut indexes: Vec<Option<Vec<String>>> = vec![None];
    indexes.extend(candidates.index_keys.iter().cloned().map(Some));

    let mut out = Vec::with_capacity(shard_keys.len() * indexes.len() * candidates.parents.len().max(1));
    for shard_key in &shard_keys {
        for index in &indexes {
            for parent in &candidates.parents {
                out.push(CollectionAssignment {
                    shard_key: shard_key.clone(),
                    index: index.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }
    out
}

fn apply_assignment(design: &mut Design, catalog: &Catalog, collection: &str, assignment: &CollectionAssignment) {
    // These come straight out of the candidate space built over the same
    // catalog/workload, so they are always schema-valid and forest-valid;
    // a failure here would mean `CandidateSpace` and `Design` disagree
    // about what the catalog allows, which is a programming error, not a
    // runtime condition the solver should recover from.
    design
        .set_shard_key(catalog, collection, assignment.shard_key.clone())
        .expect("candidate-space shard key is always design-valid");
    let indexes = assignment.index.iter().cloned().collect();
    design
        .set_indexes(catalog, collection, indexes)
        .expect("candidate-space index key is always design-valid");
    design
        .set_parent(catalog, collection, assignment.parent.clone())
        .expect("candidate-space parent is always design-valid");
}

/// Collections in `relaxed`, ordered descending by `workload_share` (§4.6
/// "branch on the next collection in a fixed order"), ties broken
/// alphabetically for determinism.
fn branching_order(catalog: &Catalog, relaxed: &[String]) -> Vec<String> {
    let mut order = relaxed.to_vec();
    order.sort_by(|a, b| {
        let share_a = catalog.collection(a).map(|c| c.workload_share).unwrap_or(0.0);
        let share_b = catalog.collection(b).map(|c| c.workload_share).unwrap_or(0.0);
        share_b
            .partial_cmp(&share_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
    order
}

/// The result of one [`BbSearch::search`] invocation.
#[derive(Debug, Clone)]
pub struct BbOutcome {
    /// The best design found strictly below the supplied upper bound, or
    /// `None` if every branch was pruned or the deadline fired before any
    /// leaf was reached.
    pub design: Option<Design>,
    /// The cost of `design`, or the unchanged upper bound if `design` is
    /// `None`.
    pub cost: f64,
}

/// Branch-and-bound search over a relaxed collection subset (C6).
pub struct BbSearch;

impl BbSearch {
    /// Search `relaxed` collections' candidate space, holding every other
    /// collection fixed at `incumbent`'s current decision, and return the
    /// best design strictly below `upper_bound`.
    #[allow(clippy::too_many_arguments)]
    pub fn search(
        incumbent: &Design,
        relaxed: &[String],
        catalog: &Catalog,
        workload: &Workload,
        candidate_space: &CandidateSpace,
        cost_config: &CostModelConfig,
        upper_bound: f64,
        cache: &CostCache,
        deadline: &Deadline,
    ) -> BbOutcome {
        let order = branching_order(catalog, relaxed);
        if order.is_empty() {
            let cost = cache.cost(incumbent, catalog, workload, cost_config, deadline);
            return if cost < upper_bound {
                BbOutcome { design: Some(incumbent.clone()), cost }
            } else {
                BbOutcome { design: None, cost: upper_bound }
            };
        }

        let mut bound = upper_bound;
        let mut best: Option<Design> = None;
        descend(&order, 0, incumbent, catalog, workload, candidate_space, cost_config, &mut bound, &mut best, cache, deadline);

        match best {
            Some(design) => BbOutcome { design: Some(design), cost: bound },
            None => BbOutcome { design: None, cost: upper_bound },
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn descend(
    order: &[String],
    depth: usize,
    base: &Design,
    catalog: &Catalog,
    workload: &Workload,
    candidate_space: &CandidateSpace,
    cost_config: &CostModelConfig,
    bound: &mut f64,
    best: &mut Option<Design>,
    cache: &CostCache,
    deadline: &Deadline,
) {
    if deadline.expired() {
        return;
    }

    let collection = &order[depth];
    let candidates = candidate_space.for_collection(collection);
    let is_leaf = depth + 1 == order.len();

    for assignment in enumerate_assignments(&candidates) {
        if deadline.expired() {
            return;
        }

        let mut branch = base.clone();
        apply_assignment(&mut branch, catalog, collection, &assignment);
        let cost = cache.cost(&branch, catalog, workload, cost_config, deadline);

        if cost >= *bound {
            trace!(collection, cost, bound = *bound, "BB node pruned");
            continue;
        }

        if is_leaf {
            debug!(collection, cost, "BB leaf improves bound");
            *bound = cost;
            *best = Some(branch);
        } else {
            descend(order, depth + 1, &branch, catalog, workload, candidate_space, cost_config, bound, best, cache, deadline);
        }
    }
}
