//! LNS Designer (C7): the outer Large-Neighborhood-Search loop.
//!
//! Repeatedly relaxes a subset of collections, hands the rest of the
//! decision space to [`crate::bb::BbSearch`] with the incumbent cost as an
//! upper bound, and commits whenever BB finds something strictly cheaper
//! (§4.7). The loop owns the incumbent; `BbSearch` never sees or mutates it
//! directly, only a cloned, partially-fixed `Design`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use advisor_candidates::CandidateSpace;
use advisor_core::{Catalog, Design, Workload};
use advisor_costmodel::CostModelConfig;

use crate::bb::BbSearch;
use crate::deadline::Deadline;
use crate::fingerprint::CostCache;

/// How many consecutive non-improving rounds are tolerated before the
/// relaxation size grows (§4.7 step 4, "if it exceeds a threshold").
const PLATEAU_THRESHOLD: u32 = 5;

/// The outcome of a full [`LnsDesigner::solve`] run.
#[derive(Debug, Clone)]
pub struct LnsOutcome {
    /// The best design found, starting from (and never worse than) the seed.
    pub design: Design,
    /// `design`'s cost.
    pub cost: f64,
    /// Number of BB rounds the loop ran before the deadline fired.
    pub rounds: u64,
}

/// Large Neighborhood Search outer optimizer (C7).
pub struct LnsDesigner<'a> {
    catalog: &'a Catalog,
    workload: &'a Workload,
    candidate_space: &'a CandidateSpace,
    cost_config: &'a CostModelConfig,
}

impl<'a> LnsDesigner<'a> {
    /// Build an LNS designer over a fixed catalog, workload, candidate
    /// space, and cost-model configuration.
    pub fn new(
        catalog: &'a Catalog,
        workload: &'a Workload,
        candidate_space: &'a CandidateSpace,
        cost_config: &'a CostModelConfig,
    ) -> Self {
        LnsDesigner {
            catalog,
            workload,
            candidate_space,
            cost_config,
        }
    }

    /// Run the main loop (§4.7) until `deadline` expires, starting from
    /// `seed` with upper bound `cost(seed)`.
    ///
    /// Never returns a design costing more than the seed (§8 property 3,
    /// "Monotonic improvement") — every commit strictly lowers `cost`, and a
    /// deadline firing mid-round simply stops the loop with whatever
    /// incumbent it already holds.
    pub fn solve(&self, seed: Design, seed_cost: f64, deadline: &Deadline) -> LnsOutcome {
        let all_collections: Vec<String> = self.catalog.collections().map(String::from).collect();
        if all_collections.is_empty() {
            return LnsOutcome { design: seed, cost: seed_cost, rounds: 0 };
        }

        let cache = CostCache::new();
        let mut incumbent = seed;
        let mut best_cost = seed_cost;
        let mut relax_size = relaxation_floor(all_collections.len());
        let mut plateau = 0u32;
        let mut rng = StdRng::seed_from_u64(0x5344_4153_4348); // "SDASCH" — fixed, reseeded on plateau growth
        let mut rounds = 0u64;

        info!(seed_cost, relax_size, "LNS starting");

        while !deadline.expired() {
            rounds += 1;
            let relaxed = sample_relaxed_set(
                self.catalog,
                self.workload,
                self.cost_config,
                &incumbent,
                &all_collections,
                relax_size,
                &mut rng,
                deadline,
            );

            let outcome = BbSearch::search(
                &incumbent,
                &relaxed,
                self.catalog,
                self.workload,
                self.candidate_space,
                self.cost_config,
                best_cost,
                &cache,
                deadline,
            );

            match outcome.design {
                Some(candidate) if outcome.cost < best_cost => {
                    info!(
                        old_cost = best_cost,
                        new_cost = outcome.cost,
                        relax_size,
                        "LNS incumbent improved"
                    );
                    incumbent = candidate;
                    best_cost = outcome.cost;
                    plateau = 0;
                }
                _ => {
                    plateau += 1;
                    if plateau > PLATEAU_THRESHOLD {
                        relax_size = (relax_size + 1).min(all_collections.len());
                        plateau = 0;
                        rng = StdRng::seed_from_u64(
                            0x5344_4153_4348 ^ (relax_size as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
                        );
                        info!(relax_size, "LNS plateau: growing relaxation size and reseeding");
                    }
                }
            }
        }

        info!(rounds, final_cost = best_cost, "LNS deadline reached");
        LnsOutcome { design: incumbent, cost: best_cost, rounds }
    }
}

/// Initial relaxation size: a small constant, but never more than the
/// number of collections in scope (a single-collection catalog starts at
/// `k = 1`, not zero).
fn relaxation_floor(num_collections: usize) -> usize {
    num_collections.min(2).max(1)
}

/// Sample `k` collections from `all_collections` without replacement,
/// biased toward the highest per-collection network-cost contributors
/// (§4.7 step 2).
///
/// Collections are weighted by `1 + contribution` (so a zero-contribution
/// collection still has a chance of being picked — relaxing a
/// well-routed collection can still open up disk/skew improvements) and
/// drawn by repeated weighted selection without replacement.
#[allow(clippy::too_many_arguments)]
fn sample_relaxed_set(
    catalog: &Catalog,
    workload: &Workload,
    cost_config: &CostModelConfig,
    incumbent: &Design,
    all_collections: &[String],
    k: usize,
    rng: &mut StdRng,
    deadline: &Deadline,
) -> Vec<String> {
    let k = k.min(all_collections.len());
    if k >= all_collections.len() {
        return all_collections.to_vec();
    }

    let contributions =
        advisor_costmodel::network_cost_by_collection(incumbent, catalog, workload, cost_config.nodes, deadline);

    let mut pool: Vec<(String, f64)> = all_collections
        .iter()
        .map(|c| (c.clone(), 1.0 + contributions.get(c).copied().unwrap_or(0.0)))
        .collect();

    let mut chosen = Vec::with_capacity(k);
    for _ in 0..k {
        if pool.is_empty() {
            break;
        }
        let total: f64 = pool.iter().map(|(_, w)| w).sum();
        let mut draw = rng.gen_range_f64(0.0, total);
        let mut idx = pool.len() - 1;
        for (i, (_, w)) in pool.iter().enumerate() {
            if draw < *w {
                idx = i;
                break;
            }
            draw -= w;
        }
        chosen.push(pool.remove(idx).0);
    }
    chosen
}

/// Minimal `f64` range draw, since `rand::Rng::gen_range` over floats needs
/// the `SampleRange` impl pulled in via the trait; kept as a free function
/// so callers don't need an extra import for a single call site.
trait GenRangeF64 {
    fn gen_range_f64(&mut self, low: f64, high: f64) -> f64;
}

impl GenRangeF64 for StdRng {
    fn gen_range_f64(&mut self, low: f64, high: f64) -> f64 {
        use rand::Rng;
        if high <= low {
            low
        } else {
            self.gen_range(low..high)
        }
    }
}
