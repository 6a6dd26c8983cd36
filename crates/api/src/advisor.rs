//! The advisor facade (§6 "The core exposes"): `cost_model`, `solve`, and
//! `design_to_string`, wired over a fixed `(Catalog, Workload, AdvisorConfig)`.

use std::time::Duration;

use advisor_candidates::CandidateSpace;
use advisor_core::{Catalog, Design, Workload};
use advisor_search::{initial_design, Deadline, LnsDesigner};

use crate::config::AdvisorConfig;

/// The physical-design advisor: a fixed catalog, workload, candidate space,
/// and configuration, exposing the three operations §6 names.
///
/// Built once per run; `Catalog`/`Workload`/`CandidateSpace` are immutable
/// after construction (§5 "Shared resources") so an `Advisor` is `Send +
/// Sync` and safe to share across the worker pool `advisor-search` spins up
/// internally.
pub struct Advisor {
    catalog: Catalog,
    workload: Workload,
    candidate_space: CandidateSpace,
    config: AdvisorConfig,
}

impl Advisor {
    /// Build an advisor over a catalog, workload, and validated
    /// configuration, deriving the candidate space once up front.
    pub fn new(catalog: Catalog, workload: Workload, config: AdvisorConfig) -> advisor_core::Result<Self> {
        config.validate()?;
        let candidate_space = CandidateSpace::build(&catalog, &workload);
        Ok(Advisor { catalog, workload, candidate_space, config })
    }

    /// The catalog this advisor was built over.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The workload this advisor was built over.
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// `cost_model(design)` (§6): the pure scalar cost of a candidate
    /// design against this advisor's catalog and workload.
    ///
    /// A one-off scoring call, not part of a deadline-bounded search loop —
    /// evaluated with [`Deadline::never`] so it always runs to completion.
    pub fn cost_model(&self, design: &Design) -> f64 {
        advisor_costmodel::overall_cost(design, &self.catalog, &self.workload, &self.config.cost_model, &Deadline::never())
    }

    /// The Initial Designer's seed (C5) for this advisor's catalog.
    pub fn initial_design(&self) -> Design {
        initial_design(&self.catalog)
    }

    /// `solve(seed, deadline)` (§6): run the LNS/BB search engine from
    /// `seed` until `deadline`, returning the best design found and its
    /// cost.
    ///
    /// Never returns a design costing more than `seed` (§8 property 3).
    pub fn solve(&self, seed: Design, deadline: &Deadline) -> (Design, f64) {
        let seed_cost = self.cost_model(&seed);
        let lns = LnsDesigner::new(&self.catalog, &self.workload, &self.candidate_space, &self.config.cost_model);
        let outcome = lns.solve(seed, seed_cost, deadline);
        (outcome.design, outcome.cost)
    }

    /// Convenience wrapper over [`Advisor::solve`]: seed with the Initial
    /// Designer (C5) and run for `self.config.lns_time_budget_seconds`.
    pub fn solve_from_scratch(&self) -> (Design, f64) {
        let seed = self.initial_design();
        let deadline = Deadline::after(Duration::from_secs(self.config.lns_time_budget_seconds));
        self.solve(seed, &deadline)
    }

    /// `design_to_string(design)` (§6): a stable textual rendering for
    /// logging and test snapshots — one line per collection, sorted (the
    /// catalog/design's own iteration order is already alphabetical),
    /// showing shard key, indexes, and embedding parent.
    pub fn design_to_string(&self, design: &Design) -> String {
        design_to_string(design)
    }
}

/// Free-function form of [`Advisor::design_to_string`], usable without a
/// constructed `Advisor` (e.g. by the CLI's `cost` subcommand, which only
/// needs to echo back the design it just scored).
pub fn design_to_string(design: &Design) -> String {
    let mut out = String::new();
    for collection in design.collections() {
        let shard_key = design.shard_key(collection);
        let shard_key_str = if shard_key.is_empty() {
            "-".to_string()
        } else {
            shard_key.join(",")
        };

        let mut indexes: Vec<String> = design
            .indexes_for(collection)
            .map(|idx| format!("({})", idx.join(",")))
            .collect();
        indexes.sort();
        let indexes_str = if indexes.is_empty() { "-".to_string() } else { indexes.join(" ") };

        let parent_str = design.parent_collection(collection).unwrap_or("-");

        out.push_str(&format!(
            "{collection}: shard_key=[{shard_key_str}] indexes=[{indexes_str}] parent={parent_str}\n"
        ));
    }
    out
}
