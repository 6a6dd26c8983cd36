//! Pure cost function combining network, disk, and skew sub-costs for a
//! candidate [`Design`](advisor_core::Design).
//!
//! `overall_cost` is the sole entry point every search component (C5/C6/C7)
//! calls as its oracle. It is a pure function of `(Design, Catalog,
//! Workload, CostModelConfig)`: no interior mutability, no wall-clock
//! dependence, and a fixed-seed PRNG (see [`rng`]) so repeated calls with
//! the same inputs return the same value (§8 property 1, "Determinism").

pub mod config;
pub mod disk;
pub mod network;
pub mod rng;
pub mod skew;

pub use config::CostModelConfig;
pub use disk::BUDGET_EXHAUSTED_SENTINEL;

use advisor_core::{Catalog, Deadline, Design, Workload};

/// Combine network, disk, and skew sub-costs into the single scalar the
/// search engine optimizes (§4.4):
///
/// ```text
/// c = (wN * Net(D) + wD * Disk(D) + wS * Skew(D)) / (wN + wD + wS)
/// ```
///
/// `Disk(D)` may be [`BUDGET_EXHAUSTED_SENTINEL`] (1e13), in which case the
/// combined cost is correspondingly large rather than clamped to `[0, 1]` —
/// this is how the disk sentinel propagates into the search engine's
/// comparisons without a separate error path (§8 property 2, "Range").
///
/// `deadline` is threaded into each sub-cost's own session loop (§5 "at the
/// top of each session loop inside a sub-cost") rather than checked only
/// once here, since a single leaf evaluation's cost scales with workload
/// size and can otherwise run arbitrarily long past the deadline.
pub fn overall_cost(design: &Design, catalog: &Catalog, workload: &Workload, config: &CostModelConfig, deadline: &Deadline) -> f64 {
    let (net, _query_count) = network::network_cost(design, catalog, workload, config.nodes, deadline);
    let disk = disk::disk_cost(design, catalog, workload, config, deadline);
    let skew = skew::skew_cost(design, catalog, workload, config.nodes, config.skew_intervals, deadline);

    let weighted = config.weight_network * net + config.weight_disk * disk + config.weight_skew * skew;
    weighted / (config.weight_network + config.weight_disk + config.weight_skew)
}

/// The network sub-cost alone, exposed for the search engine's
/// highest-contribution collection sampling (§4.7 step 2).
pub fn network_cost(design: &Design, catalog: &Catalog, workload: &Workload, config: &CostModelConfig, deadline: &Deadline) -> f64 {
    network::network_cost(design, catalog, workload, config.nodes, deadline).0
}

/// Per-collection network cost breakdown, exposed for the same purpose as
/// [`network_cost`] when a single scalar isn't granular enough (§4.7
/// step 2, "biased toward highest-contribution collections").
pub fn network_cost_by_collection(
    design: &Design,
    catalog: &Catalog,
    workload: &Workload,
    nodes: u32,
    deadline: &Deadline,
) -> std::collections::BTreeMap<String, f64> {
    network::network_cost_by_collection(design, catalog, workload, nodes, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Collection, FieldStats, OperationType, PredicateKind, Query, Session, Timestamp};
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut fields = BTreeMap::new();
        fields.insert("x".to_string(), FieldStats::new(5, 100, 0.01, true, false).unwrap());
        fields.insert("y".to_string(), FieldStats::new(5, 100, 0.5, false, true).unwrap());
        let col = Collection {
            name: "a".into(),
            tuple_count: 100,
            avg_doc_size: 50.0,
            workload_share: 1.0,
            max_pages: 5,
            fields,
        };
        Catalog::new(vec![col]).unwrap()
    }

    /// Spec S1: single collection, single session, targeted equality select,
    /// shard_key=(x), nodes=4 -> overall_cost == 0.
    #[test]
    fn scenario_s1_single_collection_targeted_equality() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();
        design.add_index(&catalog, "a", vec!["x".into()]).unwrap();

        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates("a", OperationType::Select, vec![("x".into(), PredicateKind::Equality)])],
        );
        let workload = Workload::new(vec![session]);
        let config = CostModelConfig { nodes: 4, ..CostModelConfig::default() };

        let cost = overall_cost(&design, &catalog, &workload, &config, &Deadline::never());
        assert_eq!(cost, 0.0);
    }

    /// Spec S2: broadcast predicate on a non-shard-key field -> Net == 1.0.
    #[test]
    fn scenario_s2_broadcast_network_cost() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();

        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates("a", OperationType::Select, vec![("y".into(), PredicateKind::Other)])],
        );
        let workload = Workload::new(vec![session]);
        let config = CostModelConfig { nodes: 4, ..CostModelConfig::default() };

        assert_eq!(network_cost(&design, &catalog, &workload, &config, &Deadline::never()), 1.0);
    }

    /// Spec S3: index memory exceeding a 1MB budget triggers the disk
    /// sentinel, pushing overall_cost above 1e12.
    #[test]
    fn scenario_s3_disk_sentinel_propagates_into_overall_cost() {
        let mut fields = BTreeMap::new();
        fields.insert("id".to_string(), FieldStats::new(1, 10, 0.5, true, false).unwrap());
        let big = Collection {
            name: "huge".into(),
            tuple_count: 10_000_000,
            avg_doc_size: 1000.0,
            workload_share: 0.5,
            max_pages: 10_000,
            fields: fields.clone(),
        };
        let other = Collection {
            name: "other".into(),
            tuple_count: 10_000_000,
            avg_doc_size: 1000.0,
            workload_share: 0.5,
            max_pages: 10_000,
            fields,
        };
        let catalog = Catalog::new(vec![big, other]).unwrap();
        let design = Design::empty(&catalog);
        let workload = Workload::new(vec![]);
        let config = CostModelConfig { max_memory_mb: 1, nodes: 1, ..CostModelConfig::default() };

        let cost = overall_cost(&design, &catalog, &workload, &config, &Deadline::never());
        assert!(cost > 1e12, "expected sentinel-dominated cost, got {cost}");
    }

    /// Determinism (§8 property 1): repeated calls with identical inputs
    /// return bit-identical results.
    #[test]
    fn overall_cost_is_deterministic() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();
        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates("a", OperationType::Select, vec![("y".into(), PredicateKind::Other)])],
        );
        let workload = Workload::new(vec![session]);
        let config = CostModelConfig::default();

        let a = overall_cost(&design, &catalog, &workload, &config, &Deadline::never());
        let b = overall_cost(&design, &catalog, &workload, &config, &Deadline::never());
        assert_eq!(a, b);
    }
}
