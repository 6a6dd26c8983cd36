//! Network (routing) cost: simulates how many shard nodes a query touches
//! under a candidate design, accounting for embedding absorption.

use advisor_core::{Catalog, Deadline, Design, OperationType, PredicateKind, Query, Session};

/// The parent a query routes through for absorption purposes: `c`'s own
/// embedding parent, or `c` itself if it is a root. Distinct from
/// [`advisor_core::Design::parent_collection`], which returns `None` for a
/// root — this helper exists only to match the source system's
/// self-reference-as-root sentinel inside the absorption check below.
pub fn effective_parent<'a>(design: &'a Design, collection: &'a str) -> &'a str {
    design.parent_collection(collection).unwrap_or(collection)
}

/// Whether `query` is processed (counts toward routing cost) given the
/// query that preceded it in the same session, or absorbed for free by an
/// embedding relationship.
fn is_processed(design: &Design, previous: Option<&Query>, query: &Query) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let parent = effective_parent(design, &query.collection);
    parent == query.collection
        || !previous.op.is_select()
        || !query.op.is_select()
        || previous.collection != parent
}

/// The network cost and processed-query count over a slice of sessions —
/// the primitive both the whole-workload network cost and each skew
/// segment evaluate.
///
/// Queries on a collection absent from `design` contribute nothing to cost,
/// but still update the absorption chain — `previous_query` always advances
/// to the current query regardless of whether `design` has its collection,
/// exactly mirroring the source's unconditional `previous_query = q`. Checks
/// `deadline` at the top of each session, stopping early (with whatever
/// partial totals have accumulated) once it expires (§5 "at the top of each
/// session loop inside a sub-cost").
pub fn partial_network_cost(
    design: &Design,
    catalog: &Catalog,
    sessions: &[Session],
    nodes: u32,
    deadline: &Deadline,
) -> (f64, u64) {
    let nodes = nodes as f64;
    let mut result = 0.0f64;
    let mut worst_case = 0.0f64;
    let mut query_count = 0u64;

    for session in sessions {
        if deadline.expired() {
            break;
        }

        let mut previous_query: Option<&Query> = None;
        for query in &session.queries {
            if design.has_collection(&query.collection) && is_processed(design, previous_query, query) {
                worst_case += nodes;
                query_count += 1;
                result += query_contribution(design, catalog, query, nodes);
            }

            previous_query = Some(query);
        }
    }

    if worst_case == 0.0 {
        (0.0, 0)
    } else {
        (result / worst_case, query_count)
    }
}

fn query_contribution(design: &Design, catalog: &Catalog, query: &Query, nodes: f64) -> f64 {
    if matches!(query.op, OperationType::Insert) {
        return 1.0;
    }
    if query.predicates.is_empty() {
        return nodes;
    }

    let mut targeted: Option<f64> = None;
    for (field, kind) in &query.predicates {
        if !design.in_shard_key(&query.collection, field) {
            continue;
        }
        let contribution = match kind {
            PredicateKind::Equality => 0.0,
            PredicateKind::Range | PredicateKind::Other => {
                match catalog.field_stats(&query.collection, field) {
                    Ok(stats) => (stats.selectivity * nodes).ceil(),
                    Err(_) => nodes,
                }
            }
        };
        // Last matching predicate wins — mirrors the trace's insertion
        // order, which `Query::predicates` preserves.
        targeted = Some(contribution);
    }
    targeted.unwrap_or(nodes)
}

/// Network cost over the entire workload.
pub fn network_cost(
    design: &Design,
    catalog: &Catalog,
    workload: &advisor_core::Workload,
    nodes: u32,
    deadline: &Deadline,
) -> (f64, u64) {
    partial_network_cost(design, catalog, workload.sessions(), nodes, deadline)
}

/// Per-collection network cost contribution, normalized against each
/// collection's own worst case rather than the workload-wide one.
///
/// Not part of the source cost model — `advisor-search`'s LNS designer uses
/// this to bias relaxation sampling toward "highest-contribution
/// collections" (§4.7 step 2), which needs a per-collection breakdown the
/// single scalar `Net(D)` doesn't expose. Reuses the same processed/absorbed
/// walk as [`partial_network_cost`] so the bias reflects the identical
/// routing simulation the oracle scores designs with.
pub fn network_cost_by_collection(
    design: &Design,
    catalog: &Catalog,
    workload: &advisor_core::Workload,
    nodes: u32,
    deadline: &Deadline,
) -> std::collections::BTreeMap<String, f64> {
    let nodes_f = nodes as f64;
    let mut result: std::collections::BTreeMap<String, f64> = std::collections::BTreeMap::new();
    let mut worst_case: std::collections::BTreeMap<String, f64> = std::collections::BTreeMap::new();

    for session in workload.sessions() {
        if deadline.expired() {
            break;
        }

        let mut previous_query: Option<&Query> = None;
        for query in &session.queries {
            if design.has_collection(&query.collection) && is_processed(design, previous_query, query) {
                *worst_case.entry(query.collection.clone()).or_insert(0.0) += nodes_f;
                *result.entry(query.collection.clone()).or_insert(0.0) +=
                    query_contribution(design, catalog, query, nodes_f);
            }
            previous_query = Some(query);
        }
    }

    result
        .into_iter()
        .map(|(collection, contribution)| {
            let worst = worst_case.get(&collection).copied().unwrap_or(0.0);
            let normalized = if worst == 0.0 { 0.0 } else { contribution / worst };
            (collection, normalized)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Collection, FieldStats, Timestamp, Workload};
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut fields = BTreeMap::new();
        fields.insert("x".to_string(), FieldStats::new(5, 10, 0.1, true, false).unwrap());
        fields.insert("y".to_string(), FieldStats::new(5, 10, 0.5, false, true).unwrap());
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

    #[test]
    fn targeted_equality_is_free() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();
        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates(
                "a",
                OperationType::Select,
                vec![("x".into(), PredicateKind::Equality)],
            )],
        );
        let workload = Workload::new(vec![session]);
        let (net, qc) = network_cost(&design, &catalog, &workload, 4, &Deadline::never());
        assert_eq!(net, 0.0);
        assert_eq!(qc, 1);
    }

    #[test]
    fn non_shard_key_predicate_is_broadcast() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();
        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates(
                "a",
                OperationType::Select,
                vec![("y".into(), PredicateKind::Other)],
            )],
        );
        let workload = Workload::new(vec![session]);
        let (net, _) = network_cost(&design, &catalog, &workload, 4, &Deadline::never());
        assert_eq!(net, 1.0);
    }

    #[test]
    fn embedding_absorption_skips_second_query() {
        let mut fields_a = BTreeMap::new();
        fields_a.insert("id".to_string(), FieldStats::new(5, 10, 0.1, true, false).unwrap());
        let mut fields_b = BTreeMap::new();
        fields_b.insert("oid".to_string(), FieldStats::new(5, 10, 0.1, true, false).unwrap());
        let orders = Collection {
            name: "orders".into(),
            tuple_count: 10,
            avg_doc_size: 50.0,
            workload_share: 0.5,
            max_pages: 2,
            fields: fields_a,
        };
        let lines = Collection {
            name: "order_lines".into(),
            tuple_count: 10,
            avg_doc_size: 20.0,
            workload_share: 0.5,
            max_pages: 2,
            fields: fields_b,
        };
        let catalog = Catalog::new(vec![orders, lines]).unwrap();
        let mut design = Design::empty(&catalog);
        design
            .set_parent(&catalog, "order_lines", Some("orders".into()))
            .unwrap();

        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![
                Query::with_predicates(
                    "orders",
                    OperationType::Select,
                    vec![("id".into(), PredicateKind::Equality)],
                ),
                Query::with_predicates(
                    "order_lines",
                    OperationType::Select,
                    vec![("oid".into(), PredicateKind::Equality)],
                ),
            ],
        );
        let workload = Workload::new(vec![session]);
        let (_, qc) = network_cost(&design, &catalog, &workload, 4, &Deadline::never());
        assert_eq!(qc, 1);
    }

    /// The missing-collection `continue` must not skip updating the
    /// absorption chain: session `[orders (in design), ghost (not in
    /// design), order_lines (embedded under orders)]` — `previous_query`
    /// becomes "ghost" after the second query, so the third is processed
    /// rather than absorbed even though its effective parent is "orders".
    #[test]
    fn missing_collection_query_still_updates_absorption_chain() {
        let mut fields_a = BTreeMap::new();
        fields_a.insert("id".to_string(), FieldStats::new(5, 10, 0.1, true, false).unwrap());
        let mut fields_b = BTreeMap::new();
        fields_b.insert("oid".to_string(), FieldStats::new(5, 10, 0.1, true, false).unwrap());
        let orders = Collection {
            name: "orders".into(),
            tuple_count: 10,
            avg_doc_size: 50.0,
            workload_share: 0.5,
            max_pages: 2,
            fields: fields_a,
        };
        let lines = Collection {
            name: "order_lines".into(),
            tuple_count: 10,
            avg_doc_size: 20.0,
            workload_share: 0.5,
            max_pages: 2,
            fields: fields_b,
        };
        let catalog = Catalog::new(vec![orders, lines]).unwrap();
        let mut design = Design::empty(&catalog);
        design
            .set_parent(&catalog, "order_lines", Some("orders".into()))
            .unwrap();

        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![
                Query::with_predicates(
                    "orders",
                    OperationType::Select,
                    vec![("id".into(), PredicateKind::Equality)],
                ),
                Query::with_predicates("ghost", OperationType::Select, vec![]),
                Query::with_predicates(
                    "order_lines",
                    OperationType::Select,
                    vec![("oid".into(), PredicateKind::Equality)],
                ),
            ],
        );
        let workload = Workload::new(vec![session]);
        let (_, qc) = network_cost(&design, &catalog, &workload, 4, &Deadline::never());
        assert_eq!(qc, 2, "order_lines must be processed, not absorbed, since ghost intervened");
    }

    #[test]
    fn per_collection_cost_isolates_the_broadcasting_collection() {
        let catalog = catalog();
        let mut design = Design::empty(&catalog);
        design.set_shard_key(&catalog, "a", vec!["x".into()]).unwrap();
        let session = Session::new(
            Timestamp::from_ticks(0),
            Timestamp::from_ticks(1),
            vec![Query::with_predicates(
                "a",
                OperationType::Select,
                vec![("y".into(), PredicateKind::Other)],
            )],
        );
        let workload = Workload::new(vec![session]);
        let by_collection = network_cost_by_collection(&design, &catalog, &workload, 4, &Deadline::never());
        assert_eq!(by_collection.get("a").copied(), Some(1.0));
    }
}
