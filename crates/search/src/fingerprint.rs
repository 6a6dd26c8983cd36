//! Design fingerprinting and memoized cost evaluation (§4.11).
//!
//! BB and LNS both re-evaluate many designs that differ only in a handful of
//! collections; a great many of those designs recur across branches and LNS
//! rounds. `DesignFingerprint` hashes a design's shard keys, indexes, and
//! embedding parents with `xxh3` and keys a shared `DashMap` so `overall_cost`
//! is never recomputed for a design already scored during this `solve()`
//! call.

use std::sync::Arc;

use dashmap::DashMap;
use xxhash_rust::xxh3::Xxh3;

use advisor_core::{Catalog, Deadline, Design, Workload};
use advisor_costmodel::CostModelConfig;

/// A content hash of a [`Design`]'s collection-scoped decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DesignFingerprint(u64);

impl DesignFingerprint {
    /// Hash `design`'s shard keys, indexes, and embedding parents.
    ///
    /// Collections are visited in the design's own (`BTreeMap`-backed,
    /// alphabetical) iteration order, so the fingerprint is stable across
    /// equivalent designs regardless of construction order.
    pub fn of(design: &Design) -> Self {
        let mut hasher = Xxh3::new();
        for collection in design.collections() {
            hasher.update(collection.as_bytes());
            hasher.update(&[0u8]);
            for field in design.shard_key(collection) {
                hasher.update(field.as_bytes());
                hasher.update(&[1u8]);
            }
            hasher.update(&[0xffu8]);

            let mut indexes: Vec<Vec<&str>> = design
                .indexes_for(collection)
                .map(|idx| idx.iter().map(String::as_str).collect())
                .collect();
            for idx in &mut indexes {
                idx.sort_unstable();
            }
            indexes.sort();
            for idx in &indexes {
                for field in idx {
                    hasher.update(field.as_bytes());
                    hasher.update(&[2u8]);
                }
                hasher.update(&[0xfeu8]);
            }

            if let Some(parent) = design.parent_collection(collection) {
                hasher.update(parent.as_bytes());
            }
            hasher.update(&[0xfdu8]);
        }
        DesignFingerprint(hasher.digest())
    }
}

/// A shared cache mapping design fingerprints to their already-computed
/// overall cost, safe to share read-only across the `rayon` worker pool that
/// evaluates BB leaf designs in parallel.
#[derive(Clone, Default)]
pub struct CostCache {
    entries: Arc<DashMap<DesignFingerprint, f64>>,
}

impl CostCache {
    /// An empty cache.
    pub fn new() -> Self {
        CostCache::default()
    }

    /// Number of distinct designs scored so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no design has been scored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate `design`'s overall cost, reusing a cached value if this exact
    /// fingerprint has already been scored.
    pub fn cost(
        &self,
        design: &Design,
        catalog: &Catalog,
        workload: &Workload,
        config: &CostModelConfig,
        deadline: &Deadline,
    ) -> f64 {
        let fp = DesignFingerprint::of(design);
        if let Some(cached) = self.entries.get(&fp) {
            return *cached;
        }
        let cost = advisor_costmodel::overall_cost(design, catalog, workload, config, deadline);
        self.entries.insert(fp, cost);
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{Catalog, Collection, FieldStats};
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), FieldStats::new(1, 10, 0.5, true, false).unwrap());
        fields.insert("b".to_string(), FieldStats::new(1, 10, 0.5, true, false).unwrap());
        let col = Collection {
            name: "orders".into(),
            tuple_count: 10,
            avg_doc_size: 10.0,
            workload_share: 1.0,
            max_pages: 1,
            fields,
        };
        Catalog::new(vec![col]).unwrap()
    }

    #[test]
    fn identical_designs_fingerprint_equal() {
        let catalog = catalog();
        let mut d1 = Design::empty(&catalog);
        d1.set_shard_key(&catalog, "orders", vec!["a".into()]).unwrap();
        let mut d2 = Design::empty(&catalog);
        d2.set_shard_key(&catalog, "orders", vec!["a".into()]).unwrap();
        assert_eq!(DesignFingerprint::of(&d1), DesignFingerprint::of(&d2));
    }

    #[test]
    fn different_shard_keys_fingerprint_differently() {
        let catalog = catalog();
        let mut d1 = Design::empty(&catalog);
        d1.set_shard_key(&catalog, "orders", vec!["a".into()]).unwrap();
        let mut d2 = Design::empty(&catalog);
        d2.set_shard_key(&catalog, "orders", vec!["b".into()]).unwrap();
        assert_ne!(DesignFingerprint::of(&d1), DesignFingerprint::of(&d2));
    }

    #[test]
    fn index_order_does_not_affect_fingerprint() {
        let catalog = catalog();
        let mut d1 = Design::empty(&catalog);
        d1.add_index(&catalog, "orders", vec!["a".into(), "b".into()]).unwrap();
        let mut d2 = Design::empty(&catalog);
        d2.add_index(&catalog, "orders", vec!["b".into(), "a".into()]).unwrap();
        assert_eq!(DesignFingerprint::of(&d1), DesignFingerprint::of(&d2));
    }
}
