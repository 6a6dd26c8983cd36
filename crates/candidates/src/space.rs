//! The enumerated candidate space and its validation against a [`Design`].

use std::collections::BTreeMap;

use advisor_core::{AdvisorError, Catalog, Design, Result, Workload};

use crate::enumerate::{index_key_candidates, parent_candidates, shard_key_candidates};

/// The admissible shard keys, index keys, and embedding parents for one
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionCandidates {
    /// Candidate shard-key tuples, in enumeration order.
    pub shard_keys: Vec<Vec<String>>,
    /// Candidate index-key tuples, in enumeration order.
    pub index_keys: Vec<Vec<String>>,
    /// Candidate embedding parents (`None` first), in enumeration order.
    pub parents: Vec<Option<String>>,
}

/// The full per-collection candidate enumeration derived from a catalog and
/// workload, built once and shared read-only across the search engine.
#[derive(Debug, Clone, Default)]
pub struct CandidateSpace {
    collections: BTreeMap<String, CollectionCandidates>,
}

impl CandidateSpace {
    /// Derive the candidate space for every collection in `catalog`.
    pub fn build(catalog: &Catalog, workload: &Workload) -> Self {
        let mut collections = BTreeMap::new();
        for name in catalog.collections() {
            let candidates = CollectionCandidates {
                shard_keys: shard_key_candidates(catalog, name),
                index_keys: index_key_candidates(catalog, name),
                parents: parent_candidates(catalog, workload, name),
            };
            collections.insert(name.to_string(), candidates);
        }
        CandidateSpace { collections }
    }

    /// Candidates for `collection`, or an empty set if it is unknown.
    pub fn for_collection(&self, collection: &str) -> CollectionCandidates {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    /// The restricted product space over exactly `col_subset` — the view
    /// the BB solver branches over.
    pub fn get_candidates(&self, col_subset: &[String]) -> BTreeMap<String, CollectionCandidates> {
        col_subset
            .iter()
            .filter_map(|c| self.collections.get(c).map(|cand| (c.clone(), cand.clone())))
            .collect()
    }

    /// All collections this candidate space covers.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Validate that every decision in `design` is drawn from this
    /// candidate space (§3: "every Design must assign ... from that
    /// collection's candidate enumeration"). Shard keys and index keys are
    /// compared as field *sets*, since enumeration order need not match
    /// assignment order.
    pub fn validate(&self, design: &Design, catalog: &Catalog) -> Result<()> {
        for collection in design.collections() {
            catalog.collection(collection)?;
            let candidates = match self.collections.get(collection) {
                Some(c) => c,
                None => continue,
            };

            let shard_key = design.shard_key(collection);
            if !shard_key.is_empty() && !contains_as_set(&candidates.shard_keys, shard_key) {
                return Err(AdvisorError::invalid_design(
                    collection,
                    format!("shard key {shard_key:?} is not in the candidate enumeration"),
                ));
            }

            for index in design.indexes_for(collection) {
                if !contains_as_set(&candidates.index_keys, index) {
                    return Err(AdvisorError::invalid_design(
                        collection,
                        format!("index {index:?} is not in the candidate enumeration"),
                    ));
                }
            }

            let parent = design.parent_collection(collection).map(str::to_string);
            if !candidates.parents.contains(&parent) {
                return Err(AdvisorError::invalid_design(
                    collection,
                    format!("parent {parent:?} is not in the candidate enumeration"),
                ));
            }
        }
        Ok(())
    }
}

fn contains_as_set(candidates: &[Vec<String>], fields: &[String]) -> bool {
    let mut wanted: Vec<&str> = fields.iter().map(String::as_str).collect();
    wanted.sort_unstable();
    candidates.iter().any(|c| {
        let mut have: Vec<&str> = c.iter().map(String::as_str).collect();
        have.sort_unstable();
        have == wanted
    })
}
