//! The Design: a mutable, per-collection physical-design decision set.
//!
//! A `Design` is built by the Initial Designer, then cloned and mutated by
//! the branch-and-bound and LNS search components. Every mutation is
//! validated against the catalog-level invariants of spec §3 at the point
//! of mutation (`InvalidDesign` on violation); validation against the
//! *candidate space* (§4.3 — is this shard key/index/parent one of the
//! finitely many admissible choices?) is a separate concern layered on top
//! by `advisor-candidates`, since `Design` has no notion of what candidates
//! exist, only of what the catalog allows structurally.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RESERVED_FIELD_PREFIX};
use crate::error::{AdvisorError, Result};

/// Per-collection decisions: shard key, secondary indexes, embedding parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDesign {
    /// Ordered shard key fields. Empty means unsharded (single node).
    pub shard_key: Vec<String>,
    /// Secondary index key tuples.
    pub indexes: BTreeSet<Vec<String>>,
    /// The collection this one is embedded under, or `None` if it is a root.
    pub embedding_parent: Option<String>,
}

/// A complete physical design: one [`CollectionDesign`] per collection in
/// scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    collections: BTreeMap<String, CollectionDesign>,
}

fn validate_fields(fields: &[String]) -> Result<()> {
    for f in fields {
        if f.starts_with(RESERVED_FIELD_PREFIX) {
            return Err(AdvisorError::invalid_design(
                "*",
                format!("field {f} begins with reserved marker '$'"),
            ));
        }
    }
    Ok(())
}

impl Design {
    /// Build a design with every catalog collection present, unsharded, no
    /// indexes, no embedding parent — the structural identity design.
    pub fn empty(catalog: &Catalog) -> Self {
        let collections = catalog
            .collections()
            .map(|name| (name.to_string(), CollectionDesign::default()))
            .collect();
        Design { collections }
    }

    /// True if `collection` has a decision recorded in this design.
    pub fn has_collection(&self, collection: &str) -> bool {
        self.collections.contains_key(collection)
    }

    /// The collection names present in this design, in catalog order.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// The shard key for `collection`, or `&[]` if unsharded / absent.
    pub fn shard_key(&self, collection: &str) -> &[String] {
        self.collections
            .get(collection)
            .map(|c| c.shard_key.as_slice())
            .unwrap_or(&[])
    }

    /// True if `field` is part of `collection`'s shard key.
    pub fn in_shard_key(&self, collection: &str, field: &str) -> bool {
        self.shard_key(collection).iter().any(|f| f == field)
    }

    /// The index key tuples defined on `collection`.
    pub fn indexes_for(&self, collection: &str) -> impl Iterator<Item = &Vec<String>> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(|c| c.indexes.iter())
    }

    /// True if `collection` has an index whose field set exactly matches
    /// `fields` (order-insensitive — an index key tuple is a candidate field
    /// *set* for this purpose).
    pub fn has_index(&self, collection: &str, fields: &[String]) -> bool {
        let mut wanted: Vec<&str> = fields.iter().map(String::as_str).collect();
        wanted.sort_unstable();
        self.indexes_for(collection).any(|idx| {
            let mut have: Vec<&str> = idx.iter().map(String::as_str).collect();
            have.sort_unstable();
            have == wanted
        })
    }

    /// The embedding parent of `collection`, or `None` if it is a root (or
    /// absent from the design).
    pub fn parent_collection(&self, collection: &str) -> Option<&str> {
        self.collections
            .get(collection)
            .and_then(|c| c.embedding_parent.as_deref())
    }

    /// Replace `collection`'s shard key.
    ///
    /// Fails with `InvalidDesign` if `collection` is unknown, any field is
    /// unknown on that collection's schema, or any field begins with `$`.
    pub fn set_shard_key(
        &mut self,
        catalog: &Catalog,
        collection: &str,
        fields: Vec<String>,
    ) -> Result<()> {
        validate_fields(&fields)?;
        let schema = catalog.collection(collection)?;
        for f in &fields {
            if !schema.has_field(f) {
                return Err(AdvisorError::unknown_field(collection, f.clone()));
            }
        }
        let entry = self.collections.entry(collection.to_string()).or_default();
        entry.shard_key = fields;
        Ok(())
    }

    /// Add a secondary index key tuple to `collection`.
    ///
    /// Fails with `InvalidDesign` under the same conditions as
    /// [`Design::set_shard_key`].
    pub fn add_index(&mut self, catalog: &Catalog, collection: &str, fields: Vec<String>) -> Result<()> {
        validate_fields(&fields)?;
        let schema = catalog.collection(collection)?;
        for f in &fields {
            if !schema.has_field(f) {
                return Err(AdvisorError::unknown_field(collection, f.clone()));
            }
        }
        let entry = self.collections.entry(collection.to_string()).or_default();
        entry.indexes.insert(fields);
        Ok(())
    }

    /// Replace `collection`'s entire secondary index set in one call.
    ///
    /// Used by the branch-and-bound solver (`advisor-search`), which needs
    /// to commit exactly one candidate index set per collection per branch
    /// rather than accumulate indexes across attempts the way repeated
    /// `add_index` calls would. Fails under the same conditions as
    /// [`Design::add_index`].
    pub fn set_indexes(
        &mut self,
        catalog: &Catalog,
        collection: &str,
        indexes: BTreeSet<Vec<String>>,
    ) -> Result<()> {
        let schema = catalog.collection(collection)?;
        for idx in &indexes {
            validate_fields(idx)?;
            for f in idx {
                if !schema.has_field(f) {
                    return Err(AdvisorError::unknown_field(collection, f.clone()));
                }
            }
        }
        let entry = self.collections.entry(collection.to_string()).or_default();
        entry.indexes = indexes;
        Ok(())
    }

    /// Set (or clear) `collection`'s embedding parent.
    ///
    /// Fails with `InvalidDesign` if `parent` is unknown, equals
    /// `collection` itself, or would make the embedding relation cyclic —
    /// the relation must remain a forest (§3).
    pub fn set_parent(
        &mut self,
        catalog: &Catalog,
        collection: &str,
        parent: Option<String>,
    ) -> Result<()> {
        if let Some(p) = &parent {
            catalog.collection(p)?;
            if p == collection {
                return Err(AdvisorError::invalid_design(
                    collection,
                    "a collection cannot embed under itself",
                ));
            }
            // Walk the parent chain starting at `p`; if we ever reach
            // `collection` again the new edge would close a cycle.
            let mut cursor = p.clone();
            let mut hops = 0usize;
            let limit = self.collections.len() + 1;
            while let Some(next) = self.parent_collection(&cursor) {
                if next == collection {
                    return Err(AdvisorError::invalid_design(
                        collection,
                        format!("embedding {collection} under {p} would create a cycle"),
                    ));
                }
                cursor = next.to_string();
                hops += 1;
                if hops > limit {
                    return Err(AdvisorError::invalid_design(
                        collection,
                        "embedding relation is already cyclic",
                    ));
                }
            }
        }
        catalog.collection(collection)?;
        let entry = self.collections.entry(collection.to_string()).or_default();
        entry.embedding_parent = parent;
        Ok(())
    }
}
