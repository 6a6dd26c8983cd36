//! The schema catalog: collections, fields, and the statistics the cost
//! model treats as ground truth.
//!
//! Statistics are projected into strongly-typed structs at this boundary
//! (per Design Note "Dict-valued statistics") and never threaded through
//! `advisor-costmodel`/`advisor-search` as untyped maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// Reserved prefix for escape-encoded field names. No field, index key, or
/// shard key component may begin with this character once it reaches the
/// core boundary — the catalog loader is responsible for un-escaping them
/// before ingest.
pub const RESERVED_FIELD_PREFIX: char = '$';

/// Per-field statistics used by the cost model's routing and disk
/// estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Number of queries in the workload whose predicate touches this field.
    pub query_use_count: u32,
    /// Number of distinct values this field takes across the collection.
    pub cardinality: u64,
    /// `cardinality / tuple_count`, in `(0, 1]`.
    pub selectivity: f64,
    /// Whether an equality predicate on this field can be served efficiently
    /// (e.g. it appears in an equality-friendly access path).
    pub equality_ok: bool,
    /// Whether a range predicate on this field can be served efficiently.
    pub range_ok: bool,
}

impl FieldStats {
    /// Construct field statistics, validating `selectivity ∈ (0, 1]`.
    pub fn new(
        query_use_count: u32,
        cardinality: u64,
        selectivity: f64,
        equality_ok: bool,
        range_ok: bool,
    ) -> Result<Self> {
        if !(selectivity > 0.0 && selectivity <= 1.0) {
            return Err(AdvisorError::IngestionError(format!(
                "selectivity {selectivity} out of range (0, 1]"
            )));
        }
        Ok(FieldStats {
            query_use_count,
            cardinality,
            selectivity,
            equality_ok,
            range_ok,
        })
    }
}

/// A collection (the document-database analogue of a table): its size,
/// workload footprint, and per-field statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name.
    pub name: String,
    /// Tuple (document) count, `N`.
    pub tuple_count: u64,
    /// Average document size in bytes.
    pub avg_doc_size: f64,
    /// Fraction of workload queries that target this collection, in `[0, 1]`.
    pub workload_share: f64,
    /// Number of pages required to fully scan the collection.
    pub max_pages: u64,
    /// Per-field statistics, keyed by field name.
    pub fields: BTreeMap<String, FieldStats>,
}

impl Collection {
    /// Look up a field's statistics, failing with [`AdvisorError::UnknownField`]
    /// if the field is not part of this collection's schema.
    pub fn field_stats(&self, field: &str) -> Result<&FieldStats> {
        self.fields
            .get(field)
            .ok_or_else(|| AdvisorError::unknown_field(&self.name, field))
    }

    /// True if `field` exists in this collection's schema.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// Immutable, read-only snapshot of the schema catalog.
///
/// Constructed once from a `CatalogSource` and shared (read-only, `Sync`)
/// across the whole search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    collections: BTreeMap<String, Collection>,
}

impl Catalog {
    /// Build a catalog from its collections, rejecting any field name that
    /// begins with the reserved `$` marker (see [`RESERVED_FIELD_PREFIX`]) —
    /// such names must already have been un-escaped by the catalog loader.
    pub fn new(collections: Vec<Collection>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for col in collections {
            for field in col.fields.keys() {
                if field.starts_with(RESERVED_FIELD_PREFIX) {
                    return Err(AdvisorError::IngestionError(format!(
                        "collection {} has un-escaped reserved field name {field}",
                        col.name
                    )));
                }
            }
            map.insert(col.name.clone(), col);
        }
        Ok(Catalog { collections: map })
    }

    /// The set of collection names in this catalog.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Look up a collection, failing with [`AdvisorError::UnknownCollection`].
    pub fn collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| AdvisorError::UnknownCollection(name.to_string()))
    }

    /// Look up a field's statistics on a given collection.
    pub fn field_stats(&self, collection: &str, field: &str) -> Result<&FieldStats> {
        self.collection(collection)?.field_stats(field)
    }

    /// Number of collections in the catalog.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// True if the catalog has no collections.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
