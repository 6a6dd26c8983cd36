//! Queries: the unit of work inside a session.

use serde::{Deserialize, Serialize};

/// The kind of operation a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// Document insertion. Carries no predicates.
    Insert,
    /// Document update by predicate.
    Update,
    /// Document deletion by predicate.
    Delete,
    /// Document read by predicate.
    Select,
}

impl OperationType {
    /// True for [`OperationType::Select`].
    pub fn is_select(self) -> bool {
        matches!(self, OperationType::Select)
    }
}

/// The kind of a single predicate clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateKind {
    /// Exact-match predicate (`field = value`).
    Equality,
    /// Range predicate (`field > value`, `field BETWEEN ...`, etc).
    Range,
    /// Any other predicate shape (e.g. regex, `$in`, geo).
    Other,
}

/// An immutable query record.
///
/// Predicates are stored in insertion order, not sorted — the network cost
/// model's last-match tie-break (§4.4) depends on iterating them in the
/// order they were recorded in the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// The collection this query targets.
    pub collection: String,
    /// The operation type.
    pub op: OperationType,
    /// Predicate clauses, in insertion (trace) order. Empty for inserts.
    pub predicates: Vec<(String, PredicateKind)>,
}

impl Query {
    /// Construct an insert query (predicates are always empty).
    pub fn insert(collection: impl Into<String>) -> Self {
        Query {
            collection: collection.into(),
            op: OperationType::Insert,
            predicates: Vec::new(),
        }
    }

    /// Construct a select/update/delete query with predicates.
    pub fn with_predicates(
        collection: impl Into<String>,
        op: OperationType,
        predicates: Vec<(String, PredicateKind)>,
    ) -> Self {
        Query {
            collection: collection.into(),
            op,
            predicates,
        }
    }

    /// The set of predicate field names, in iteration order.
    pub fn predicate_fields(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|(f, _)| f.as_str())
    }
}
