//! Error types for the advisor core.
//!
//! Mirrors the error taxonomy of a unified database error type: named
//! variants with human-readable `#[error(...)]` messages, `pub fn`
//! constructors, and classification predicates so callers can branch on
//! error class without matching every variant.
//!
//! `BudgetExhausted` and `Cancelled` are deliberately *not* represented
//! here — they are not raised as errors. `BudgetExhausted` is a sentinel
//! cost value returned by the disk cost function, and `Cancelled` is the
//! unchanged incumbent design returned by the search engine. Both are
//! ordinary values, not `Result::Err`.

use thiserror::Error;

/// Result type alias for advisor-core operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Unified error type for the advisor core and its collaborators.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A collection named in a design, query, or candidate enumeration does
    /// not exist in the catalog.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// A field named in a shard key, index, or predicate does not exist in
    /// the collection's schema.
    #[error("unknown field {field} on collection {collection}")]
    UnknownField {
        /// Collection the field was looked up on.
        collection: String,
        /// The field name that was not found.
        field: String,
    },

    /// A Design mutation would violate a catalog/candidate-space invariant
    /// (§3): unknown field, non-forest embedding relation, candidate not in
    /// the enumerated space, or a reserved `$`-prefixed field name.
    #[error("invalid design for collection {collection}: {reason}")]
    InvalidDesign {
        /// Collection the mutation targeted.
        collection: String,
        /// Why the mutation was rejected.
        reason: String,
    },

    /// Configuration is missing a required key or a numeric key failed to
    /// parse. Fatal at construction time.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Catalog or workload ingestion failed (I/O, parse, or shape error from
    /// a `CatalogSource`/`WorkloadSource` adapter).
    #[error("ingestion error: {0}")]
    IngestionError(String),
}

impl AdvisorError {
    /// Construct an [`AdvisorError::UnknownField`].
    pub fn unknown_field(collection: impl Into<String>, field: impl Into<String>) -> Self {
        AdvisorError::UnknownField {
            collection: collection.into(),
            field: field.into(),
        }
    }

    /// Construct an [`AdvisorError::InvalidDesign`].
    pub fn invalid_design(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidDesign {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that mean "caller must repair and retry", as opposed
    /// to ones that are fatal to the whole run.
    pub fn is_repairable(&self) -> bool {
        matches!(self, AdvisorError::InvalidDesign { .. })
    }

    /// True for errors that should abort the advisor run entirely (catalog
    /// lookups and configuration are assumed correct by construction; a
    /// miss here means the caller handed the core a broken catalog).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AdvisorError::UnknownCollection(_)
                | AdvisorError::UnknownField { .. }
                | AdvisorError::ConfigError(_)
                | AdvisorError::IngestionError(_)
        )
    }
}
