//! Public API layer for the physical-design advisor.
//!
//! This crate is the thin collaborator layer §1 describes as "out of
//! scope": configuration loading ([`config`]), catalog/workload ingestion
//! ([`ingest`]), and the [`Advisor`] facade that wires `advisor-core`,
//! `advisor-candidates`, `advisor-costmodel`, and `advisor-search` together
//! behind the three operations §6 names — `cost_model`, `solve`, and
//! `design_to_string`. The hard engineering (cost model, search engine)
//! lives entirely in the crates this one depends on.

pub mod advisor;
pub mod config;
pub mod ingest;

pub use advisor::{design_to_string, Advisor};
pub use config::AdvisorConfig;
pub use ingest::{CatalogSource, JsonFileCatalogSource, JsonFileWorkloadSource, WorkloadSource};

// Re-export the core and search types a caller typically needs alongside
// the facade, so most callers only need `use advisor_api::*`.
pub use advisor_core::{
    AdvisorError, Catalog, Collection, CollectionDesign, Design, FieldStats, OperationType,
    PredicateKind, Query, Result, Session, Timestamp, Workload,
};
pub use advisor_search::Deadline;
