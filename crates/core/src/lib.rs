//! Catalog, workload, and design data model for the physical-design advisor.
//!
//! This crate defines the types every other advisor crate builds on: the
//! schema [`catalog::Catalog`], the [`workload::Workload`] trace, and the
//! mutable [`design::Design`] that the search engine explores. It has no
//! notion of cost or candidate enumeration — those live in `advisor-costmodel`
//! and `advisor-candidates` respectively, layered on top of these types.

pub mod catalog;
pub mod deadline;
pub mod design;
pub mod error;
pub mod query;
pub mod session;
pub mod timestamp;
pub mod workload;

pub use catalog::{Catalog, Collection, FieldStats};
pub use deadline::Deadline;
pub use design::{CollectionDesign, Design};
pub use error::{AdvisorError, Result};
pub use query::{OperationType, PredicateKind, Query};
pub use session::Session;
pub use timestamp::Timestamp;
pub use workload::Workload;
