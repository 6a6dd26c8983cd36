//! # shardsmith
//!
//! A physical-design advisor for a sharded document database: given a
//! catalog (collection schemas and field statistics) and a workload (a
//! session trace of queries), searches for a shard key, secondary index, and
//! embedding-parent assignment per collection that minimizes a combined
//! network/disk/skew cost model.
//!
//! # Quick start
//!
//! ```no_run
//! use shardsmith::{Advisor, AdvisorConfig, CatalogSource, Deadline, JsonFileCatalogSource, JsonFileWorkloadSource, WorkloadSource};
//! use std::time::Duration;
//!
//! fn main() -> shardsmith::Result<()> {
//!     let catalog = JsonFileCatalogSource::new("catalog.json").load()?;
//!     let workload = JsonFileWorkloadSource::new("workload.json").load()?;
//!     let advisor = Advisor::new(catalog, workload, AdvisorConfig::default())?;
//!
//!     let seed = advisor.initial_design();
//!     let (design, cost) = advisor.solve(seed, &Deadline::after(Duration::from_secs(60)));
//!     println!("{}", advisor.design_to_string(&design));
//!     println!("cost = {cost}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The search is split across collaborating crates, each owning one piece of
//! the advisor's design:
//!
//! - `advisor-core`: the catalog, workload, and design data model, plus the
//!   unified error type.
//! - `advisor-candidates`: the finite, catalog-derived space of admissible
//!   shard keys, index sets, and embedding parents.
//! - `advisor-costmodel`: the pure `overall_cost(design, catalog, workload,
//!   config) -> f64` function — network, disk, and skew sub-costs.
//! - `advisor-search`: the Initial Designer seed, the branch-and-bound inner
//!   solver, and the Large Neighborhood Search outer loop.
//! - `advisor-api` (this crate's direct dependency): configuration,
//!   catalog/workload ingestion, and the [`Advisor`] facade tying the above
//!   together behind the three operations a caller needs — `cost_model`,
//!   `solve`, `design_to_string`.
//!
//! This crate re-exports that facade; most callers only need
//! `use shardsmith::*`.

pub use advisor_api::*;
