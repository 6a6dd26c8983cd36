//! Catalog and workload ingestion (§4.8, §6 "External Interfaces").
//!
//! The core never talks to a live database; it consumes whatever a
//! `CatalogSource`/`WorkloadSource` hands it. The original `designer.py`
//! connects to MongoDB and calls `catalog.generateCatalogFromDatabase` —
//! that connectivity is explicitly out of scope (§1 Non-goals). The only
//! concrete adapter shipped here reads the same shape from a JSON fixture
//! file, which is what the bundled CLI and the `advisor_scenarios`
//! integration tests use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use advisor_core::{AdvisorError, Catalog, Collection, Result, Session, Workload};

/// Source of the schema catalog: collections, fields, statistics.
///
/// A real adapter (not provided here, per §1 Non-goals) would implement
/// this over a live connection the way `catalog.generateCatalogFromDatabase`
/// does; callers only ever see this trait.
pub trait CatalogSource {
    /// Load the catalog. Fails with [`AdvisorError::IngestionError`] on any
    /// I/O, parse, or shape problem.
    fn load(&self) -> Result<Catalog>;
}

/// Source of the workload trace: an ordered session stream.
pub trait WorkloadSource {
    /// Load the workload. Fails with [`AdvisorError::IngestionError`] on any
    /// I/O, parse, or shape problem.
    fn load(&self) -> Result<Workload>;
}

/// On-disk shape of a catalog fixture: a flat list of collections. Kept
/// distinct from [`Catalog`] itself so deserialization always goes through
/// [`Catalog::new`] (and its `$`-prefix / duplicate-name checks) rather than
/// populating the catalog's internal map directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFixture {
    collections: Vec<Collection>,
}

/// On-disk shape of a workload fixture: a flat list of sessions, re-sorted
/// by `start_time` through [`Workload::new`] on load rather than trusted
/// as pre-sorted in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkloadFixture {
    sessions: Vec<Session>,
}

/// Reads a [`Catalog`] from a JSON fixture file shaped
/// `{"collections": [...]}`.
pub struct JsonFileCatalogSource {
    path: std::path::PathBuf,
}

impl JsonFileCatalogSource {
    /// Build a source reading from `path`.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        JsonFileCatalogSource { path: path.into() }
    }
}

impl CatalogSource for JsonFileCatalogSource {
    fn load(&self) -> Result<Catalog> {
        read_catalog_json(&self.path)
    }
}

/// Reads a [`Workload`] from a JSON fixture file shaped
/// `{"sessions": [...]}`.
pub struct JsonFileWorkloadSource {
    path: std::path::PathBuf,
}

impl JsonFileWorkloadSource {
    /// Build a source reading from `path`.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        JsonFileWorkloadSource { path: path.into() }
    }
}

impl WorkloadSource for JsonFileWorkloadSource {
    fn load(&self) -> Result<Workload> {
        read_workload_json(&self.path)
    }
}

fn read_catalog_json(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AdvisorError::IngestionError(format!("failed to read catalog '{}': {e}", path.display())))?;
    let fixture: CatalogFixture = serde_json::from_str(&content)
        .map_err(|e| AdvisorError::IngestionError(format!("failed to parse catalog '{}': {e}", path.display())))?;
    Catalog::new(fixture.collections)
}

fn read_workload_json(path: &Path) -> Result<Workload> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AdvisorError::IngestionError(format!("failed to read workload '{}': {e}", path.display())))?;
    let fixture: WorkloadFixture = serde_json::from_str(&content)
        .map_err(|e| AdvisorError::IngestionError(format!("failed to parse workload '{}': {e}", path.display())))?;
    Ok(Workload::new(fixture.sessions))
}
