//! Cost-model weighting and sizing configuration.

use serde::{Deserialize, Serialize};

use advisor_core::{AdvisorError, Result};

/// Weights and sizing parameters the cost model needs. Loaded from
/// `shardsmith.toml` by `advisor-api::AdvisorConfig`, which embeds this
/// struct under its `[cost_model]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModelConfig {
    /// Weight of the network sub-cost in the combined score.
    pub weight_network: f64,
    /// Weight of the disk sub-cost in the combined score.
    pub weight_disk: f64,
    /// Weight of the skew sub-cost in the combined score.
    pub weight_skew: f64,
    /// Shard count.
    pub nodes: u32,
    /// Per-node memory budget, in megabytes.
    pub max_memory_mb: u64,
    /// Configured index-entry size in bytes. The cost model divides this by
    /// 4 internally before use — an undocumented quirk of the source system
    /// preserved here deliberately (see disk cost).
    pub address_size: u64,
    /// Number of boundaries used to slice the workload into time segments
    /// for skew cost. Must be ≥ 2; the number of segments produced is
    /// `skew_intervals - 1`.
    pub skew_intervals: u32,
}

impl CostModelConfig {
    /// Validate the configuration, failing with [`AdvisorError::ConfigError`]
    /// on any out-of-range value.
    pub fn validate(&self) -> Result<()> {
        if self.weight_network < 0.0 || self.weight_disk < 0.0 || self.weight_skew < 0.0 {
            return Err(AdvisorError::ConfigError(
                "cost model weights must be non-negative".into(),
            ));
        }
        if self.weight_network + self.weight_disk + self.weight_skew <= 0.0 {
            return Err(AdvisorError::ConfigError(
                "at least one cost model weight must be positive".into(),
            ));
        }
        if self.nodes == 0 {
            return Err(AdvisorError::ConfigError("nodes must be >= 1".into()));
        }
        if self.max_memory_mb == 0 {
            return Err(AdvisorError::ConfigError("max_memory_mb must be >= 1".into()));
        }
        if self.address_size == 0 {
            return Err(AdvisorError::ConfigError("address_size must be >= 1".into()));
        }
        if self.skew_intervals < 2 {
            return Err(AdvisorError::ConfigError("skew_intervals must be >= 2".into()));
        }
        Ok(())
    }

    /// The per-node memory budget converted to bytes across all nodes:
    /// `max_memory_mb * 1024 * 1024 * nodes`.
    pub fn max_memory_bytes(&self) -> f64 {
        self.max_memory_mb as f64 * 1024.0 * 1024.0 * self.nodes as f64
    }

    /// `address_size / 4` — the per-index-entry byte cost actually used by
    /// the disk cost model.
    pub fn effective_address_size(&self) -> f64 {
        self.address_size as f64 / 4.0
    }
}

impl Default for CostModelConfig {
    fn default() -> Self {
        CostModelConfig {
            weight_network: 1.0,
            weight_disk: 1.0,
            weight_skew: 1.0,
            nodes: 4,
            max_memory_mb: 1024,
            address_size: 16,
            skew_intervals: 5,
        }
    }
}
