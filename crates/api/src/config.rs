//! Advisor configuration loaded from `shardsmith.toml` (§6).
//!
//! A `serde`-deserializable struct with a bundled default-with-comments
//! TOML, eager validation at load time (not deferred to first use), and
//! `from_file`/`write_default_if_missing` helpers so the CLI's config file
//! can be edited directly and picked up on the next run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use advisor_core::{AdvisorError, Result};
use advisor_costmodel::CostModelConfig;

/// Config file name placed alongside the catalog/workload fixtures.
pub const CONFIG_FILE_NAME: &str = "shardsmith.toml";

/// Top-level advisor configuration (§6 "Configuration").
///
/// The cost-model weights/sizing live in `[cost_model]`; the search-engine
/// knobs (`window_size`, `lns_time_budget_seconds`) are advisor-level since
/// they govern ingestion windowing and the outer LNS loop, not the cost
/// function itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Cost-model weights and sizing (§6: `weight_network`, `weight_disk`,
    /// `weight_skew`, `nodes`, `max_memory`, `address_size`, `skew_intervals`).
    pub cost_model: CostModelConfig,
    /// Session window size for `Catalog::sub_workload`/`sessions_in`
    /// construction (§6 `window_size`).
    #[serde(default = "default_window_size")]
    pub window_size: u32,
    /// Wall-clock budget, in seconds, for the LNS outer loop (§6
    /// `lns_time_budget_seconds`).
    #[serde(default = "default_lns_budget")]
    pub lns_time_budget_seconds: u64,
}

fn default_window_size() -> u32 {
    500
}

fn default_lns_budget() -> u64 {
    60
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            cost_model: CostModelConfig::default(),
            window_size: default_window_size(),
            lns_time_budget_seconds: default_lns_budget(),
        }
    }
}

impl AdvisorConfig {
    /// Validate every recognized key (§7 `ConfigError`): cost-model weights
    /// and sizing via [`CostModelConfig::validate`], plus `window_size` and
    /// `lns_time_budget_seconds` being non-zero.
    pub fn validate(&self) -> Result<()> {
        self.cost_model.validate()?;
        if self.window_size == 0 {
            return Err(AdvisorError::ConfigError("window_size must be >= 1".into()));
        }
        if self.lns_time_budget_seconds == 0 {
            return Err(AdvisorError::ConfigError(
                "lns_time_budget_seconds must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// The bundled default configuration as commented TOML text, used by
    /// both `write_default_if_missing` and the CLI's `--print-config` flag
    /// (mirroring the original `designer.py --print-config`).
    pub fn default_toml() -> &'static str {
        r#"# shardsmith configuration
#
# Cost model weights and sizing. The combined cost is
#   c = (weight_network * Net + weight_disk * Disk + weight_skew * Skew)
#       / (weight_network + weight_disk + weight_skew)
[cost_model]
weight_network = 1.0
weight_disk = 1.0
weight_skew = 1.0

# Shard count.
nodes = 4

# Per-node memory budget, in megabytes. Internally multiplied by
# 1024 * 1024 * nodes to yield a byte budget.
max_memory_mb = 1024

# Configured index-entry size in bytes. Divided by 4 internally before use
# (an undocumented quirk of the source system, preserved for fidelity).
address_size = 16

# Number of boundaries used to slice the workload into time segments for
# skew cost. Must be >= 2; the number of segments produced is
# skew_intervals - 1.
skew_intervals = 5

# Session window size used when constructing sub-workload views.
window_size = 500

# Wall-clock budget, in seconds, for the LNS outer loop.
lns_time_budget_seconds = 60
"#
    }

    /// Read and parse configuration from a TOML file, validating eagerly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::ConfigError(format!("failed to read '{}': {e}", path.display())))?;
        let config: AdvisorConfig = toml::from_str(&content)
            .map_err(|e| AdvisorError::ConfigError(format!("failed to parse '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the bundled default config to `path` if no file exists there
    /// yet; a no-op (not an overwrite) if one already does.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())
                .map_err(|e| AdvisorError::ConfigError(format!("failed to write '{}': {e}", path.display())))?;
        }
        Ok(())
    }
}
