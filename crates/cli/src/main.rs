//! `shardsmith` — CLI wiring for the physical-design advisor.
//!
//! Subcommands:
//! - `solve`: load a catalog + workload fixture and an (optional) config
//!   file, seed with the Initial Designer, run the search engine, print the
//!   resulting design.
//! - `cost`: load a catalog + workload + a single design fixture, print its
//!   `overall_cost`.
//! - `print-config`: print the bundled default configuration, equivalent to
//!   the original `designer.py --print-config`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use advisor_api::{
    AdvisorConfig, AdvisorError, Advisor, CatalogSource, Design, JsonFileCatalogSource,
    JsonFileWorkloadSource, Result, WorkloadSource,
};
use advisor_search::Deadline;

/// shardsmith — physical-design advisor for a sharded document database.
#[derive(Parser)]
#[command(name = "shardsmith", version, about)]
struct Cli {
    /// Enable debug-level log output (equivalent to RUST_LOG=debug).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the search engine from the Initial Designer's seed and print the result.
    Solve {
        /// Path to a catalog JSON fixture (`{"collections": [...]}`).
        #[arg(long)]
        catalog: PathBuf,
        /// Path to a workload JSON fixture (`{"sessions": [...]}`).
        #[arg(long)]
        workload: PathBuf,
        /// Path to a `shardsmith.toml` configuration file. Defaults are used
        /// when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Score a single design against a catalog and workload.
    Cost {
        /// Path to a catalog JSON fixture.
        #[arg(long)]
        catalog: PathBuf,
        /// Path to a workload JSON fixture.
        #[arg(long)]
        workload: PathBuf,
        /// Path to a design JSON fixture (the shape `Design` serializes to).
        #[arg(long)]
        design: PathBuf,
        /// Path to a `shardsmith.toml` configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the bundled default configuration.
    PrintConfig,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Command::Solve { catalog, workload, config } => run_solve(catalog, workload, config),
        Command::Cost { catalog, workload, design, config } => run_cost(catalog, workload, design, config),
        Command::PrintConfig => {
            println!("{}", AdvisorConfig::default_toml());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .try_init();
}

fn load_config(path: Option<PathBuf>) -> Result<AdvisorConfig> {
    match path {
        Some(p) => AdvisorConfig::from_file(&p),
        None => Ok(AdvisorConfig::default()),
    }
}

fn run_solve(catalog_path: PathBuf, workload_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let catalog = JsonFileCatalogSource::new(catalog_path).load()?;
    let workload = JsonFileWorkloadSource::new(workload_path).load()?;
    let config = load_config(config_path)?;
    let budget_seconds = config.lns_time_budget_seconds;

    let advisor = Advisor::new(catalog, workload, config)?;
    let seed = advisor.initial_design();
    let seed_cost = advisor.cost_model(&seed);
    println!("seed cost: {seed_cost:.6}");

    let deadline = Deadline::after(Duration::from_secs(budget_seconds));
    let (design, cost) = advisor.solve(seed, &deadline);

    println!("solved cost: {cost:.6}");
    print!("{}", advisor.design_to_string(&design));
    Ok(())
}

fn run_cost(
    catalog_path: PathBuf,
    workload_path: PathBuf,
    design_path: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let catalog = JsonFileCatalogSource::new(catalog_path).load()?;
    let workload = JsonFileWorkloadSource::new(workload_path).load()?;
    let config = load_config(config_path)?;

    let content = std::fs::read_to_string(&design_path).map_err(|e| {
        AdvisorError::IngestionError(format!("failed to read design '{}': {e}", design_path.display()))
    })?;
    let design: Design = serde_json::from_str(&content).map_err(|e| {
        AdvisorError::IngestionError(format!("failed to parse design '{}': {e}", design_path.display()))
    })?;

    let advisor = Advisor::new(catalog, workload, config)?;
    let cost = advisor.cost_model(&design);
    println!("cost: {cost:.6}");
    print!("{}", advisor.design_to_string(&design));
    Ok(())
}
