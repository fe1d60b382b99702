//! simplexnet CLI - container networks as simplicial complexes
//!
//! Plans the networks of a declared complex, and reports on the topology of
//! declared or captured networks.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// simplexnet - topology-aware container networks
#[derive(Parser)]
#[command(name = "simplexnet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan and analyze container networks as simplicial complexes")]
#[command(long_about = r#"
Every declared network is a grouping of containers. simplexnet treats each
grouping as a simplex, creates one network per maximal grouping, and reports
connectivity and holes of the resulting topology.

Examples:
  simplexnet plan torus.toml          # Show the actions a deployment would take
  simplexnet report torus.toml        # Betti numbers and minimal cycles
  simplexnet analyze captured.json    # Topology of captured network memberships
  simplexnet inventory torus torus_0 torus_1-simplex_0 other_3
"#)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a declared complex against a dry-run backend
    Plan {
        /// Declaration file (.toml or .json)
        file: PathBuf,

        /// Prefix for interfaces created inside containers
        #[arg(long, env = "SIMPLEXNET_INTERFACE_PREFIX")]
        interface_prefix: Option<String>,
    },

    /// Report on the topology of a declared complex
    Report {
        /// Declaration file (.toml or .json)
        file: PathBuf,
    },

    /// Report on captured live network memberships
    Analyze {
        /// Membership file (.toml or .json)
        file: PathBuf,
    },

    /// List which resource names belong to a complex
    Inventory {
        /// Complex name
        complex: String,

        /// Resource names to check
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("simplexnet={0},complex={0},orchestrator={0},warn", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let output = output::OutputHandler::new(!cli.no_color);

    match cli.command {
        Commands::Plan { file, interface_prefix } => {
            let options = orchestrator::DeployOptions { interface_prefix };
            commands::plan(&file, &options, &output, cli.json).await?
        }
        Commands::Report { file } => commands::report(&file, &output, cli.json)?,
        Commands::Analyze { file } => commands::analyze(&file, &output, cli.json)?,
        Commands::Inventory { complex, names } => commands::inventory(&complex, &names, &output, cli.json)?,
    }

    Ok(())
}
