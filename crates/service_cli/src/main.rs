//! RTS CLI - Command Line Operations for First-Passage Search Simulation
//!
//! This is the operational entry point for the search kernel.
//!
//! # Commands
//!
//! - `rts run [--bins N [--log-bins]]` - Run the configured batch and write
//!   every trial, optionally with a search-time histogram
//! - `rts bench` - Time each set of trials
//! - `rts draws --kind <uniform|normal>` - Dump a raw random stream
//! - `rts check` - Print the effective configuration
//!
//! # Configuration
//!
//! Values are layered: defaults, then the TOML file given by `--config`,
//! then `RTS_*` environment variables, then command line flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliArgs};
use search_kernel::sim::BinScale;

/// Random target search simulation CLI
#[derive(Parser)]
#[command(name = "rts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging unless a level is given)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "RTS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    simulation: SimulationArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Simulation parameter overrides
#[derive(Args, Debug, Default)]
struct SimulationArgs {
    /// Outer radius or cube half-width
    #[arg(long, global = true)]
    system_size: Option<f64>,

    /// Absorbing target radius
    #[arg(long, global = true)]
    target_size: Option<f64>,

    /// Spatial dimension
    #[arg(short, long, global = true)]
    dimension: Option<usize>,

    /// Outer shape (sphere, cube)
    #[arg(long, global = true)]
    shape: Option<String>,

    /// Outer boundary condition (reflecting, periodic)
    #[arg(long, global = true)]
    boundary: Option<String>,

    /// Target centre as comma-separated coordinates
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        num_args = 1..,
        allow_hyphen_values = true
    )]
    target_center: Option<Vec<f64>>,

    /// Simulated time per step
    #[arg(long, global = true)]
    time_scale: Option<f64>,

    /// Gaussian truncation bound per axis
    #[arg(long, global = true)]
    max_step_magnitude: Option<f64>,

    /// Number of searchers (seed derivation input)
    #[arg(long, global = true)]
    searcher_count: Option<u32>,

    /// Repetitions per set
    #[arg(short, long, global = true)]
    repeat_count: Option<u32>,

    /// Number of sets
    #[arg(short, long, global = true)]
    set_count: Option<u32>,

    /// Base seed
    #[arg(long, global = true, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Per-trial step cap
    #[arg(long, global = true)]
    max_steps: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every set and write the trial outcomes
    Run {
        /// Output format (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Search-time histogram bins in table and JSON output
        #[arg(long)]
        bins: Option<usize>,

        /// Space histogram bins logarithmically
        #[arg(long, requires = "bins")]
        log_bins: bool,
    },

    /// Time each set of trials
    Bench,

    /// Write a raw random stream from the base seed
    Draws {
        /// Stream kind (uniform, normal)
        #[arg(short, long, default_value = "uniform")]
        kind: String,

        /// Number of draws
        #[arg(short = 'n', long, default_value = "1000")]
        count: usize,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate and print the effective configuration
    Check,
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        let sim = &self.simulation;
        CliArgs {
            config_file: self.config.clone(),
            system_size: sim.system_size,
            target_size: sim.target_size,
            dimension: sim.dimension,
            shape: sim.shape.clone(),
            boundary: sim.boundary.clone(),
            target_center: sim.target_center.clone(),
            time_scale: sim.time_scale,
            max_step_magnitude: sim.max_step_magnitude,
            searcher_count: sim.searcher_count,
            repeat_count: sim.repeat_count,
            set_count: sim.set_count,
            seed: sim.seed,
            max_steps: sim.max_steps,
            log_level: self
                .log_level
                .clone()
                .or_else(|| self.verbose.then(|| "debug".to_string())),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args())?;

    init_tracing(config.log_level.as_filter_str());

    info!("RTS v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        system_size = config.system_size,
        target_size = config.target_size,
        dimension = config.dimension,
        shape = %config.shape,
        boundary = %config.boundary,
        time_scale = config.time_scale,
        base_seed = config.base_seed,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Run {
            format,
            output,
            bins,
            log_bins,
        } => {
            let histogram = bins.map(|bins| commands::run::HistogramSpec {
                bins,
                scale: if log_bins { BinScale::Log } else { BinScale::Linear },
            });
            commands::run::run(&config, &format, output.as_deref(), histogram)
        }
        Commands::Bench => commands::bench::run(&config),
        Commands::Draws {
            kind,
            count,
            output,
        } => commands::draws::run(&config, &kind, count, output.as_deref()),
        Commands::Check => commands::check::run(&config),
    }
}
