#![warn(missing_docs)]
//! fpbench CLI Library
//!
//! Command-line entry point for the `fpbench` binary: parses exactly one
//! operation name, layers configuration (`fpbench.toml` then flags), and runs
//! the experiment.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     fpbench_cli::run()
//! }
//! ```

mod config;
mod runner;

pub use config::*;
pub use runner::{ConfigError, ExperimentOutcome, RunConfig, run_experiment};

use anyhow::Context;
use clap::Parser;
use fpbench_core::{DriverConfig, Operation, PrecisionContext, ReducedFormat, Rounding};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit status for invalid invocations (wrong argument count, unknown operation)
pub const USAGE_EXIT_CODE: i32 = 2;

/// fpbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fpbench")]
#[command(
    author,
    version,
    about = "fpbench - per-call latency of floating-point backends"
)]
pub struct Cli {
    /// Operation to benchmark: add, sub, mul, div, sqrt, log, exp, pow, sin, cos, tan
    pub operation: Operation,

    /// Warmup iterations per backend
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Measured iterations per backend
    #[arg(long, short = 'n')]
    pub iterations: Option<usize>,

    /// Number of operand pairs
    #[arg(long)]
    pub pool_size: Option<usize>,

    /// Seed for a reproducible operand pool
    #[arg(long)]
    pub seed: Option<u64>,

    /// Existing directory receiving results
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write raw per-call durations
    #[arg(long)]
    pub dump_samples: bool,

    /// Arbitrary-precision significand bits
    #[arg(long)]
    pub precision: Option<u32>,

    /// Arbitrary-precision rounding mode: nearest, zero, up, down
    #[arg(long)]
    pub rounding: Option<Rounding>,

    /// Reduced-precision format: bf16, f16
    #[arg(long)]
    pub reduced_format: Option<ReducedFormat>,

    /// Pin the run thread to this CPU
    #[arg(long)]
    pub pin_cpu: Option<usize>,

    /// Configuration file (default: discover fpbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the fpbench CLI with the process arguments.
///
/// Usage errors are printed on standard output and terminate the process
/// with [`USAGE_EXIT_CODE`] before any measurement.
pub fn run() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            println!("{}", err.render());
            std::process::exit(USAGE_EXIT_CODE);
        }
        // --help and --version
        Err(err) => err.exit(),
    };
    run_with_cli(cli)
}

/// Run the fpbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let run_config = build_run_config(&cli, &config);

    println!(
        "Running {} ({} backends, {} warmup + {} measured calls each)...",
        cli.operation,
        cli.operation.class().backends().len(),
        run_config.driver.warmup_count,
        run_config.driver.exec_count
    );

    let outcome = run_experiment(cli.operation, &run_config)?;

    println!("{}", outcome.record);
    println!("Wrote {}", outcome.summary_path.display());
    for path in &outcome.sample_paths {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "fpbench=debug" } else { "fpbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded; keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Explicit `--config` must load; a discovered file must parse; otherwise defaults.
fn load_config(cli: &Cli) -> anyhow::Result<FpConfig> {
    if let Some(path) = &cli.config {
        return FpConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match FpConfig::discover_path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using discovered config");
            FpConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(FpConfig::default()),
    }
}

/// Build a RunConfig by layering: fpbench.toml values → CLI overrides.
pub fn build_run_config(cli: &Cli, config: &FpConfig) -> RunConfig {
    RunConfig {
        driver: DriverConfig {
            warmup_count: cli.warmup.unwrap_or(config.runner.warmup_count),
            exec_count: cli.iterations.unwrap_or(config.runner.exec_count),
        },
        pool_size: cli.pool_size.unwrap_or(config.runner.pool_size),
        seed: cli.seed.or(config.runner.seed),
        pin_cpu: cli.pin_cpu.or(config.runner.pin_cpu),
        precision: PrecisionContext {
            precision: cli.precision.unwrap_or(config.precision.bits),
            rounding: cli.rounding.unwrap_or(config.precision.rounding),
        },
        reduced_format: cli.reduced_format.unwrap_or(config.reduced.format),
        output_dir: cli
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output.directory.clone()),
        dump_samples: cli.dump_samples || config.output.dump_samples,
    }
}
