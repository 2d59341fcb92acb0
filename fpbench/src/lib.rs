#![warn(missing_docs)]
//! # fpbench
//!
//! Per-call latency measurement of floating-point operations across numeric backends.
//!
//! fpbench times one operation at a time against every backend of its class:
//! - **Native**: hardware `f64` arithmetic and the platform math library
//! - **Strict**: reproducible software math (`libm`), transcendental operations only
//! - **MPFR**: arbitrary precision at a fixed precision and rounding mode (`rug`)
//! - **Micro**: reduced-precision formats (`bf16`, `f16`) emulated in software
//!
//! All backends read the same operand pool, run a warmup phase, then time
//! each call individually. The run ends with one summary line per operation
//! holding mean and standard deviation per backend.
//!
//! ## Quick Start
//!
//! ```text
//! $ fpbench sin --iterations 100000 --seed 42 --output-dir results
//! $ cat results/sin.csv
//! ```
//!
//! ## Library Use
//!
//! ```ignore
//! use fpbench::{Operation, RunConfig, run_experiment};
//!
//! let config = RunConfig { seed: Some(1), ..RunConfig::default() };
//! let outcome = run_experiment(Operation::Exp, &config)?;
//! println!("{}", outcome.record);
//! ```

// Re-export core types
pub use fpbench_core::{
    Arity, Backend, BackendKind, DriverConfig, EXPERIMENTS, ExperimentDescriptor, LatencySamples,
    MicroBackend, MpfrBackend, NativeBackend, OperandPool, Operation, OperationClass,
    PrecisionContext, ReducedFormat, Rounding, StrictBackend, TimingDriver, capture_values,
};

// Re-export stats
pub use fpbench_stats::{SummaryStatistics, compute_summaries, compute_summary};

// Re-export report
pub use fpbench_report::{SummaryRecord, write_samples, write_summary};

// Re-export runner
pub use fpbench_cli::{ExperimentOutcome, FpConfig, RunConfig, run_experiment};

/// Run the fpbench CLI harness.
///
/// Call this from the binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     fpbench::run()
/// }
/// ```
pub use fpbench_cli::run;
