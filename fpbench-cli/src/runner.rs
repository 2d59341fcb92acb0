//! Experiment Runner
//!
//! Maps an operation to its backend set and runs the full pipeline:
//!
//! ```text
//! Operation ──► OperandPool (once)
//!                   │
//!                   ▼
//!     for each backend of the class, in column order:
//!         TimingDriver: warmup ──► measure ──► LatencySamples
//!                   │
//!                   ▼
//!         statistics (parallel, after all timing)
//!                   │
//!                   ▼
//!         <dir>/<op>.csv  (+ optional <backend>_<op>.csv dumps)
//! ```

use anyhow::Context;
use fpbench_core::{
    Backend, BackendKind, DriverConfig, LatencySamples, MAX_CPUS, MicroBackend, MpfrBackend,
    NativeBackend, OperandPool, Operation, PrecisionContext, ReducedFormat, StrictBackend,
    TimingDriver, pin_to_cpu,
};
use fpbench_report::{ReportError, SummaryRecord, write_samples, write_summary};
use fpbench_stats::{SummaryStatistics, compute_summaries};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Warmup and measurement counts
    pub driver: DriverConfig,
    /// Number of operand pairs
    pub pool_size: usize,
    /// Seed for a reproducible operand pool
    pub seed: Option<u64>,
    /// CPU to pin the run thread to
    pub pin_cpu: Option<usize>,
    /// Arbitrary-precision context
    pub precision: PrecisionContext,
    /// Reduced-precision format
    pub reduced_format: ReducedFormat,
    /// Existing directory receiving results
    pub output_dir: PathBuf,
    /// Write raw per-call durations
    pub dump_samples: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            driver: DriverConfig::default(),
            pool_size: fpbench_core::DEFAULT_POOL_SIZE,
            seed: None,
            pin_cpu: None,
            precision: PrecisionContext::default(),
            reduced_format: ReducedFormat::default(),
            output_dir: PathBuf::from("."),
            dump_samples: false,
        }
    }
}

/// Settings that cannot produce a valid run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Operand pool would be empty
    #[error("pool size must be at least 1")]
    EmptyPool,

    /// Nothing would be measured
    #[error("measurement iteration count must be at least 1")]
    NoIterations,

    /// MPFR rejects this precision
    #[error("precision of {bits} bits is outside the supported range {min}..={max}")]
    InvalidPrecision {
        /// Requested significand bits
        bits: u32,
        /// Smallest supported precision
        min: u32,
        /// Largest supported precision
        max: u32,
    },

    /// CPU index cannot be expressed in an affinity mask
    #[error("CPU {cpu} is outside the supported range 0..{max}")]
    InvalidCpu {
        /// Requested CPU index
        cpu: usize,
        /// Exclusive upper bound
        max: usize,
    },

    /// Output directory is absent
    #[error("output directory {} does not exist", .0.display())]
    MissingOutputDir(PathBuf),
}

impl RunConfig {
    /// Reject settings before any measurement starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.driver.exec_count == 0 {
            return Err(ConfigError::NoIterations);
        }
        if !self.precision.is_valid() {
            let range = PrecisionContext::supported_range();
            return Err(ConfigError::InvalidPrecision {
                bits: self.precision.precision,
                min: *range.start(),
                max: *range.end(),
            });
        }
        if let Some(cpu) = self.pin_cpu.filter(|&cpu| cpu >= MAX_CPUS) {
            return Err(ConfigError::InvalidCpu { cpu, max: MAX_CPUS });
        }
        if !self.output_dir.is_dir() {
            return Err(ConfigError::MissingOutputDir(self.output_dir.clone()));
        }
        Ok(())
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Operation measured
    pub operation: Operation,
    /// Per-backend statistics, in column order
    pub summaries: Vec<(BackendKind, SummaryStatistics)>,
    /// Record written to the summary file
    pub record: SummaryRecord,
    /// Path of `<op>.csv`
    pub summary_path: PathBuf,
    /// Paths of raw sample dumps (empty unless enabled)
    pub sample_paths: Vec<PathBuf>,
}

/// Warm up and measure one backend
fn measure_backend(
    driver: &TimingDriver,
    kind: BackendKind,
    op: Operation,
    pool: &OperandPool,
    config: &RunConfig,
) -> LatencySamples {
    match kind {
        BackendKind::Native => measure_with(driver, &NativeBackend, op, pool),
        BackendKind::Strict => measure_with(driver, &StrictBackend, op, pool),
        BackendKind::Mpfr => measure_with(driver, &MpfrBackend::for_pool(pool), op, pool),
        BackendKind::Micro => {
            measure_with(driver, &MicroBackend::new(config.reduced_format), op, pool)
        }
    }
}

fn measure_with<B: Backend>(
    driver: &TimingDriver,
    backend: &B,
    op: Operation,
    pool: &OperandPool,
) -> LatencySamples {
    let start = Instant::now();
    let samples = driver.run(backend, op, pool);
    debug!(
        backend = %backend.kind(),
        samples = samples.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "measured backend"
    );
    samples
}

/// Write the summary, then the raw dumps.
///
/// On failure every file this run already wrote is removed again, so a
/// failed run leaves no partial results behind.
fn persist(
    dir: &Path,
    op: Operation,
    record: &SummaryRecord,
    dumps: Option<(&[BackendKind], &[LatencySamples])>,
) -> Result<(PathBuf, Vec<PathBuf>), ReportError> {
    let summary_path = write_summary(dir, record)?;

    let mut sample_paths = Vec::new();
    for (&kind, samples) in dumps.into_iter().flat_map(|(k, s)| k.iter().zip(s)) {
        match write_samples(dir, kind.label(), op.name(), samples) {
            Ok(path) => {
                debug!(path = %path.display(), "wrote raw samples");
                sample_paths.push(path);
            }
            Err(err) => {
                for path in std::iter::once(&summary_path).chain(&sample_paths) {
                    let _ = std::fs::remove_file(path);
                }
                return Err(err);
            }
        }
    }

    Ok((summary_path, sample_paths))
}

/// Run one experiment end to end.
///
/// Errors are fatal: nothing is written unless every backend was measured,
/// and a failed write aborts the run without leaving partial results.
pub fn run_experiment(op: Operation, config: &RunConfig) -> anyhow::Result<ExperimentOutcome> {
    config.validate()?;

    if let Some(cpu) = config.pin_cpu {
        pin_to_cpu(cpu).with_context(|| format!("failed to pin run to CPU {}", cpu))?;
        debug!(cpu, "pinned run thread");
    }

    let start = Instant::now();
    let pool = OperandPool::generate(config.pool_size, config.seed, config.precision);
    info!(
        operation = %op,
        pool_size = pool.len(),
        seed = ?config.seed,
        precision = config.precision.precision,
        rounding = %config.precision.rounding,
        "generated operand pool"
    );

    let driver = TimingDriver::new(config.driver);
    let backends = op.class().backends();

    let pb = ProgressBar::new(backends.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut sequences: Vec<LatencySamples> = Vec::with_capacity(backends.len());
    for &kind in backends {
        pb.set_message(format!("{} {}", op, kind.description()));
        sequences.push(measure_backend(&driver, kind, op, &pool, config));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let stats = compute_summaries(&sequences);

    let mut record = SummaryRecord::new(op.name());
    let mut summaries = Vec::with_capacity(backends.len());
    for (&kind, stats) in backends.iter().zip(stats) {
        info!(
            backend = %kind,
            mean_ns = stats.mean,
            std_dev_ns = stats.std_dev,
            median_ns = stats.median,
            p99_ns = stats.p99,
            cv_pct = stats.coefficient_of_variation(),
            "latency"
        );
        record.push(kind.label(), &stats);
        summaries.push((kind, stats));
    }

    let dumps = config
        .dump_samples
        .then_some((backends, sequences.as_slice()));
    let (summary_path, sample_paths) = persist(&config.output_dir, op, &record, dumps)?;
    info!(
        path = %summary_path.display(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "wrote summary"
    );

    Ok(ExperimentOutcome {
        operation: op,
        summaries,
        record,
        summary_path,
        sample_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpbench_core::OperationClass;

    fn small_config(dir: &std::path::Path) -> RunConfig {
        RunConfig {
            driver: DriverConfig {
                warmup_count: 20,
                exec_count: 50,
            },
            pool_size: 8,
            seed: Some(11),
            output_dir: dir.to_path_buf(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        assert_eq!(config.validate(), Ok(()));

        let empty = RunConfig {
            pool_size: 0,
            ..config.clone()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyPool));

        let mut no_iters = config.clone();
        no_iters.driver.exec_count = 0;
        assert_eq!(no_iters.validate(), Err(ConfigError::NoIterations));

        let mut bad_prec = config.clone();
        bad_prec.precision.precision = 0;
        assert!(matches!(
            bad_prec.validate(),
            Err(ConfigError::InvalidPrecision { bits: 0, .. })
        ));

        let missing = RunConfig {
            output_dir: dir.path().join("nope"),
            ..config
        };
        assert!(matches!(
            missing.validate(),
            Err(ConfigError::MissingOutputDir(_))
        ));
    }

    #[test]
    fn test_run_primitive() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run_experiment(Operation::Div, &small_config(dir.path())).unwrap();

        let kinds: Vec<_> = outcome.summaries.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, OperationClass::Primitive.backends());
        for (_, stats) in &outcome.summaries {
            assert_eq!(stats.sample_count, 50);
        }

        assert_eq!(outcome.summary_path, dir.path().join("div.csv"));
        let content = std::fs::read_to_string(&outcome.summary_path).unwrap();
        assert_eq!(content, format!("{}\n", outcome.record.to_csv_line()));
        assert!(outcome.sample_paths.is_empty());
    }

    #[test]
    fn test_run_transcendental_with_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            dump_samples: true,
            ..small_config(dir.path())
        };
        let outcome = run_experiment(Operation::Pow, &config).unwrap();

        assert_eq!(outcome.record.columns.len(), 4);
        assert_eq!(outcome.sample_paths.len(), 4);
        for label in ["native", "strict", "mpfr", "micro"] {
            let path = dir.path().join(format!("{}_pow.csv", label));
            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content.lines().count(), 50);
            assert!(content.lines().all(|l| l.parse::<u64>().is_ok()));
        }
    }

    #[test]
    fn test_missing_output_dir_fails_before_measuring() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            output_dir: dir.path().join("missing"),
            ..small_config(dir.path())
        };
        let err = run_experiment(Operation::Add, &config).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_pin_cpu_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let first = RunConfig {
            pin_cpu: Some(0),
            ..small_config(dir.path())
        };
        assert_eq!(first.validate(), Ok(()));

        let out_of_range = RunConfig {
            pin_cpu: Some(MAX_CPUS),
            ..small_config(dir.path())
        };
        assert_eq!(
            out_of_range.validate(),
            Err(ConfigError::InvalidCpu {
                cpu: MAX_CPUS,
                max: MAX_CPUS
            })
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_out_of_range_cpu_fails_before_measuring() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            pin_cpu: Some(4096),
            ..small_config(dir.path())
        };
        let err = run_experiment(Operation::Sin, &config).unwrap_err();
        assert!(err.to_string().contains("CPU 4096"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_summary_write_leaves_no_dumps() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the summary file makes the write fail
        std::fs::create_dir(dir.path().join("pow.csv")).unwrap();
        let config = RunConfig {
            dump_samples: true,
            ..small_config(dir.path())
        };

        assert!(run_experiment(Operation::Pow, &config).is_err());
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("pow.csv")]);
    }

    #[test]
    fn test_failed_dump_write_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("strict_exp.csv")).unwrap();
        let config = RunConfig {
            dump_samples: true,
            ..small_config(dir.path())
        };

        let err = run_experiment(Operation::Exp, &config).unwrap_err();
        assert!(err.to_string().contains("strict_exp.csv"));
        assert!(!dir.path().join("exp.csv").exists());
        assert!(!dir.path().join("native_exp.csv").exists());
        assert!(!dir.path().join("mpfr_exp.csv").exists());
    }
}
