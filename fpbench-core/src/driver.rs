//! Timing Driver
//!
//! Runs one backend through a warmup phase and a measurement phase:
//!
//! ```text
//! warmup:   for i in 0..warmup_count { apply(pool[i % n]) }          (discarded)
//! measure:  for i in 0..exec_count   { t0; apply(pool[i % n]); t1 }  samples[i] = t1 - t0
//! ```
//!
//! The operand index cycles deterministically, so every backend sees the
//! identical operand sequence. Warmup is repeated for each backend and never
//! shared between them. A panic inside a backend call aborts the run.

use crate::backend::Backend;
use crate::measure::Timer;
use crate::operation::Operation;
use crate::pool::OperandPool;
use std::hint::black_box;

/// Default number of discarded warmup calls
pub const DEFAULT_WARMUP_COUNT: usize = 1_000_000;

/// Default number of measured calls
pub const DEFAULT_EXEC_COUNT: usize = 1_000_000;

/// Per-call latencies in nanoseconds, one entry per measured call
pub type LatencySamples = Vec<u64>;

/// Iteration counts for one backend run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Calls executed and discarded before measurement
    pub warmup_count: usize,
    /// Calls measured
    pub exec_count: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            warmup_count: DEFAULT_WARMUP_COUNT,
            exec_count: DEFAULT_EXEC_COUNT,
        }
    }
}

/// Drives warmup and measurement loops for a backend
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingDriver {
    config: DriverConfig,
}

impl TimingDriver {
    /// Create a driver with the given iteration counts
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Iteration counts in use
    pub fn config(&self) -> DriverConfig {
        self.config
    }

    /// Warm up, then measure `exec_count` single calls of `op` on `backend`.
    ///
    /// The returned sequence always has exactly `exec_count` entries.
    ///
    /// # Panics
    /// Panics if the pool is empty.
    pub fn run<B: Backend>(
        &self,
        backend: &B,
        op: Operation,
        pool: &OperandPool,
    ) -> LatencySamples {
        assert!(!pool.is_empty(), "operand pool must not be empty");
        self.warmup(backend, op, pool);
        self.measure(backend, op, pool)
    }

    /// Discarded executions that stabilise caches and branch predictors
    pub fn warmup<B: Backend>(&self, backend: &B, op: Operation, pool: &OperandPool) {
        let n = pool.len();
        for i in 0..self.config.warmup_count {
            let args = backend.stage(pool, i % n);
            black_box(backend.apply(black_box(op), black_box(args)));
        }
    }

    /// Timed executions, one sample per call
    pub fn measure<B: Backend>(
        &self,
        backend: &B,
        op: Operation,
        pool: &OperandPool,
    ) -> LatencySamples {
        let n = pool.len();
        let mut samples = Vec::with_capacity(self.config.exec_count);
        for i in 0..self.config.exec_count {
            let args = black_box(backend.stage(pool, i % n));

            let timer = Timer::start();
            let value = backend.apply(black_box(op), args);
            let nanos = timer.stop();

            // Result is dropped outside the timed region
            black_box(value);
            samples.push(nanos);
        }
        samples
    }
}

/// Evaluate `op` once per pool index without timing.
///
/// Used to check backend wiring independently of measurement.
pub fn capture_values<B: Backend>(
    backend: &B,
    op: Operation,
    pool: &OperandPool,
) -> Vec<B::Output> {
    (0..pool.len())
        .map(|i| backend.apply(op, backend.stage(pool, i)))
        .collect()
}
