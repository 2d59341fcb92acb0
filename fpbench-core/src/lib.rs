#![warn(missing_docs)]
//! fpbench Core - Measurement Runtime
//!
//! This crate provides everything that runs inside a measurement:
//! - The operation table (`Operation`, `ExperimentDescriptor`)
//! - Operand pools shared by all backends
//! - The `Backend` capability and its four adapters (native, strict, MPFR, micro)
//! - The timing driver (warmup + per-call measurement)
//! - CPU affinity pinning for stable timings

pub mod backend;
mod driver;
mod measure;
mod operation;
mod pool;

pub use backend::{
    BINARY64_PRECISION, Backend, BackendKind, MicroBackend, MpfrBackend, NativeBackend,
    PrecisionContext, ReducedFormat, Rounding, StrictBackend,
};
pub use driver::{
    DEFAULT_EXEC_COUNT, DEFAULT_WARMUP_COUNT, DriverConfig, LatencySamples, TimingDriver,
    capture_values,
};
pub use measure::{MAX_CPUS, Timer, pin_to_cpu};
pub use operation::{
    Arity, EXPERIMENTS, ExperimentDescriptor, Operation, OperationClass, UnknownOperation,
};
pub use pool::{DEFAULT_POOL_SIZE, OperandPool, PoolError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_WARMUP_COUNT, 1_000_000);
        assert_eq!(DEFAULT_EXEC_COUNT, 1_000_000);
        assert_eq!(DEFAULT_POOL_SIZE, 1000);
        assert_eq!(PrecisionContext::default().precision, 53);
    }
}
