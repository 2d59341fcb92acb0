//! Reproducible double-precision backend.
//!
//! Transcendental functions go through `libm`, a pure-Rust port of musl's
//! math library, so results are bit-identical on every target. The basic
//! operators are already correctly rounded under IEEE 754 and stay native.

use super::{Backend, BackendKind};
use crate::operation::Operation;
use crate::pool::OperandPool;

/// Platform-independent `f64` math routines
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictBackend;

impl Backend for StrictBackend {
    type Args<'p> = (f64, f64);
    type Output = f64;

    fn kind(&self) -> BackendKind {
        BackendKind::Strict
    }

    #[inline(always)]
    fn stage<'p>(&self, pool: &'p OperandPool, index: usize) -> Self::Args<'p> {
        pool.pair(index)
    }

    #[inline(never)]
    fn apply(&self, op: Operation, (x, y): Self::Args<'_>) -> f64 {
        match op {
            Operation::Add => x + y,
            Operation::Sub => x - y,
            Operation::Mul => x * y,
            Operation::Div => x / y,
            Operation::Sqrt => libm::sqrt(x),
            Operation::Log => libm::log(x),
            Operation::Exp => libm::exp(x),
            Operation::Pow => libm::pow(x, y),
            Operation::Sin => libm::sin(x),
            Operation::Cos => libm::cos(x),
            Operation::Tan => libm::tan(x),
        }
    }
}
