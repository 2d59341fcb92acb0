//! Fast double-precision backend: plain `f64` operators and `std` methods.

use super::{Backend, BackendKind};
use crate::operation::Operation;
use crate::pool::OperandPool;

/// Platform `f64` arithmetic, not guaranteed bit-reproducible across targets
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    type Args<'p> = (f64, f64);
    type Output = f64;

    fn kind(&self) -> BackendKind {
        BackendKind::Native
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
            Operation::Sqrt => x.sqrt(),
            Operation::Log => x.ln(),
            Operation::Exp => x.exp(),
            Operation::Pow => x.powf(y),
            Operation::Sin => x.sin(),
            Operation::Cos => x.cos(),
            Operation::Tan => x.tan(),
        }
    }
}
