//! Operand Pool
//!
//! A fixed set of uniform operand pairs in `[0, 1)`, generated once per run
//! and cycled through by index. The arbitrary-precision encodings are
//! materialised up front so that encoding cost never lands in a measured
//! call; the reduced-precision encoding is derived on access.

use crate::backend::PrecisionContext;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rug::Float;
use thiserror::Error;

/// Default number of operand pairs
pub const DEFAULT_POOL_SIZE: usize = 1000;

/// Invalid explicit operand sets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No operands were given
    #[error("operand pool must not be empty")]
    Empty,

    /// x and y operand lists differ in length
    #[error("operand length mismatch: {xs} x-values, {ys} y-values")]
    LengthMismatch {
        /// Number of x operands
        xs: usize,
        /// Number of y operands
        ys: usize,
    },
}

/// Operand pairs shared by every backend of a run
#[derive(Debug, Clone)]
pub struct OperandPool {
    xs: Vec<f64>,
    ys: Vec<f64>,
    precise_xs: Vec<Float>,
    precise_ys: Vec<Float>,
    context: PrecisionContext,
}

impl OperandPool {
    /// Draw `size` uniform pairs.
    ///
    /// With a seed the pool is fully deterministic; without one the RNG is
    /// seeded from the operating system. x and y are drawn alternately.
    pub fn generate(size: usize, seed: Option<u64>, context: PrecisionContext) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut xs = Vec::with_capacity(size);
        let mut ys = Vec::with_capacity(size);
        for _ in 0..size {
            xs.push(rng.random::<f64>());
            ys.push(rng.random::<f64>());
        }

        Self::encode(xs, ys, context)
    }

    /// Build a pool from explicit operands
    pub fn from_values(
        xs: Vec<f64>,
        ys: Vec<f64>,
        context: PrecisionContext,
    ) -> Result<Self, PoolError> {
        if xs.len() != ys.len() {
            return Err(PoolError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self::encode(xs, ys, context))
    }

    fn encode(xs: Vec<f64>, ys: Vec<f64>, context: PrecisionContext) -> Self {
        let precise_xs = xs.iter().map(|&x| context.encode(x)).collect();
        let precise_ys = ys.iter().map(|&y| context.encode(y)).collect();
        Self {
            xs,
            ys,
            precise_xs,
            precise_ys,
            context,
        }
    }

    /// Number of operand pairs
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether the pool holds no pairs
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Double-precision pair at `index`
    #[inline(always)]
    pub fn pair(&self, index: usize) -> (f64, f64) {
        (self.xs[index], self.ys[index])
    }

    /// Arbitrary-precision pair at `index`
    #[inline(always)]
    pub fn precise_pair(&self, index: usize) -> (&Float, &Float) {
        (&self.precise_xs[index], &self.precise_ys[index])
    }

    /// All x operands
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// All y operands
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Context used for the arbitrary-precision encodings
    pub fn context(&self) -> PrecisionContext {
        self.context
    }
}
