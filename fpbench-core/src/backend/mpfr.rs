//! Arbitrary-precision backend on top of MPFR (via `rug`).
//!
//! Operands are encoded once into the pool at the configured precision; every
//! call then evaluates into a fresh `Float` under the same precision and
//! rounding mode.

use super::{Backend, BackendKind};
use crate::operation::Operation;
use crate::pool::OperandPool;
use rug::Float;
use rug::float::Round;
use rug::ops::Pow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Significand width of an IEEE 754 binary64 value
pub const BINARY64_PRECISION: u32 = 53;

/// Rounding mode applied to every arbitrary-precision result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Round to nearest, ties to even
    #[default]
    Nearest,
    /// Round toward zero
    Zero,
    /// Round toward +infinity
    Up,
    /// Round toward -infinity
    Down,
}

impl Rounding {
    fn to_round(self) -> Round {
        match self {
            Rounding::Nearest => Round::Nearest,
            Rounding::Zero => Round::Zero,
            Rounding::Up => Round::Up,
            Rounding::Down => Round::Down,
        }
    }
}

impl FromStr for Rounding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" | "half-even" => Ok(Rounding::Nearest),
            "zero" => Ok(Rounding::Zero),
            "up" => Ok(Rounding::Up),
            "down" => Ok(Rounding::Down),
            other => Err(format!("Unknown rounding mode: {}", other)),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rounding::Nearest => "nearest",
            Rounding::Zero => "zero",
            Rounding::Up => "up",
            Rounding::Down => "down",
        };
        f.write_str(name)
    }
}

/// Fixed precision and rounding mode shared by encoding and evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionContext {
    /// Significand bits
    pub precision: u32,
    /// Rounding mode
    pub rounding: Rounding,
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self {
            precision: BINARY64_PRECISION,
            rounding: Rounding::Nearest,
        }
    }
}

impl PrecisionContext {
    /// Context with the given precision and round-half-to-even
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Precisions MPFR accepts
    pub fn supported_range() -> RangeInclusive<u32> {
        rug::float::prec_min()..=rug::float::prec_max()
    }

    /// Whether MPFR accepts this precision
    pub fn is_valid(&self) -> bool {
        Self::supported_range().contains(&self.precision)
    }

    /// Encode a double at this precision and rounding mode
    pub fn encode(&self, value: f64) -> Float {
        Float::with_val_round(self.precision, value, self.rounding.to_round()).0
    }
}

/// MPFR evaluation at a fixed [`PrecisionContext`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MpfrBackend {
    context: PrecisionContext,
}

impl MpfrBackend {
    /// Backend evaluating under `context`
    pub fn new(context: PrecisionContext) -> Self {
        Self { context }
    }

    /// Backend matching the context the pool was encoded with
    pub fn for_pool(pool: &OperandPool) -> Self {
        Self::new(pool.context())
    }

    /// Evaluation context
    pub fn context(&self) -> PrecisionContext {
        self.context
    }
}

impl Backend for MpfrBackend {
    type Args<'p> = (&'p Float, &'p Float);
    type Output = Float;

    fn kind(&self) -> BackendKind {
        BackendKind::Mpfr
    }

    #[inline(always)]
    fn stage<'p>(&self, pool: &'p OperandPool, index: usize) -> Self::Args<'p> {
        pool.precise_pair(index)
    }

    #[inline(never)]
    fn apply(&self, op: Operation, (x, y): Self::Args<'_>) -> Float {
        let prec = self.context.precision;
        let round = self.context.rounding.to_round();
        let (value, _) = match op {
            Operation::Add => Float::with_val_round(prec, x + y, round),
            Operation::Sub => Float::with_val_round(prec, x - y, round),
            Operation::Mul => Float::with_val_round(prec, x * y, round),
            Operation::Div => Float::with_val_round(prec, x / y, round),
            Operation::Sqrt => Float::with_val_round(prec, x.sqrt_ref(), round),
            Operation::Log => Float::with_val_round(prec, x.ln_ref(), round),
            Operation::Exp => Float::with_val_round(prec, x.exp_ref(), round),
            Operation::Pow => Float::with_val_round(prec, x.pow(y), round),
            Operation::Sin => Float::with_val_round(prec, x.sin_ref(), round),
            Operation::Cos => Float::with_val_round(prec, x.cos_ref(), round),
            Operation::Tan => Float::with_val_round(prec, x.tan_ref(), round),
        };
        value
    }
}
