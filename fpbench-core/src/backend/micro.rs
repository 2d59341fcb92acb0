//! Reduced-precision backend.
//!
//! Operands travel as raw `u64` bit patterns. Each call reinterprets them as
//! doubles, narrows to a 16-bit format, evaluates, and returns the narrow bit
//! pattern. Arithmetic and function evaluation happen in `f32`, which is how
//! `half` implements its own operators, and are rounded back to the narrow
//! format.

use super::{Backend, BackendKind};
use crate::operation::Operation;
use crate::pool::OperandPool;
use half::{bf16, f16};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Narrow floating-point format emulated by [`MicroBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducedFormat {
    /// bfloat16: 8 exponent bits, 7 significand bits
    #[default]
    Bf16,
    /// IEEE binary16: 5 exponent bits, 10 significand bits
    F16,
}

impl ReducedFormat {
    /// Narrow a double given as its bit pattern, widened to `f32` for evaluation
    #[inline(always)]
    fn decode(self, bits: u64) -> f32 {
        let value = f64::from_bits(bits);
        match self {
            ReducedFormat::Bf16 => bf16::from_f64(value).to_f32(),
            ReducedFormat::F16 => f16::from_f64(value).to_f32(),
        }
    }

    /// Round an `f32` result to the narrow format and return its bits
    #[inline(always)]
    fn encode(self, value: f32) -> u16 {
        match self {
            ReducedFormat::Bf16 => bf16::from_f32(value).to_bits(),
            ReducedFormat::F16 => f16::from_f32(value).to_bits(),
        }
    }

    /// Widen a narrow bit pattern produced by this format back to `f64`
    pub fn to_f64(self, bits: u16) -> f64 {
        match self {
            ReducedFormat::Bf16 => bf16::from_bits(bits).to_f64(),
            ReducedFormat::F16 => f16::from_bits(bits).to_f64(),
        }
    }
}

impl FromStr for ReducedFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bf16" | "bfloat16" => Ok(ReducedFormat::Bf16),
            "f16" | "half" | "binary16" => Ok(ReducedFormat::F16),
            other => Err(format!("Unknown reduced format: {}", other)),
        }
    }
}

impl fmt::Display for ReducedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducedFormat::Bf16 => f.write_str("bf16"),
            ReducedFormat::F16 => f.write_str("f16"),
        }
    }
}

/// Reduced-precision emulation on packed bit representations
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroBackend {
    format: ReducedFormat,
}

impl MicroBackend {
    /// Backend emulating `format`
    pub fn new(format: ReducedFormat) -> Self {
        Self { format }
    }

    /// Emulated format
    pub fn format(&self) -> ReducedFormat {
        self.format
    }
}

impl Backend for MicroBackend {
    type Args<'p> = (u64, u64);
    type Output = u16;

    fn kind(&self) -> BackendKind {
        BackendKind::Micro
    }

    #[inline(always)]
    fn stage<'p>(&self, pool: &'p OperandPool, index: usize) -> Self::Args<'p> {
        let (x, y) = pool.pair(index);
        (x.to_bits(), y.to_bits())
    }

    #[inline(never)]
    fn apply(&self, op: Operation, (x, y): Self::Args<'_>) -> u16 {
        let x = self.format.decode(x);
        let y = self.format.decode(y);
        let value = match op {
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
        };
        self.format.encode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(x: f64, y: f64) -> (u64, u64) {
        (x.to_bits(), y.to_bits())
    }

    #[test]
    fn test_exact_values_survive_narrowing() {
        for format in [ReducedFormat::Bf16, ReducedFormat::F16] {
            let b = MicroBackend::new(format);
            assert_eq!(format.to_f64(b.apply(Operation::Add, bits(0.25, 0.5))), 0.75);
            assert_eq!(format.to_f64(b.apply(Operation::Mul, bits(0.5, 0.5))), 0.25);
            assert_eq!(format.to_f64(b.apply(Operation::Sqrt, bits(0.25, 0.0))), 0.5);
        }
    }

    #[test]
    fn test_precision_is_reduced() {
        let b = MicroBackend::new(ReducedFormat::Bf16);
        let x = 0.1;
        let narrowed = ReducedFormat::Bf16.to_f64(b.apply(Operation::Add, bits(x, 0.0)));
        assert_ne!(narrowed, x);
        // bf16 keeps 8 significant bits
        assert!((narrowed - x).abs() < x / 128.0);
    }

    #[test]
    fn test_f16_is_finer_than_bf16() {
        let x = 0.123_456;
        let err = |format: ReducedFormat| {
            let b = MicroBackend::new(format);
            (format.to_f64(b.apply(Operation::Add, bits(x, 0.0))) - x).abs()
        };
        assert!(err(ReducedFormat::F16) < err(ReducedFormat::Bf16));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("bf16".parse::<ReducedFormat>(), Ok(ReducedFormat::Bf16));
        assert_eq!("F16".parse::<ReducedFormat>(), Ok(ReducedFormat::F16));
        assert!("f8".parse::<ReducedFormat>().is_err());
        assert_eq!(ReducedFormat::default().to_string(), "bf16");
    }
}
