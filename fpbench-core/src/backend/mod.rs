//! Numeric Backends
//!
//! Each backend is a thin call shim over one numeric library. The timing
//! driver only sees the [`Backend`] trait: operands are staged from the pool
//! outside the timed region, then [`Backend::apply`] is the single call that
//! gets measured.
//!
//! | Kind     | Library                | Operand form              |
//! |----------|------------------------|---------------------------|
//! | `native` | `f64` / `std`          | `(f64, f64)`              |
//! | `strict` | `libm`                 | `(f64, f64)`              |
//! | `mpfr`   | `rug::Float`           | pre-encoded `&Float` pair |
//! | `micro`  | `half` (`bf16`, `f16`) | raw `u64` bit patterns    |

mod micro;
mod mpfr;
mod native;
mod strict;

pub use micro::{MicroBackend, ReducedFormat};
pub use mpfr::{BINARY64_PRECISION, MpfrBackend, PrecisionContext, Rounding};
pub use native::NativeBackend;
pub use strict::StrictBackend;

use crate::operation::Operation;
use crate::pool::OperandPool;
use std::fmt;

/// Identifies one of the compared backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Fast native double precision
    Native,
    /// Reproducible (platform-independent) double precision
    Strict,
    /// Arbitrary precision at a fixed context
    Mpfr,
    /// Reduced-precision emulation on bit patterns
    Micro,
}

impl BackendKind {
    /// Short label used in report columns and dump file names
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Strict => "strict",
            BackendKind::Mpfr => "mpfr",
            BackendKind::Micro => "micro",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            BackendKind::Native => "fast double (std)",
            BackendKind::Strict => "reproducible double (libm)",
            BackendKind::Mpfr => "arbitrary precision (MPFR)",
            BackendKind::Micro => "reduced precision (half)",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uniform "apply operation to operands" capability
///
/// Unary operations ignore the second operand. Results are never inspected
/// by the harness; undefined inputs produce whatever the backend produces.
pub trait Backend {
    /// Operands prepared for one call
    type Args<'p>;

    /// Backend-native result
    type Output;

    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Fetch (and re-encode if needed) the operand pair at `index`.
    ///
    /// Not part of the timed region.
    fn stage<'p>(&self, pool: &'p OperandPool, index: usize) -> Self::Args<'p>;

    /// Evaluate `op`. This is the measured call.
    fn apply(&self, op: Operation, args: Self::Args<'_>) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_distinct() {
        let kinds = [
            BackendKind::Native,
            BackendKind::Strict,
            BackendKind::Mpfr,
            BackendKind::Micro,
        ];
        let mut labels: Vec<_> = kinds.iter().map(|k| k.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), kinds.len());
        assert_eq!(BackendKind::Strict.to_string(), "strict");
    }

    #[test]
    fn test_adapters_report_their_kind() {
        assert_eq!(NativeBackend.kind(), BackendKind::Native);
        assert_eq!(StrictBackend.kind(), BackendKind::Strict);
        assert_eq!(MpfrBackend::default().kind(), BackendKind::Mpfr);
        assert_eq!(MicroBackend::default().kind(), BackendKind::Micro);
    }
}
