//! Operation Table
//!
//! Every benchmarkable operation is described by one static row: its name,
//! how many operands it consumes, and which backend set it is compared
//! across. The timing driver iterates this table generically instead of
//! carrying one hand-written block per operation.

use crate::backend::BackendKind;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Arithmetic operation or elementary function under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `x + y`
    Add,
    /// `x - y`
    Sub,
    /// `x * y`
    Mul,
    /// `x / y`
    Div,
    /// Square root of `x`
    Sqrt,
    /// Natural logarithm of `x`
    Log,
    /// `e^x`
    Exp,
    /// `x^y`
    Pow,
    /// Sine of `x`
    Sin,
    /// Cosine of `x`
    Cos,
    /// Tangent of `x`
    Tan,
}

/// Number of operands an operation consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Only `x` is used
    Unary,
    /// Both `x` and `y` are used
    Binary,
}

/// Comparison class of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Binary arithmetic operator, compared across three backends
    Primitive,
    /// Elementary function, additionally compared against the strict backend
    Transcendental,
}

impl OperationClass {
    /// Backends measured for this class, in report column order
    pub fn backends(self) -> &'static [BackendKind] {
        match self {
            OperationClass::Primitive => {
                &[BackendKind::Native, BackendKind::Mpfr, BackendKind::Micro]
            }
            OperationClass::Transcendental => &[
                BackendKind::Native,
                BackendKind::Strict,
                BackendKind::Mpfr,
                BackendKind::Micro,
            ],
        }
    }
}

/// Static description of one experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperimentDescriptor {
    /// Operation measured
    pub operation: Operation,
    /// Canonical lowercase name (also the output file stem)
    pub name: &'static str,
    /// Operand count
    pub arity: Arity,
    /// Backend comparison class
    pub class: OperationClass,
}

const fn row(
    operation: Operation,
    name: &'static str,
    arity: Arity,
    class: OperationClass,
) -> ExperimentDescriptor {
    ExperimentDescriptor {
        operation,
        name,
        arity,
        class,
    }
}

/// All supported experiments, in canonical order
pub const EXPERIMENTS: &[ExperimentDescriptor] = &[
    row(Operation::Add, "add", Arity::Binary, OperationClass::Primitive),
    row(Operation::Sub, "sub", Arity::Binary, OperationClass::Primitive),
    row(Operation::Mul, "mul", Arity::Binary, OperationClass::Primitive),
    row(Operation::Div, "div", Arity::Binary, OperationClass::Primitive),
    row(Operation::Sqrt, "sqrt", Arity::Unary, OperationClass::Transcendental),
    row(Operation::Log, "log", Arity::Unary, OperationClass::Transcendental),
    row(Operation::Exp, "exp", Arity::Unary, OperationClass::Transcendental),
    row(Operation::Pow, "pow", Arity::Binary, OperationClass::Transcendental),
    row(Operation::Sin, "sin", Arity::Unary, OperationClass::Transcendental),
    row(Operation::Cos, "cos", Arity::Unary, OperationClass::Transcendental),
    row(Operation::Tan, "tan", Arity::Unary, OperationClass::Transcendental),
];

impl Operation {
    /// Every operation, in table order
    pub fn all() -> impl Iterator<Item = Operation> {
        EXPERIMENTS.iter().map(|d| d.operation)
    }

    /// Table row for this operation
    pub fn descriptor(self) -> &'static ExperimentDescriptor {
        // The table holds exactly one row per variant, in declaration order.
        &EXPERIMENTS[self as usize]
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Operand count
    pub fn arity(self) -> Arity {
        self.descriptor().arity
    }

    /// Backend comparison class
    pub fn class(self) -> OperationClass {
        self.descriptor().class
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name that does not match any row of the operation table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported operation '{name}' (expected one of: {})", supported_names())]
pub struct UnknownOperation {
    /// The rejected name
    pub name: String,
}

fn supported_names() -> String {
    EXPERIMENTS
        .iter()
        .map(|d| d.name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EXPERIMENTS
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.operation)
            .ok_or_else(|| UnknownOperation {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_variants() {
        for (idx, row) in EXPERIMENTS.iter().enumerate() {
            assert_eq!(row.operation as usize, idx);
            assert_eq!(row.operation.descriptor(), row);
        }
        assert_eq!(Operation::all().count(), 11);
    }

    #[test]
    fn test_parse_round_trips_names() {
        for op in Operation::all() {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "atan2".parse::<Operation>().unwrap_err();
        assert_eq!(err.name, "atan2");
        assert!(err.to_string().contains("add, sub"));

        // Names are case-sensitive, matching the output file stems
        assert!("ADD".parse::<Operation>().is_err());
    }

    #[test]
    fn test_classes() {
        let primitives: Vec<_> = Operation::all()
            .filter(|op| op.class() == OperationClass::Primitive)
            .map(Operation::name)
            .collect();
        assert_eq!(primitives, ["add", "sub", "mul", "div"]);

        assert_eq!(Operation::Pow.arity(), Arity::Binary);
        assert_eq!(Operation::Pow.class(), OperationClass::Transcendental);
        assert_eq!(Operation::Sqrt.arity(), Arity::Unary);
    }

    #[test]
    fn test_backend_order() {
        assert_eq!(
            OperationClass::Primitive.backends(),
            [BackendKind::Native, BackendKind::Mpfr, BackendKind::Micro]
        );
        assert_eq!(OperationClass::Transcendental.backends().len(), 4);
        assert_eq!(OperationClass::Transcendental.backends()[1], BackendKind::Strict);
    }
}
