//! # Procedure Helper Infrastructure
//!
//! Argument extraction, arity checks and numeric promotion shared by every
//! built-in procedure. Error messages always name the procedure.

use num_complex::Complex64;

use crate::ast::{Atom, Expression};
use crate::diagnostics::SemanticError;
use crate::semantic_err;

// ============================================================================
// NUMERIC VALUES
// ============================================================================

/// A numeric argument, real or complex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Real(f64),
    Complex(Complex64),
}

impl Numeric {
    pub fn to_complex(self) -> Complex64 {
        match self {
            Numeric::Real(r) => Complex64::new(r, 0.0),
            Numeric::Complex(c) => c,
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Numeric::Complex(_))
    }

    /// Combines two numbers, promoting to complex when either side is complex.
    pub fn combine(
        self,
        other: Numeric,
        real_op: fn(f64, f64) -> f64,
        complex_op: fn(Complex64, Complex64) -> Complex64,
    ) -> Numeric {
        match (self, other) {
            (Numeric::Real(a), Numeric::Real(b)) => Numeric::Real(real_op(a, b)),
            (a, b) => Numeric::Complex(complex_op(a.to_complex(), b.to_complex())),
        }
    }
}

impl From<Numeric> for Expression {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Real(r) => Expression::number(r),
            Numeric::Complex(c) => Expression::new(Atom::Complex(c)),
        }
    }
}

// ============================================================================
// ARGUMENT EXTRACTION
// ============================================================================

pub fn numeric_arg(arg: &Expression, name: &str) -> Result<Numeric, SemanticError> {
    if !arg.is_leaf() {
        return Err(invalid_argument(name, arg));
    }
    match arg.head() {
        Atom::Number(n) => Ok(Numeric::Real(*n)),
        Atom::Complex(c) => Ok(Numeric::Complex(*c)),
        _ => Err(invalid_argument(name, arg)),
    }
}

pub fn real_arg(arg: &Expression, name: &str) -> Result<f64, SemanticError> {
    arg.as_number().ok_or_else(|| invalid_argument(name, arg))
}

pub fn complex_arg(arg: &Expression, name: &str) -> Result<Complex64, SemanticError> {
    match numeric_arg(arg, name)? {
        Numeric::Complex(c) => Ok(c),
        Numeric::Real(_) => Err(semantic_err!(
            "in call to {}: expected a complex argument, found number",
            name
        )),
    }
}

pub fn list_arg<'a>(arg: &'a Expression, name: &str) -> Result<&'a [Expression], SemanticError> {
    if arg.is_list() {
        Ok(arg.tail())
    } else {
        Err(semantic_err!(
            "argument to {} is not a list (found {})",
            name,
            arg.type_name()
        ))
    }
}

// ============================================================================
// ARITY
// ============================================================================

pub fn require_arity(args: &[Expression], expected: usize, name: &str) -> Result<(), SemanticError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(arity_error(name, &expected.to_string(), args.len()))
    }
}

pub fn require_arity_range(
    args: &[Expression],
    min: usize,
    max: usize,
    name: &str,
) -> Result<(), SemanticError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(arity_error(name, &format!("{} to {}", min, max), args.len()))
    }
}

pub fn require_at_least(args: &[Expression], min: usize, name: &str) -> Result<(), SemanticError> {
    if args.len() >= min {
        Ok(())
    } else {
        Err(arity_error(name, &format!("at least {}", min), args.len()))
    }
}

// ============================================================================
// ERRORS
// ============================================================================

pub fn arity_error(name: &str, expected: &str, actual: usize) -> SemanticError {
    semantic_err!(
        "in call to {}: invalid number of arguments (expected {}, got {})",
        name,
        expected,
        actual
    )
}

pub fn invalid_argument(name: &str, found: &Expression) -> SemanticError {
    semantic_err!(
        "in call to {}: invalid argument of type {}",
        name,
        found.type_name()
    )
}
