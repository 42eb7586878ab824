//! # Numeric Procedures
//!
//! Arithmetic and elementary functions over real and complex numbers. If any
//! argument is complex the result is complex; all-real arguments give a real.
//!
//! ## Procedures Provided
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `^`
//! - **Functions**: `sqrt`, `ln`, `sin`, `cos`, `tan`
//! - **Complex parts**: `real`, `imag`, `mag`, `arg`, `conj`

use num_complex::Complex64;

use crate::ast::{Atom, Expression};
use crate::procedures::helpers::{
    complex_arg, numeric_arg, real_arg, require_arity, require_arity_range, require_at_least,
    Numeric,
};
use crate::runtime::environment::{Environment, Procedure};
use crate::semantic_err;

// ============================================================================
// ARITHMETIC
// ============================================================================

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///
/// Example:
///   (+ 1 2 3) ; => 6
///   (+ 1 I)   ; => (1,1)
pub const ADD: Procedure = |args| {
    require_at_least(args, 1, "+")?;
    let mut sum = Numeric::Real(0.0);
    for arg in args {
        sum = sum.combine(numeric_arg(arg, "+")?, |a, b| a + b, |a, b| a + b);
    }
    Ok(sum.into())
};

/// Multiplies numbers.
///
/// Usage: (* <a> <b> ...)
pub const MUL: Procedure = |args| {
    require_at_least(args, 1, "*")?;
    let mut product = Numeric::Real(1.0);
    for arg in args {
        product = product.combine(numeric_arg(arg, "*")?, |a, b| a * b, |a, b| a * b);
    }
    Ok(product.into())
};

/// Negates one number or subtracts the second from the first.
///
/// Usage: (- <a>) | (- <a> <b>)
pub const SUB: Procedure = |args| {
    require_arity_range(args, 1, 2, "-")?;
    let first = numeric_arg(&args[0], "-")?;
    let result = match args.get(1) {
        None => Numeric::Real(0.0).combine(first, |_, b| -b, |_, b| -b),
        Some(second) => first.combine(numeric_arg(second, "-")?, |a, b| a - b, |a, b| a - b),
    };
    Ok(result.into())
};

/// Inverts one number or divides the first by the second.
///
/// Real division by zero yields an IEEE infinity or NaN.
///
/// Usage: (/ <a>) | (/ <a> <b>)
pub const DIV: Procedure = |args| {
    require_arity_range(args, 1, 2, "/")?;
    let first = numeric_arg(&args[0], "/")?;
    let result = match args.get(1) {
        None => Numeric::Real(1.0).combine(first, |a, b| a / b, |a, b| a / b),
        Some(second) => first.combine(numeric_arg(second, "/")?, |a, b| a / b, |a, b| a / b),
    };
    Ok(result.into())
};

/// Raises the first argument to the power of the second.
///
/// Usage: (^ <base> <exponent>)
pub const POW: Procedure = |args| {
    require_arity(args, 2, "^")?;
    let base = numeric_arg(&args[0], "^")?;
    let exponent = numeric_arg(&args[1], "^")?;
    Ok(base.combine(exponent, f64::powf, |a, b| a.powc(b)).into())
};

// ============================================================================
// ELEMENTARY FUNCTIONS
// ============================================================================

/// Zeroes a component within epsilon of zero, but only while the other
/// component is nonzero. A lone tiny real or imaginary part is kept.
fn snap_to_zero(value: Complex64) -> Complex64 {
    let snap = |x: f64, other: f64| {
        if x.abs() <= f64::EPSILON && other != 0.0 {
            0.0
        } else {
            x
        }
    };
    Complex64::new(snap(value.re, value.im), snap(value.im, value.re))
}

/// Square root. Negative reals produce a complex result.
///
/// Example:
///   (sqrt 4)  ; => 2
///   (sqrt -1) ; => (0,1)
pub const SQRT: Procedure = |args| {
    require_arity(args, 1, "sqrt")?;
    let result = match numeric_arg(&args[0], "sqrt")? {
        Numeric::Real(r) if r >= 0.0 => Numeric::Real(r.sqrt()),
        Numeric::Real(r) => Numeric::Complex(Complex64::new(0.0, (-r).sqrt())),
        Numeric::Complex(c) => Numeric::Complex(snap_to_zero(c.sqrt())),
    };
    Ok(result.into())
};

/// Natural logarithm of a positive real.
pub const LN: Procedure = |args| {
    require_arity(args, 1, "ln")?;
    let value = real_arg(&args[0], "ln")?;
    if value <= 0.0 {
        return Err(semantic_err!("in call to ln: non-positive argument {}", value));
    }
    Ok(Expression::number(value.ln()))
};

pub const SIN: Procedure = |args| {
    require_arity(args, 1, "sin")?;
    Ok(Expression::number(real_arg(&args[0], "sin")?.sin()))
};

pub const COS: Procedure = |args| {
    require_arity(args, 1, "cos")?;
    Ok(Expression::number(real_arg(&args[0], "cos")?.cos()))
};

pub const TAN: Procedure = |args| {
    require_arity(args, 1, "tan")?;
    Ok(Expression::number(real_arg(&args[0], "tan")?.tan()))
};

// ============================================================================
// COMPLEX PARTS
// ============================================================================

pub const REAL: Procedure = |args| {
    require_arity(args, 1, "real")?;
    Ok(Expression::number(complex_arg(&args[0], "real")?.re))
};

pub const IMAG: Procedure = |args| {
    require_arity(args, 1, "imag")?;
    Ok(Expression::number(complex_arg(&args[0], "imag")?.im))
};

/// Magnitude of a complex number.
pub const MAG: Procedure = |args| {
    require_arity(args, 1, "mag")?;
    Ok(Expression::number(complex_arg(&args[0], "mag")?.norm()))
};

/// Phase angle of a complex number, in radians.
pub const ARG: Procedure = |args| {
    require_arity(args, 1, "arg")?;
    Ok(Expression::number(complex_arg(&args[0], "arg")?.arg()))
};

pub const CONJ: Procedure = |args| {
    require_arity(args, 1, "conj")?;
    let value = complex_arg(&args[0], "conj")?;
    Ok(Expression::new(Atom::Complex(value.conj())))
};

// ============================================================================
// REGISTRATION
// ============================================================================

pub fn register_math_procedures(env: &mut Environment) {
    env.register("+", ADD);
    env.register("-", SUB);
    env.register("*", MUL);
    env.register("/", DIV);
    env.register("^", POW);
    env.register("sqrt", SQRT);
    env.register("ln", LN);
    env.register("sin", SIN);
    env.register("cos", COS);
    env.register("tan", TAN);
    env.register("real", REAL);
    env.register("imag", IMAG);
    env.register("mag", MAG);
    env.register("arg", ARG);
    env.register("conj", CONJ);
}
