//! Shared helpers for the integration tests.

#![allow(dead_code)]

use plotscript::{Expression, Interpreter, PlotscriptError};

/// Runs `program` in a fresh interpreter with the prelude loaded.
pub fn run(program: &str) -> Result<Expression, PlotscriptError> {
    Interpreter::new()?.run(program)
}

/// Runs `program` and panics with the error text on failure.
pub fn run_ok(program: &str) -> Expression {
    match run(program) {
        Ok(value) => value,
        Err(err) => panic!("`{}` failed: {}", program, err),
    }
}

/// Asserts that `program` parses but fails to evaluate.
pub fn assert_semantic_error(program: &str) {
    let mut interpreter = Interpreter::new().expect("fresh interpreter");
    interpreter
        .parse_stream(program)
        .unwrap_or_else(|err| panic!("`{}` should parse: {}", program, err));
    assert!(
        interpreter.evaluate().is_err(),
        "`{}` should fail to evaluate",
        program
    );
}

pub fn number(value: f64) -> Expression {
    Expression::number(value)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
