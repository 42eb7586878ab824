//! Interpreter sessions: parse, evaluate, reset.
//!
//! An [`Interpreter`] owns one [`Environment`] for its whole life. Programs are
//! parsed into the session first and evaluated on demand, so a caller can
//! report parse and evaluation failures separately.

use tracing::debug;

use crate::ast::Expression;
use crate::diagnostics::{ParseError, PlotscriptError, SemanticError};
use crate::runtime::{evaluate, Environment, EvaluationContext, DEFAULT_MAX_DEPTH};
use crate::syntax::parse;

/// User-level geometry constructors loaded into every fresh session.
pub const PRELUDE: &str = r#"
; geometry constructors
(begin
  (define make-point
    (lambda (x y)
      (set-property "size" 0
        (set-property "object-name" "point" (list x y)))))
  (define make-line
    (lambda (p1 p2)
      (set-property "thickness" 1
        (set-property "object-name" "line" (list p1 p2)))))
  (define make-text
    (lambda (s)
      (set-property "text-rotation" 0
        (set-property "text-scale" 1
          (set-property "position" (make-point 0 0)
            (set-property "object-name" "text" s)))))))
"#;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Ceiling on nested evaluation frames.
    pub max_depth: usize,
    /// Load [`PRELUDE`] on creation and on every reset.
    pub load_prelude: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            load_prelude: true,
        }
    }
}

// ============================================================================
// INTERPRETER
// ============================================================================

#[derive(Debug, Clone)]
pub struct Interpreter {
    config: InterpreterConfig,
    env: Environment,
    program: Option<Expression>,
}

impl Interpreter {
    pub fn new() -> Result<Self, PlotscriptError> {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Result<Self, PlotscriptError> {
        let mut interpreter = Self {
            config,
            env: Environment::new(),
            program: None,
        };
        interpreter.load_prelude()?;
        Ok(interpreter)
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Parses `source` and keeps it as the program for the next [`evaluate`](Self::evaluate).
    ///
    /// On failure the previously parsed program is discarded.
    pub fn parse_stream(&mut self, source: &str) -> Result<(), ParseError> {
        self.program = None;
        self.program = Some(parse(source)?);
        Ok(())
    }

    /// Evaluates the parsed program against the session environment.
    pub fn evaluate(&mut self) -> Result<Expression, SemanticError> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| SemanticError::new("no program has been parsed"))?;
        let mut context = EvaluationContext::new(&mut self.env, self.config.max_depth);
        evaluate(program, &mut context)
    }

    pub fn run(&mut self, source: &str) -> Result<Expression, PlotscriptError> {
        self.parse_stream(source)?;
        Ok(self.evaluate()?)
    }

    /// Drops every user binding and reloads the prelude.
    pub fn reset(&mut self) -> Result<(), PlotscriptError> {
        self.env.reset();
        self.program = None;
        self.load_prelude()
    }

    fn load_prelude(&mut self) -> Result<(), PlotscriptError> {
        if !self.config.load_prelude {
            return Ok(());
        }
        self.run(PRELUDE)?;
        self.program = None;
        debug!("prelude loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::geometry::{coordinates, number_property, object_name};

    #[test]
    fn run_keeps_definitions_between_calls() {
        let mut interp = Interpreter::new().unwrap();
        interp.run("(define a 2)").unwrap();
        assert_eq!(interp.run("(* a 3)").unwrap(), Expression::number(6.0));
    }

    #[test]
    fn evaluate_without_program_is_an_error() {
        let mut interp = Interpreter::new().unwrap();
        assert!(interp.evaluate().is_err());
    }

    #[test]
    fn failed_parse_clears_the_program() {
        let mut interp = Interpreter::new().unwrap();
        interp.parse_stream("(+ 1 2)").unwrap();
        assert!(interp.parse_stream("(+ 1").is_err());
        assert!(interp.evaluate().is_err());
    }

    #[test]
    fn prelude_builds_geometry() {
        let mut interp = Interpreter::new().unwrap();
        let point = interp.run("(make-point 1 2)").unwrap();
        assert_eq!(object_name(&point), Some("point"));
        assert_eq!(coordinates(&point), Some((1.0, 2.0)));
        assert_eq!(number_property(&point, "size"), Some(0.0));

        let line = interp
            .run("(make-line (make-point 0 0) (make-point 1 1))")
            .unwrap();
        assert_eq!(object_name(&line), Some("line"));
        assert_eq!(number_property(&line, "thickness"), Some(1.0));

        let text = interp.run(r#"(make-text "hi")"#).unwrap();
        assert_eq!(object_name(&text), Some("text"));
        assert_eq!(text.property("position").and_then(coordinates), Some((0.0, 0.0)));
        assert_eq!(number_property(&text, "text-scale"), Some(1.0));
        assert_eq!(number_property(&text, "text-rotation"), Some(0.0));
    }

    #[test]
    fn prelude_can_be_disabled() {
        let config = InterpreterConfig {
            load_prelude: false,
            ..InterpreterConfig::default()
        };
        let mut interp = Interpreter::with_config(config).unwrap();
        assert!(interp.run("(make-point 1 2)").is_err());
    }

    #[test]
    fn reset_forgets_user_bindings() {
        let mut interp = Interpreter::new().unwrap();
        interp.run("(define a 2)").unwrap();
        interp.reset().unwrap();
        assert!(interp.run("(a)").is_err());
        assert!(interp.run("(make-point 0 0)").is_ok());
    }

    #[test]
    fn configured_depth_is_enforced() {
        let config = InterpreterConfig {
            max_depth: 3,
            ..InterpreterConfig::default()
        };
        let mut interp = Interpreter::with_config(config).unwrap();
        let err = interp.run("(+ 1 (+ 1 (+ 1 (+ 1 (+ 1 1)))))").unwrap_err();
        assert!(err.is_semantic());
    }
}
