//! # Environment
//!
//! The symbol table consulted by evaluation. A symbol maps either to a bound
//! [`Expression`] value or to a built-in [`Procedure`], never both.
//!
//! The map is an `im::HashMap`, so cloning an environment for a closure call
//! shares structure with the caller instead of copying every binding.
//!
//! ## Reserved Names
//!
//! Special-form keywords and built-in procedure names can never be rebound.
//! [`Environment::bind`] enforces this for every caller, including parameter
//! binding during closure calls.

use std::f64::consts;

use im::HashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::ast::{Atom, Expression};
use crate::diagnostics::SemanticError;
use crate::procedures;
use crate::semantic_err;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A built-in procedure over already-evaluated arguments.
pub type Procedure = fn(args: &[Expression]) -> Result<Expression, SemanticError>;

/// Keywords handled directly by the evaluator.
pub const SPECIAL_FORMS: &[&str] = &[
    "begin",
    "define",
    "lambda",
    "apply",
    "map",
    "set-property",
    "get-property",
    "discrete-plot",
    "continuous-plot",
];

#[derive(Debug, Clone)]
pub enum EnvEntry {
    Value(Expression),
    Procedure(Procedure),
}

#[derive(Debug, Clone)]
pub struct Environment {
    entries: HashMap<String, EnvEntry>,
}

/// Fully seeded bindings, built once and cloned on every `new`/`reset`.
static DEFAULT_ENVIRONMENT: Lazy<Environment> = Lazy::new(|| {
    let mut env = Environment {
        entries: HashMap::new(),
    };
    env.seed_constants();
    procedures::register_all(&mut env);
    env
});

fn default_procedure(_args: &[Expression]) -> Result<Expression, SemanticError> {
    Ok(Expression::default())
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// A fresh environment holding `pi`, `e`, `I` and every built-in procedure.
    pub fn new() -> Self {
        DEFAULT_ENVIRONMENT.clone()
    }

    /// Restores the default bindings, discarding everything user code defined.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn seed_constants(&mut self) {
        let constants = [
            ("pi", Expression::number(consts::PI)),
            ("e", Expression::number(consts::E)),
            ("I", Expression::complex(0.0, 1.0)),
        ];
        for (name, value) in constants {
            self.entries.insert(name.to_string(), EnvEntry::Value(value));
        }
    }

    /// Registers a built-in procedure. Only used while seeding defaults.
    pub(crate) fn register(&mut self, name: &str, procedure: Procedure) {
        self.entries
            .insert(name.to_string(), EnvEntry::Procedure(procedure));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_bound(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn is_procedure(&self, symbol: &str) -> bool {
        matches!(self.entries.get(symbol), Some(EnvEntry::Procedure(_)))
    }

    /// True when `symbol` is bound to a closure value.
    pub fn is_closure(&self, symbol: &str) -> bool {
        matches!(self.entries.get(symbol), Some(EnvEntry::Value(v)) if v.is_closure())
    }

    /// Whether `atom` is a symbol naming a built-in procedure.
    pub fn names_procedure(&self, atom: &Atom) -> bool {
        atom.as_symbol().is_some_and(|s| self.is_procedure(s))
    }

    pub fn lookup_value(&self, symbol: &str) -> Result<&Expression, SemanticError> {
        match self.entries.get(symbol) {
            Some(EnvEntry::Value(value)) => Ok(value),
            _ => Err(semantic_err!("unknown symbol '{}'", symbol)),
        }
    }

    /// Never fails: an unbound name resolves to a procedure returning the empty expression.
    pub fn lookup_procedure(&self, symbol: &str) -> Procedure {
        match self.entries.get(symbol) {
            Some(EnvEntry::Procedure(procedure)) => *procedure,
            _ => default_procedure,
        }
    }

    /// Sorted names of every built-in procedure.
    pub fn procedure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, EnvEntry::Procedure(_)))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    /// Binds `symbol` to `value`, overwriting any previous value binding.
    pub fn bind(&mut self, symbol: &str, value: Expression) -> Result<(), SemanticError> {
        if SPECIAL_FORMS.contains(&symbol) {
            return Err(semantic_err!(
                "attempt to redefine a special-form '{}'",
                symbol
            ));
        }
        if self.is_procedure(symbol) {
            return Err(semantic_err!(
                "attempt to redefine a built-in procedure '{}'",
                symbol
            ));
        }
        debug!(symbol, value = %value, "bind");
        self.entries.insert(symbol.to_string(), EnvEntry::Value(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_seeded() {
        let env = Environment::new();
        assert_eq!(
            env.lookup_value("pi").unwrap(),
            &Expression::number(consts::PI)
        );
        assert_eq!(
            env.lookup_value("I").unwrap(),
            &Expression::complex(0.0, 1.0)
        );
        for name in ["+", "sqrt", "range", "discrete-plot", "continuous-plot"] {
            assert!(env.is_procedure(name), "{} should be a procedure", name);
        }
    }

    #[test]
    fn procedures_are_not_values() {
        let env = Environment::new();
        assert!(env.lookup_value("+").is_err());
        assert!(env.lookup_value("undefined").is_err());
    }

    #[test]
    fn unbound_procedure_lookup_yields_default() {
        let env = Environment::new();
        let procedure = env.lookup_procedure("no-such-procedure");
        assert!(procedure(&[]).unwrap().is_none());
    }

    #[test]
    fn bind_refuses_reserved_names() {
        let mut env = Environment::new();
        assert!(env.bind("define", Expression::number(1.0)).is_err());
        assert!(env.bind("map", Expression::number(1.0)).is_err());
        assert!(env.bind("+", Expression::number(1.0)).is_err());
        assert!(env.bind("pi", Expression::number(3.14)).is_ok());
        assert_eq!(env.lookup_value("pi").unwrap(), &Expression::number(3.14));
    }

    #[test]
    fn reset_discards_user_bindings() {
        let mut env = Environment::new();
        env.bind("x", Expression::number(1.0)).unwrap();
        assert!(env.is_bound("x"));
        env.reset();
        assert!(!env.is_bound("x"));
        assert!(env.is_bound("pi"));
    }

    #[test]
    fn procedure_names_are_sorted() {
        let names = Environment::new().procedure_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"join".to_string()));
        assert!(!names.contains(&"pi".to_string()));
    }
}
