//! Leaf values of the expression tree.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// The symbol `list`, head of every list value.
pub const LIST: &str = "list";
/// The symbol `lambda`, head of every closure value.
pub const LAMBDA: &str = "lambda";
/// The distinguished result of `get-property` when a key is absent.
pub const NONE: &str = "NONE";

/// An immutable leaf value.
///
/// String literals are symbols whose text keeps its surrounding quotes, so
/// `"point"` and `point` are different symbols.
///
/// # Examples
///
/// ```rust
/// use plotscript::ast::Atom;
/// assert!(Atom::symbol("\"hi\"").is_string());
/// assert!(!Atom::symbol("hi").is_string());
/// assert_eq!(Atom::Number(2.0).as_number(), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Atom {
    #[default]
    None,
    Symbol(String),
    Number(f64),
    Complex(Complex64),
}

impl Atom {
    pub fn symbol(name: impl Into<String>) -> Self {
        Atom::Symbol(name.into())
    }

    /// Builds a string literal atom, adding the quotes.
    pub fn string(text: &str) -> Self {
        Atom::Symbol(format!("\"{}\"", text))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Atom::Complex(Complex64::new(re, im))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Atom::None)
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Atom::Symbol(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Atom::Number(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Atom::Complex(_))
    }

    /// True for quoted string literals.
    pub fn is_string(&self) -> bool {
        matches!(self, Atom::Symbol(s) if s.starts_with('"'))
    }

    /// True for symbols that are identifiers rather than string literals.
    pub fn is_bare_symbol(&self) -> bool {
        matches!(self, Atom::Symbol(s) if !s.starts_with('"'))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Atom::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Atom::Complex(c) => Some(*c),
            _ => None,
        }
    }

    /// Text of a string literal with the quotes removed.
    pub fn string_contents(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) if s.starts_with('"') => {
                let inner = &s[1..];
                Some(inner.strip_suffix('"').unwrap_or(inner))
            }
            _ => None,
        }
    }

    /// True when this atom is the symbol `name`.
    pub fn is_named(&self, name: &str) -> bool {
        matches!(self, Atom::Symbol(s) if s == name)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::None => "none",
            Atom::Symbol(s) if s.starts_with('"') => "string",
            Atom::Symbol(_) => "symbol",
            Atom::Number(_) => "number",
            Atom::Complex(_) => "complex",
        }
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Atom::Number(value)
    }
}

impl From<Complex64> for Atom {
    fn from(value: Complex64) -> Self {
        Atom::Complex(value)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::None => write!(f, "{}", NONE),
            Atom::Symbol(s) => write!(f, "{}", s),
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Complex(c) => write!(f, "({},{})", c.re, c.im),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_literals_keep_their_quotes() {
        let atom = Atom::string("title");
        assert_eq!(atom.as_symbol(), Some("\"title\""));
        assert_eq!(atom.string_contents(), Some("title"));
        assert_eq!(atom.type_name(), "string");
    }

    #[test]
    fn display_matches_repl_format() {
        assert_eq!(Atom::Number(3.0).to_string(), "3");
        assert_eq!(Atom::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Atom::complex(0.0, 1.0).to_string(), "(0,1)");
        assert_eq!(Atom::None.to_string(), "NONE");
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Atom::symbol("x"), Atom::symbol("x"));
        assert_ne!(Atom::symbol("x"), Atom::string("x"));
        assert_ne!(Atom::Number(1.0), Atom::complex(1.0, 0.0));
    }
}
