//! The universal value/AST node: an atom head, ordered children and properties.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::atom::{Atom, LAMBDA, LIST, NONE};

/// A tree of atoms that doubles as the runtime value type.
///
/// Properties live in an ordered map, so two expressions with the same
/// properties compare equal whatever order the properties were attached in.
///
/// # Examples
///
/// ```rust
/// use plotscript::ast::{Atom, Expression};
/// let list = Expression::list(vec![Expression::number(1.0), Expression::number(2.0)]);
/// assert!(list.is_list());
/// assert_eq!(list.tail().len(), 2);
/// assert_eq!(list.to_string(), "((1) (2))");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expression {
    head: Atom,
    tail: Vec<Expression>,
    properties: BTreeMap<String, Expression>,
}

impl Expression {
    pub fn new(head: Atom) -> Self {
        Self {
            head,
            tail: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_tail(head: Atom, tail: Vec<Expression>) -> Self {
        Self {
            head,
            tail,
            properties: BTreeMap::new(),
        }
    }

    pub fn number(value: f64) -> Self {
        Self::new(Atom::Number(value))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Self::new(Atom::complex(re, im))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(Atom::symbol(name))
    }

    /// A string literal; `text` is given without quotes.
    pub fn string(text: &str) -> Self {
        Self::new(Atom::string(text))
    }

    pub fn list(items: Vec<Expression>) -> Self {
        Self::with_tail(Atom::symbol(LIST), items)
    }

    /// The `NONE` marker returned for absent properties.
    pub fn none_marker() -> Self {
        Self::symbol(NONE)
    }

    /// Builds a closure value from its parameter names and unevaluated body.
    pub fn closure(params: Vec<String>, body: Expression) -> Self {
        let params = Expression::with_tail(
            Atom::None,
            params.into_iter().map(Expression::symbol).collect(),
        );
        Self::with_tail(Atom::symbol(LAMBDA), vec![params, body])
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn head(&self) -> &Atom {
        &self.head
    }

    pub fn tail(&self) -> &[Expression] {
        &self.tail
    }

    pub fn into_tail(self) -> Vec<Expression> {
        self.tail
    }

    pub fn push(&mut self, child: Expression) {
        self.tail.push(child);
    }

    pub fn properties(&self) -> &BTreeMap<String, Expression> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Expression> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Expression) {
        self.properties.insert(key.into(), value);
    }

    /// Builder form of [`Expression::set_property`].
    pub fn with_property(mut self, key: impl Into<String>, value: Expression) -> Self {
        self.set_property(key, value);
        self
    }

    // ------------------------------------------------------------------------
    // Shape predicates
    // ------------------------------------------------------------------------

    pub fn is_leaf(&self) -> bool {
        self.tail.is_empty()
    }

    pub fn is_list(&self) -> bool {
        self.head.is_named(LIST)
    }

    pub fn is_closure(&self) -> bool {
        self.head.is_named(LAMBDA)
    }

    pub fn is_none(&self) -> bool {
        self.head.is_none() && self.tail.is_empty()
    }

    pub fn as_number(&self) -> Option<f64> {
        if self.is_leaf() {
            self.head.as_number()
        } else {
            None
        }
    }

    /// Parameter names and body of a closure value.
    pub fn closure_parts(&self) -> Option<(Vec<&str>, &Expression)> {
        if !self.is_closure() || self.tail.len() != 2 {
            return None;
        }
        let params = self.tail[0]
            .tail
            .iter()
            .map(|p| p.head.as_symbol())
            .collect::<Option<Vec<_>>>()?;
        Some((params, &self.tail[1]))
    }

    /// Short description used in error messages.
    pub fn type_name(&self) -> &'static str {
        if self.is_list() {
            "list"
        } else if self.is_closure() {
            "lambda"
        } else if self.is_leaf() {
            self.head.type_name()
        } else {
            "expression"
        }
    }
}

impl From<Atom> for Expression {
    fn from(atom: Atom) -> Self {
        Expression::new(atom)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::number(value)
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.head {
            Atom::Complex(_) => {
                write!(f, "{}", self.head)?;
                for child in &self.tail {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Atom::None if self.tail.is_empty() => write!(f, "{}", NONE),
            Atom::Symbol(s) if s == LIST => {
                write!(f, "(")?;
                write_separated(f, &self.tail)?;
                write!(f, ")")
            }
            Atom::Symbol(s) if s == LAMBDA => match self.closure_parts() {
                Some((params, body)) => write!(f, "(lambda ({}) {})", params.join(" "), body),
                None => {
                    write!(f, "(lambda ")?;
                    write_separated(f, &self.tail)?;
                    write!(f, ")")
                }
            },
            Atom::Symbol(s) if s == NONE && self.tail.is_empty() => write!(f, "{}", NONE),
            Atom::Symbol(_) => {
                write!(f, "({}", self.head)?;
                for child in &self.tail {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            _ => {
                write!(f, "({}", self.head)?;
                if !self.tail.is_empty() {
                    write!(f, " ")?;
                    write_separated(f, &self.tail)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
