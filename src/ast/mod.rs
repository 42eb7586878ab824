//! Data model for the plotscript language.
//!
//! An [`Expression`] is both the syntax tree handed over by the reader and the
//! runtime value produced by evaluation. Its head is an [`Atom`]; lists, closures
//! and plot geometry are all expressions distinguished by head symbol and
//! properties.

pub mod atom;
pub mod expression;

pub use atom::{Atom, LAMBDA, LIST, NONE};
pub use expression::Expression;
