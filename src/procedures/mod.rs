//! # Built-in Procedures
//!
//! Every built-in takes already-evaluated arguments and returns a fresh
//! expression. Special forms are not procedures; they live in the evaluator.
//!
//! ## Module Structure
//!
//! - **`helpers`**: argument extraction, arity checks, numeric promotion
//! - **`math`**: real and complex arithmetic and elementary functions
//! - **`collections`**: list construction and access, `range`, plot packing

pub mod collections;
pub mod helpers;
pub mod math;

use crate::runtime::environment::Environment;

pub use collections::register_collection_procedures;
pub use math::register_math_procedures;

/// Registers every built-in procedure.
pub fn register_all(env: &mut Environment) {
    register_math_procedures(env);
    register_collection_procedures(env);
}
