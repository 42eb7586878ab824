//! Reader for plotscript source text.

pub mod parser;

pub use parser::{parse, MAX_NESTING_DEPTH};
