//! Evaluation runtime: the environment and the evaluator.

pub mod environment;
pub mod eval;

pub use environment::{EnvEntry, Environment, Procedure, SPECIAL_FORMS};
pub use eval::{apply, eval, evaluate, invoke_closure, EvaluationContext, DEFAULT_MAX_DEPTH};
