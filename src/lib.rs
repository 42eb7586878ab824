//! # Plotscript
//!
//! A small Scheme-like expression language with real and complex arithmetic,
//! list procedures, closures, properties and declarative plot geometry.
//!
//! ## Module Structure
//!
//! - **`syntax`**: pest reader from text to [`Expression`]
//! - **`ast`**: atoms and expression trees
//! - **`runtime`**: environment and evaluator
//! - **`procedures`**: built-in arithmetic and list procedures
//! - **`plot`**: `discrete-plot` and `continuous-plot` geometry
//! - **`render`**: flattening results into drawable scene items
//! - **`engine`**: interpreter sessions and the prelude
//! - **`mailbox`** / **`repl`**: the threaded kernel and interactive loop
//! - **`cli`**: the `plotscript` binary

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod mailbox;
pub mod plot;
pub mod procedures;
pub mod render;
pub mod repl;
pub mod runtime;
pub mod syntax;

pub use ast::{Atom, Expression};
pub use diagnostics::{ParseError, PlotscriptError, RenderError, SemanticError};
pub use engine::{Interpreter, InterpreterConfig};
pub use mailbox::{KernelChannels, Mailbox};
pub use render::{Scene, SceneItem};
pub use repl::Kernel;
pub use runtime::{apply, eval, Environment};
pub use syntax::parse;
