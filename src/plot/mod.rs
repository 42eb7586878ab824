//! # Plot Generation
//!
//! `discrete-plot` and `continuous-plot` turn evaluated data into declarative
//! geometry: points, lines and rotated text, all plain [`Expression`] values.
//!
//! ## Module Structure
//!
//! - **`geometry`**: point, line and text constructors
//! - **`layout`**: scaling, frame, axes, tick labels, option texts
//! - **`discrete`**: stem plots of explicit data
//! - **`continuous`**: adaptive sampling of a closure

pub mod continuous;
pub mod discrete;
pub mod geometry;
pub mod layout;

pub use continuous::continuous_plot;
pub use discrete::discrete_plot;
pub use layout::{format_label, Layout, PlotOptions};

use crate::ast::Expression;
use crate::diagnostics::SemanticError;
use crate::runtime::EvaluationContext;

/// Evaluates and validates the optional options argument.
fn read_options(
    options: Option<&Expression>,
    form: &str,
    context: &mut EvaluationContext,
) -> Result<PlotOptions, SemanticError> {
    match options {
        Some(expr) => PlotOptions::parse(&context.eval_nested(expr)?, form),
        None => Ok(PlotOptions::default()),
    }
}

/// Hands the geometry to the procedure bound under the plot's own name.
fn finish(form: &str, items: &[Expression], context: &EvaluationContext) -> Result<Expression, SemanticError> {
    context.env.lookup_procedure(form)(items)
}
