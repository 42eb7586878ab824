//! `discrete-plot`: a stem plot of explicit `(x y)` data.

use crate::ast::Expression;
use crate::diagnostics::SemanticError;
use crate::plot::geometry::{self, DATA_POINT_SIZE, FRAME_POINT_SIZE, PLOT_LINE_THICKNESS};
use crate::plot::layout::Layout;
use crate::plot::{finish, read_options};
use crate::runtime::EvaluationContext;
use crate::semantic_err;

pub const FORM: &str = "discrete-plot";

/// Evaluates `(discrete-plot data [options])`.
///
/// Output order: frame boundary, option texts, tick labels, axes, then a
/// point and its stem line for every datum.
pub fn discrete_plot(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if !(1..=2).contains(&tail.len()) {
        return Err(semantic_err!("in call to {}: invalid number of arguments", FORM));
    }
    let data = context.eval_nested(&tail[0])?;
    let options = read_options(tail.get(1), FORM, context)?;
    let points = data_points(&data)?;
    let layout = Layout::from_points(&points)
        .ok_or_else(|| semantic_err!("in call to {}: data list is empty", FORM))?;

    let mut items = layout.boundaries();
    items.extend(layout.option_texts(&options));
    items.extend(layout.labels(options.text_scale));
    items.extend(layout.axes());

    let stem_y = stem_target(&layout);
    for &datum in &points {
        let (x, y) = layout.scale(datum);
        let marker = geometry::point(x, y, DATA_POINT_SIZE);
        let stem = geometry::line(
            marker.clone(),
            geometry::point(x, stem_y, FRAME_POINT_SIZE),
            PLOT_LINE_THICKNESS,
        );
        items.push(marker);
        items.push(stem);
    }

    finish(FORM, &items, context)
}

/// Where stems end: the x axis when it is visible, otherwise the nearest frame edge.
fn stem_target(layout: &Layout) -> f64 {
    if layout.y_min > 0.0 {
        layout.y_smin()
    } else if layout.y_max < 0.0 {
        layout.y_smax()
    } else {
        0.0
    }
}

fn data_points(data: &Expression) -> Result<Vec<(f64, f64)>, SemanticError> {
    if !data.is_list() {
        return Err(semantic_err!("in call to {}: data must be a list", FORM));
    }
    data.tail()
        .iter()
        .map(|datum| {
            geometry::coordinates(datum).ok_or_else(|| {
                semantic_err!(
                    "in call to {}: each datum must be a list of two real numbers",
                    FORM
                )
            })
        })
        .collect()
}
