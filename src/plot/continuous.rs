//! `continuous-plot`: adaptive sampling of a one-argument closure.
//!
//! The closure is sampled at evenly spaced points, then refined where the
//! curve bends: for non-overlapping triples of consecutive samples, a middle
//! angle below [`SMOOTHNESS_THRESHOLD_DEGREES`] triggers sampling at the
//! midpoints of both segments.

use tracing::debug;

use crate::ast::{Atom, Expression};
use crate::diagnostics::SemanticError;
use crate::plot::geometry;
use crate::plot::layout::Layout;
use crate::plot::{finish, read_options};
use crate::runtime::{invoke_closure, EvaluationContext};
use crate::semantic_err;

pub const FORM: &str = "continuous-plot";

pub const SAMPLE_COUNT: usize = 50;
pub const MAX_REFINEMENT_PASSES: usize = 10;
pub const MAX_CURVE_POINTS: usize = 90;
pub const SMOOTHNESS_THRESHOLD_DEGREES: f64 = 175.0;

/// Evaluates `(continuous-plot f (lo hi) [options])`.
///
/// Output order: curve segments, frame boundary, option texts, tick labels, axes.
pub fn continuous_plot(tail: &[Expression], context: &mut EvaluationContext) -> Result<Expression, SemanticError> {
    if !(2..=3).contains(&tail.len()) {
        return Err(semantic_err!("in call to {}: invalid number of arguments", FORM));
    }
    let function = resolve_function(&tail[0], context)?;
    let bounds = context.eval_nested(&tail[1])?;
    let (lo, hi) = geometry::coordinates(&bounds)
        .ok_or_else(|| semantic_err!("in call to {}: bounds must be a list of two real numbers", FORM))?;
    if lo >= hi {
        return Err(semantic_err!("in call to {}: lower bound must be below upper bound", FORM));
    }
    let options = read_options(tail.get(2), FORM, context)?;

    let curve = sample_curve(&function, lo, hi, context)?;
    let layout = Layout::from_points(&curve)
        .ok_or_else(|| semantic_err!("in call to {}: no samples", FORM))?;

    let mut items: Vec<Expression> = curve
        .windows(2)
        .map(|pair| geometry::segment(layout.scale(pair[0]), layout.scale(pair[1])))
        .collect();
    items.extend(layout.boundaries());
    items.extend(layout.option_texts(&options));
    items.extend(layout.labels(options.text_scale));
    items.extend(layout.axes());

    finish(FORM, &items, context)
}

fn resolve_function(expr: &Expression, context: &EvaluationContext) -> Result<Expression, SemanticError> {
    match expr.head() {
        Atom::Symbol(name) if expr.is_leaf() && context.env.is_closure(name) => {
            Ok(context.env.lookup_value(name)?.clone())
        }
        _ => Err(semantic_err!(
            "in call to {}: first argument must name a lambda",
            FORM
        )),
    }
}

/// Samples and refines `function` over `[lo, hi]`, returning data coordinates.
pub fn sample_curve(
    function: &Expression,
    lo: f64,
    hi: f64,
    context: &mut EvaluationContext,
) -> Result<Vec<(f64, f64)>, SemanticError> {
    let step = (hi - lo) / (SAMPLE_COUNT - 1) as f64;
    let mut points = (0..SAMPLE_COUNT)
        .map(|i| evaluate_at(function, lo + i as f64 * step, context))
        .collect::<Result<Vec<_>, _>>()?;

    for pass in 0..MAX_REFINEMENT_PASSES {
        let (refined, inserted) = refine_pass(&points, function, context)?;
        debug!(pass, inserted, total = refined.len(), "continuous-plot refinement");
        points = refined;
        if inserted == 0 {
            break;
        }
    }
    Ok(points)
}

fn evaluate_at(function: &Expression, x: f64, context: &mut EvaluationContext) -> Result<(f64, f64), SemanticError> {
    let y = invoke_closure(function, vec![Expression::number(x)], context)?;
    y.as_number().map(|y| (x, y)).ok_or_else(|| {
        semantic_err!(
            "in call to {}: function returned {} instead of a real number",
            FORM,
            y.type_name()
        )
    })
}

/// One refinement pass; returns the new point set and how many triples were split.
fn refine_pass(
    points: &[(f64, f64)],
    function: &Expression,
    context: &mut EvaluationContext,
) -> Result<(Vec<(f64, f64)>, usize), SemanticError> {
    let Some(&first) = points.first() else {
        return Ok((Vec::new(), 0));
    };
    let mut refined = Vec::with_capacity(MAX_CURVE_POINTS);
    refined.push(first);

    let mut budget = MAX_CURVE_POINTS.saturating_sub(points.len());
    let mut inserted = 0;
    let mut i = 0;
    while i + 2 < points.len() {
        let (a, b, c) = (points[i], points[i + 1], points[i + 2]);
        if budget >= 2 && angle_at(a, b, c) < SMOOTHNESS_THRESHOLD_DEGREES {
            refined.push(evaluate_at(function, (a.0 + b.0) / 2.0, context)?);
            refined.push(b);
            refined.push(evaluate_at(function, (b.0 + c.0) / 2.0, context)?);
            budget -= 2;
            inserted += 1;
        } else {
            refined.push(b);
        }
        refined.push(c);
        i += 2;
    }
    refined.extend_from_slice(&points[i + 1..]);
    Ok((refined, inserted))
}

/// Angle at `b` between the segments towards `a` and `c`, in degrees.
///
/// Degenerate segments give NaN, which never triggers refinement.
fn angle_at(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);
    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let norms = v1.0.hypot(v1.1) * v2.0.hypot(v2.1);
    (dot / norms).clamp(-1.0, 1.0).acos().to_degrees()
}
