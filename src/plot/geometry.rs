//! Constructors and accessors for plot geometry elements.
//!
//! Geometry is ordinary [`Expression`] data tagged through its `object-name`
//! property, so user code can build and inspect the same shapes.

use crate::ast::Expression;

pub const OBJECT_NAME: &str = "object-name";
pub const SIZE: &str = "size";
pub const THICKNESS: &str = "thickness";
pub const POSITION: &str = "position";
pub const TEXT_SCALE: &str = "text-scale";
pub const TEXT_ROTATION: &str = "text-rotation";

/// Diameter of frame points and line endpoints.
pub const FRAME_POINT_SIZE: f64 = 0.0;
/// Diameter of discrete data points.
pub const DATA_POINT_SIZE: f64 = 0.5;
/// Thickness of every line a plot emits.
pub const PLOT_LINE_THICKNESS: f64 = 0.0;

/// A point `(x y)`.
pub fn point(x: f64, y: f64, size: f64) -> Expression {
    Expression::list(vec![Expression::number(x), Expression::number(y)])
        .with_property(OBJECT_NAME, Expression::string("point"))
        .with_property(SIZE, Expression::number(size))
}

/// A line between two points.
pub fn line(from: Expression, to: Expression, thickness: f64) -> Expression {
    Expression::list(vec![from, to])
        .with_property(OBJECT_NAME, Expression::string("line"))
        .with_property(THICKNESS, Expression::number(thickness))
}

/// A plot line between two coordinates, with zero-size endpoints.
pub fn segment(from: (f64, f64), to: (f64, f64)) -> Expression {
    line(
        point(from.0, from.1, FRAME_POINT_SIZE),
        point(to.0, to.1, FRAME_POINT_SIZE),
        PLOT_LINE_THICKNESS,
    )
}

/// A text element. `label` is the string literal text, without quotes.
pub fn text(label: &str, at: (f64, f64), rotation: f64, scale: f64) -> Expression {
    text_from(Expression::string(label), at, rotation, scale)
}

/// A text element reusing an existing string literal expression.
pub fn text_from(literal: Expression, at: (f64, f64), rotation: f64, scale: f64) -> Expression {
    literal
        .with_property(OBJECT_NAME, Expression::string("text"))
        .with_property(POSITION, point(at.0, at.1, FRAME_POINT_SIZE))
        .with_property(TEXT_ROTATION, Expression::number(rotation))
        .with_property(TEXT_SCALE, Expression::number(scale))
}

/// The `object-name` of `expr`, without quotes.
pub fn object_name(expr: &Expression) -> Option<&str> {
    expr.property(OBJECT_NAME)
        .filter(|name| name.is_leaf())
        .and_then(|name| name.head().string_contents())
}

/// Coordinates of a two-element numeric list.
pub fn coordinates(expr: &Expression) -> Option<(f64, f64)> {
    match expr.tail() {
        [x, y] if expr.is_list() => Some((x.as_number()?, y.as_number()?)),
        _ => None,
    }
}

/// A numeric property value.
pub fn number_property(expr: &Expression, key: &str) -> Option<f64> {
    expr.property(key).and_then(Expression::as_number)
}
