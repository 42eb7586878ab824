//! Scene extraction: flattens an evaluated result into drawable items.
//!
//! A result renders according to its `object-name` property:
//!
//! - `"point"`: a filled circle of diameter `size`
//! - `"line"`: a segment between two points with a pen `thickness`
//! - `"text"`: a string drawn at `position`, rotated by `text-rotation` radians
//!
//! Lists without properties render each element; closures render nothing; any
//! other value renders as its display form.

use serde::Serialize;

use crate::ast::Expression;
use crate::diagnostics::RenderError;
use crate::plot::geometry::{
    coordinates, number_property, object_name, POSITION, SIZE, TEXT_ROTATION, TEXT_SCALE, THICKNESS,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneItem {
    Text {
        text: String,
    },
    Point {
        x: f64,
        y: f64,
        diameter: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        thickness: f64,
    },
    Label {
        text: String,
        x: f64,
        y: f64,
        rotation: f64,
        scale: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn from_expression(expr: &Expression) -> Result<Self, RenderError> {
        let mut scene = Scene::default();
        scene.collect(expr)?;
        Ok(scene)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn collect(&mut self, expr: &Expression) -> Result<(), RenderError> {
        match object_name(expr) {
            Some("point") => {
                let (x, y) = point_coordinates(expr, "point")?;
                let diameter = non_negative(expr, SIZE, 0.0, "point")?;
                self.items.push(SceneItem::Point { x, y, diameter });
            }
            Some("line") => {
                let (from, to) = match expr.tail() {
                    [from, to] if expr.is_list() => (
                        point_coordinates(from, "line")?,
                        point_coordinates(to, "line")?,
                    ),
                    _ => return Err(RenderError::new("line", "expected a list of two points")),
                };
                let thickness = non_negative(expr, THICKNESS, 1.0, "line")?;
                self.items.push(SceneItem::Line { from, to, thickness });
            }
            Some("text") => {
                let text = expr
                    .head()
                    .string_contents()
                    .filter(|_| expr.is_leaf())
                    .ok_or_else(|| RenderError::new("text", "expected a string"))?
                    .to_string();
                let (x, y) = match expr.property(POSITION) {
                    Some(position) => point_coordinates(position, "text")?,
                    None => (0.0, 0.0),
                };
                let rotation = number_property(expr, TEXT_ROTATION).unwrap_or(0.0);
                let scale = non_negative(expr, TEXT_SCALE, 1.0, "text")?;
                self.items.push(SceneItem::Label {
                    text,
                    x,
                    y,
                    rotation,
                    scale,
                });
            }
            Some(other) => return Err(RenderError::new(other, "unknown object-name")),
            None if expr.is_closure() => {}
            None if expr.is_list() => {
                for item in expr.tail() {
                    self.collect(item)?;
                }
            }
            None => self.items.push(SceneItem::Text {
                text: expr.to_string(),
            }),
        }
        Ok(())
    }
}

fn point_coordinates(expr: &Expression, object: &str) -> Result<(f64, f64), RenderError> {
    coordinates(expr).ok_or_else(|| RenderError::new(object, "expected a point (x y)"))
}

fn non_negative(expr: &Expression, key: &str, default: f64, object: &str) -> Result<f64, RenderError> {
    let value = match expr.property(key) {
        None => default,
        Some(value) => value
            .as_number()
            .ok_or_else(|| RenderError::new(object, format!("{} must be a number", key)))?,
    };
    if value < 0.0 {
        return Err(RenderError::new(object, format!("{} must not be negative", key)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::geometry;

    #[test]
    fn plain_values_render_as_text() {
        let scene = Scene::from_expression(&Expression::number(3.0)).unwrap();
        assert_eq!(
            scene.items,
            vec![SceneItem::Text {
                text: "(3)".into()
            }]
        );
    }

    #[test]
    fn lists_are_flattened() {
        let list = Expression::list(vec![
            geometry::point(1.0, 2.0, 0.5),
            geometry::segment((0.0, 0.0), (1.0, 1.0)),
            geometry::text("hi", (2.0, 3.0), 0.0, 1.0),
        ]);
        let scene = Scene::from_expression(&list).unwrap();
        assert_eq!(scene.items.len(), 3);
        assert_eq!(
            scene.items[0],
            SceneItem::Point {
                x: 1.0,
                y: 2.0,
                diameter: 0.5
            }
        );
        assert!(matches!(&scene.items[2], SceneItem::Label { text, .. } if text == "hi"));
    }

    #[test]
    fn malformed_geometry_is_an_error() {
        let bad = Expression::number(1.0).with_property("object-name", Expression::string("point"));
        assert!(Scene::from_expression(&bad).is_err());

        let negative = geometry::point(0.0, 0.0, -1.0);
        assert!(Scene::from_expression(&negative).is_err());
    }

    #[test]
    fn closures_render_nothing() {
        let closure = Expression::closure(vec!["x".into()], Expression::symbol("x"));
        assert!(Scene::from_expression(&closure).unwrap().is_empty());
    }

    #[test]
    fn scene_serializes_with_kind_tags() {
        let scene = Scene::from_expression(&geometry::point(1.0, 2.0, 0.0)).unwrap();
        let json = scene.to_json().unwrap();
        assert!(json.contains("\"kind\": \"point\""));
    }
}
