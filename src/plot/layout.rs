//! Plot frame layout: scaling, boundary box, axes, tick labels and option texts.
//!
//! Data coordinates are scaled so each axis spans [`BOUNDING_SIZE`] units. The
//! y axis is flipped, so larger values sit higher on a top-down canvas.

use std::f64::consts::FRAC_PI_2;

use crate::ast::Expression;
use crate::diagnostics::SemanticError;
use crate::plot::geometry;
use crate::semantic_err;

pub const BOUNDING_SIZE: f64 = 20.0;
/// Distance from the frame to the axis tick labels.
pub const LABEL_OFFSET: f64 = 2.0;
/// Distance from the frame to the title and axis names.
pub const OPTION_OFFSET: f64 = 3.0;

// ============================================================================
// OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOption {
    Title,
    AbscissaLabel,
    OrdinateLabel,
}

/// Validated `(key value)` option pairs, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub text_scale: f64,
    pub texts: Vec<(TextOption, Expression)>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            text_scale: 1.0,
            texts: Vec::new(),
        }
    }
}

impl PlotOptions {
    /// Reads an evaluated options list.
    pub fn parse(options: &Expression, form: &str) -> Result<Self, SemanticError> {
        if !options.is_list() {
            return Err(semantic_err!("in call to {}: options must be a list", form));
        }

        let mut parsed = PlotOptions::default();
        for entry in options.tail() {
            let (key, value) = match entry.tail() {
                [key, value] if entry.is_list() => (key, value),
                _ => {
                    return Err(semantic_err!(
                        "in call to {}: each option must be a (key value) list",
                        form
                    ))
                }
            };
            let key = key
                .head()
                .string_contents()
                .filter(|_| key.is_leaf())
                .ok_or_else(|| semantic_err!("in call to {}: option key must be a string", form))?;

            let option = match key {
                "title" => TextOption::Title,
                "abscissa-label" => TextOption::AbscissaLabel,
                "ordinate-label" => TextOption::OrdinateLabel,
                "text-scale" => {
                    parsed.text_scale = value.as_number().ok_or_else(|| {
                        semantic_err!("in call to {}: text-scale must be a number", form)
                    })?;
                    continue;
                }
                other => {
                    return Err(semantic_err!(
                        "in call to {}: unknown option \"{}\"",
                        form,
                        other
                    ))
                }
            };
            if !(value.is_leaf() && value.head().is_string()) {
                return Err(semantic_err!(
                    "in call to {}: value of option \"{}\" must be a string",
                    form,
                    key
                ));
            }
            parsed.texts.push((option, Expression::new(value.head().clone())));
        }
        Ok(parsed)
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Data bounds and the scale factors derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

fn scale_for(min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        1.0
    } else {
        BOUNDING_SIZE / span
    }
}

impl Layout {
    /// Computes bounds over `points`; `None` when there are none.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
        for &(x, y) in rest {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        Some(Self {
            x_min,
            x_max,
            y_min,
            y_max,
            x_scale: scale_for(x_min, x_max),
            y_scale: scale_for(y_min, y_max),
        })
    }

    pub fn x_smin(&self) -> f64 {
        self.x_min * self.x_scale
    }

    pub fn x_smax(&self) -> f64 {
        self.x_max * self.x_scale
    }

    pub fn y_smin(&self) -> f64 {
        -self.y_min * self.y_scale
    }

    pub fn y_smax(&self) -> f64 {
        -self.y_max * self.y_scale
    }

    /// Maps a data coordinate to scaled canvas coordinates.
    pub fn scale(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x * self.x_scale, -y * self.y_scale)
    }

    /// Top, bottom, left and right edges of the frame.
    pub fn boundaries(&self) -> Vec<Expression> {
        let top_left = (self.x_smin(), self.y_smax());
        let top_right = (self.x_smax(), self.y_smax());
        let bottom_left = (self.x_smin(), self.y_smin());
        let bottom_right = (self.x_smax(), self.y_smin());
        vec![
            geometry::segment(top_left, top_right),
            geometry::segment(bottom_left, bottom_right),
            geometry::segment(top_left, bottom_left),
            geometry::segment(top_right, bottom_right),
        ]
    }

    /// Axes through the origin, for each axis whose zero lies inside the data range.
    pub fn axes(&self) -> Vec<Expression> {
        let mut axes = Vec::with_capacity(2);
        if self.x_min <= 0.0 && 0.0 <= self.x_max {
            axes.push(geometry::segment((0.0, self.y_smin()), (0.0, self.y_smax())));
        }
        if self.y_min <= 0.0 && 0.0 <= self.y_max {
            axes.push(geometry::segment((self.x_smin(), 0.0), (self.x_smax(), 0.0)));
        }
        axes
    }

    /// Tick labels: x maximum, y maximum, x minimum, y minimum.
    pub fn labels(&self, text_scale: f64) -> Vec<Expression> {
        let label = |value: f64, at: (f64, f64)| geometry::text(&format_label(value), at, 0.0, text_scale);
        vec![
            label(self.x_max, (self.x_smax(), self.y_smin() + LABEL_OFFSET)),
            label(self.y_max, (self.x_smin() - LABEL_OFFSET, self.y_smax())),
            label(self.x_min, (self.x_smin(), self.y_smin() + LABEL_OFFSET)),
            label(self.y_min, (self.x_smin() - LABEL_OFFSET, self.y_smin())),
        ]
    }

    /// Title and axis names placed around the frame.
    pub fn option_texts(&self, options: &PlotOptions) -> Vec<Expression> {
        let x_mid = (self.x_smin() + self.x_smax()) / 2.0;
        let y_mid = (self.y_smin() + self.y_smax()) / 2.0;
        options
            .texts
            .iter()
            .map(|(option, literal)| {
                let (at, rotation) = match option {
                    TextOption::Title => ((x_mid, self.y_smax() - OPTION_OFFSET), 0.0),
                    TextOption::AbscissaLabel => ((x_mid, self.y_smin() + OPTION_OFFSET), 0.0),
                    TextOption::OrdinateLabel => ((self.x_smin() - OPTION_OFFSET, y_mid), -FRAC_PI_2),
                };
                geometry::text_from(literal.clone(), at, rotation, options.text_scale)
            })
            .collect()
    }
}

// ============================================================================
// LABEL FORMATTING
// ============================================================================

/// Formats a value with two significant digits, like C's `%.2g`.
pub fn format_label(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.1e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if !(-4..2).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_two_significant_digits() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(-1.0), "-1");
        assert_eq!(format_label(0.5), "0.5");
        assert_eq!(format_label(-3.0), "-3");
        assert_eq!(format_label(12.0), "12");
        assert_eq!(format_label(3.14159), "3.1");
        assert_eq!(format_label(0.001234), "0.0012");
        assert_eq!(format_label(150.0), "1.5e+02");
        assert_eq!(format_label(0.0), "0");
    }

    #[test]
    fn layout_scales_to_bounding_box() {
        let layout = Layout::from_points(&[(-1.0, -1.0), (1.0, 1.0)]).unwrap();
        assert_eq!(layout.x_scale, 10.0);
        assert_eq!(layout.y_scale, 10.0);
        assert_eq!(layout.x_smin(), -10.0);
        assert_eq!(layout.y_smax(), -10.0);
        assert_eq!(layout.scale((1.0, 1.0)), (10.0, -10.0));
        assert_eq!(layout.boundaries().len(), 4);
        assert_eq!(layout.axes().len(), 2);
    }

    #[test]
    fn zero_span_uses_unit_scale() {
        let layout = Layout::from_points(&[(1.0, 2.0), (3.0, 2.0)]).unwrap();
        assert_eq!(layout.y_scale, 1.0);
        assert_eq!(layout.x_scale, 10.0);
        assert!(Layout::from_points(&[]).is_none());
    }

    #[test]
    fn axes_only_when_origin_in_range() {
        let layout = Layout::from_points(&[(1.0, 1.0), (2.0, 3.0)]).unwrap();
        assert!(layout.axes().is_empty());
    }

    #[test]
    fn options_are_validated() {
        let pair = |k: &str, v: Expression| Expression::list(vec![Expression::string(k), v]);
        let options = Expression::list(vec![
            pair("title", Expression::string("The Data")),
            pair("text-scale", Expression::number(2.0)),
        ]);
        let parsed = PlotOptions::parse(&options, "discrete-plot").unwrap();
        assert_eq!(parsed.text_scale, 2.0);
        assert_eq!(parsed.texts.len(), 1);

        let unknown = Expression::list(vec![pair("colour", Expression::string("red"))]);
        assert!(PlotOptions::parse(&unknown, "discrete-plot").is_err());

        let malformed = Expression::list(vec![Expression::string("title")]);
        assert!(PlotOptions::parse(&malformed, "discrete-plot").is_err());
    }
}
