//! Coordinate resolution with the far-edge offset shorthand.

use serde::{Deserialize, Serialize};

use super::eval::evaluate;

/// Panel axis a coordinate field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Along the panel length (`L`).
    X,
    /// Along the panel width (`W`).
    Y,
}

/// Resolves an operation coordinate field to an absolute position.
///
/// A bare negative number (`-10`, `-2.5`) is an offset from the far
/// edge of the axis: `L + value` for X, `W + value` for Y. Everything else is
/// evaluated as a formula by [`evaluate`].
pub fn parse_coord(value: &str, length: f64, width: f64, axis: Axis) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }

    if let Some(offset) = far_edge_offset(value) {
        return match axis {
            Axis::X => length + offset,
            Axis::Y => width + offset,
        };
    }

    evaluate(value, length, width)
}

/// Parses `-<digits>[.<digits>]` exactly; returns the (negative) value.
///
/// A decimal comma is not an offset: `-2,5` is left to the evaluator.
fn far_edge_offset(value: &str) -> Option<f64> {
    let magnitude = value.strip_prefix('-')?;

    let mut digits = 0_usize;
    let mut seen_dot = false;
    for c in magnitude.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if digits == 0 {
        return None;
    }

    magnitude.parse::<f64>().ok().map(|v| -v)
}

/// Panel dimensions used to resolve coordinate text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordContext {
    /// Panel length `L`.
    pub length: f64,
    /// Panel width `W`.
    pub width: f64,
}

impl CoordContext {
    /// Creates a context for a panel of the given size.
    pub const fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    /// Resolves an X field of a hole or line.
    pub fn x(&self, value: &str) -> f64 {
        parse_coord(value, self.length, self.width, Axis::X)
    }

    /// Resolves a Y field of a hole or line.
    pub fn y(&self, value: &str) -> f64 {
        parse_coord(value, self.length, self.width, Axis::Y)
    }

    /// Resolves an X field of a path vertex.
    ///
    /// Path vertices are absolute: a bare negative number stays negative.
    pub fn path_x(&self, value: &str) -> f64 {
        evaluate(value, self.length, self.width)
    }

    /// Resolves a Y field of a path vertex.
    pub fn path_y(&self, value: &str) -> f64 {
        evaluate(value, self.length, self.width)
    }

    /// Evaluates a formula without the far-edge shorthand.
    pub fn eval(&self, value: &str) -> f64 {
        evaluate(value, self.length, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn negative_x_is_offset_from_far_edge() {
        assert_close(parse_coord("-10", 600.0, 400.0, Axis::X), 590.0);
    }

    #[test]
    fn negative_y_is_offset_from_far_edge() {
        assert_close(parse_coord("-10", 600.0, 400.0, Axis::Y), 390.0);
    }

    #[test]
    fn fractional_offsets_need_a_decimal_point() {
        assert_close(parse_coord("-2.5", 600.0, 400.0, Axis::X), 597.5);
        assert_close(parse_coord("-.5", 600.0, 400.0, Axis::X), 599.5);
        assert_close(parse_coord("-2,5", 600.0, 400.0, Axis::Y), -2.5);
    }

    #[test]
    fn positive_numbers_pass_through() {
        assert_close(parse_coord("50", 600.0, 400.0, Axis::X), 50.0);
        assert_close(parse_coord("50", 600.0, 400.0, Axis::Y), 50.0);
    }

    #[test]
    fn formulas_are_not_offsets() {
        assert_close(parse_coord("-10+20", 600.0, 400.0, Axis::X), 10.0);
        assert_close(parse_coord("-W/4", 600.0, 400.0, Axis::X), -100.0);
        assert_close(parse_coord("L-50", 600.0, 400.0, Axis::X), 550.0);
    }

    #[test]
    fn empty_and_garbage_are_zero() {
        assert_close(parse_coord("", 600.0, 400.0, Axis::X), 0.0);
        assert_close(parse_coord("-", 600.0, 400.0, Axis::X), 0.0);
        assert_close(parse_coord("--", 600.0, 400.0, Axis::Y), 0.0);
        assert_close(parse_coord("abc", 600.0, 400.0, Axis::Y), 0.0);
        assert_close(parse_coord("-1.2.3", 600.0, 400.0, Axis::X), 0.0);
    }

    #[test]
    fn path_coordinates_ignore_the_shorthand() {
        let ctx = CoordContext::new(600.0, 400.0);
        assert_close(ctx.path_x("-10"), -10.0);
        assert_close(ctx.path_y("W-10"), 390.0);
        assert_close(ctx.x("-10"), 590.0);
        assert_close(ctx.y("-10"), 390.0);
    }
}
