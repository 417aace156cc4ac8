//! Stroke widening for mill cuts and outlines.
//!
//! A centreline segment becomes a quad of the tool width. Round tools get
//! semicircle caps at both ends so consecutive segments join without gaps.

use std::f64::consts::{FRAC_PI_2, PI};

use super::types::{GeometryBuilder, Point};

const ROUND_CAP_SEGMENTS: u32 = 16;

/// End treatment of a stroked segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    /// Square end flush with the endpoint.
    Butt,
    /// Semicircle of the stroke radius.
    Round,
}

/// Expands a segment into triangles of the given `width`.
///
/// A zero-length segment with round caps is a filled circle (a plunge of the
/// tool). Zero or non-finite widths are skipped with a warning.
pub fn draw_linear(builder: &mut GeometryBuilder, from: Point, to: Point, width: f64, cap: Cap) {
    let Some(width) = normalize_width(builder, width) else {
        return;
    };
    let half = width / 2.0;

    let length = from.distance(to);
    if length <= f64::EPSILON {
        if cap == Cap::Round {
            builder.push_disc(from, half, ROUND_CAP_SEGMENTS * 2);
        }
        return;
    }

    // Unit normal to the left of from → to, scaled to half the width.
    let nx = -(to.y - from.y) / length * half;
    let ny = (to.x - from.x) / length * half;
    let quad = [
        builder.push_vertex(Point::new(from.x + nx, from.y + ny)),
        builder.push_vertex(Point::new(from.x - nx, from.y - ny)),
        builder.push_vertex(Point::new(to.x - nx, to.y - ny)),
        builder.push_vertex(Point::new(to.x + nx, to.y + ny)),
    ];
    builder.push_quad(quad);

    if cap == Cap::Round {
        let heading = (to.y - from.y).atan2(to.x - from.x);
        builder.push_sector(from, half, heading + FRAC_PI_2, PI, ROUND_CAP_SEGMENTS);
        builder.push_sector(to, half, heading - FRAC_PI_2, PI, ROUND_CAP_SEGMENTS);
    }
}

/// Strokes each consecutive pair of `points`.
pub fn draw_polyline(builder: &mut GeometryBuilder, points: &[Point], width: f64, cap: Cap) {
    for (from, to) in points.iter().zip(points.iter().skip(1)) {
        draw_linear(builder, *from, *to, width, cap);
    }
}

/// Strokes a closed axis-aligned rectangle outline.
pub fn draw_rect_outline(builder: &mut GeometryBuilder, min: Point, max: Point, width: f64) {
    let corners = [
        min,
        Point::new(max.x, min.y),
        max,
        Point::new(min.x, max.y),
        min,
    ];
    draw_polyline(builder, &corners, width, Cap::Round);
}

fn normalize_width(builder: &mut GeometryBuilder, width: f64) -> Option<f64> {
    if !width.is_finite() {
        builder.warn(format!("stroke width must be finite, got {width}; skipping"));
        return None;
    }
    if width < 0.0 {
        builder.warn(format!("stroke width is negative ({width}); using absolute value"));
    }
    let width = width.abs();
    if width <= f64::EPSILON {
        builder.warn("stroke width is zero; skipping".to_string());
        return None;
    }
    Some(width)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::geometry::DrawingGeometry;

    const EPSILON: f64 = 1e-6;

    fn draw_and_build(from: Point, to: Point, width: f64, cap: Cap) -> DrawingGeometry {
        let mut builder = GeometryBuilder::new();
        draw_linear(&mut builder, from, to, width, cap);
        builder.build()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_point(positions: &[f32], index: usize, expected_x: f64, expected_y: f64) {
        let base = index * 2;
        assert_close(f64::from(positions[base]), expected_x);
        assert_close(f64::from(positions[base + 1]), expected_y);
    }

    #[test]
    fn ut_str_001_horizontal_butt_stroke_is_a_quad() {
        let geom = draw_and_build(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 2.0, Cap::Butt);

        assert_eq!(geom.vertex_count, 4);
        assert_eq!(geom.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_point(&geom.positions, 0, 0.0, 1.0);
        assert_point(&geom.positions, 1, 0.0, -1.0);
        assert_point(&geom.positions, 2, 10.0, -1.0);
        assert_point(&geom.positions, 3, 10.0, 1.0);
    }

    #[test]
    fn ut_str_002_diagonal_stroke_is_perpendicular_to_direction() {
        let geom = draw_and_build(Point::new(0.0, 0.0), Point::new(3.0, 4.0), 2.0, Cap::Butt);

        let edge_x = f64::from(geom.positions[2]) - f64::from(geom.positions[0]);
        let edge_y = f64::from(geom.positions[3]) - f64::from(geom.positions[1]);
        let dot = edge_x.mul_add(3.0 / 5.0, edge_y * (4.0 / 5.0));
        assert_close(dot, 0.0);
    }

    #[test]
    fn ut_str_003_round_caps_extend_bounds_by_half_width() {
        let geom = draw_and_build(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 8.0, Cap::Round);

        assert!(geom.vertex_count > 4);
        assert_close(geom.bounds.min_x, -4.0);
        assert_close(geom.bounds.max_x, 14.0);
        assert_close(geom.bounds.min_y, -4.0);
        assert_close(geom.bounds.max_y, 4.0);
    }

    #[test]
    fn ut_str_004_zero_length_round_stroke_is_a_circle() {
        let geom = draw_and_build(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 1.0, Cap::Round);

        assert_eq!(geom.vertex_count, 32);
        assert_eq!(geom.indices.len(), 90);
        assert_close(geom.bounds.min_x, 4.5);
        assert_close(geom.bounds.max_y, 5.5);
    }

    #[test]
    fn ut_str_005_zero_width_is_skipped_with_warning() {
        let geom = draw_and_build(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.0, Cap::Round);
        assert_eq!(geom.vertex_count, 0);
        assert_eq!(geom.warnings.len(), 1);
    }

    #[test]
    fn ut_str_006_negative_width_uses_absolute_value() {
        let geom = draw_and_build(Point::new(0.0, 0.0), Point::new(10.0, 0.0), -2.0, Cap::Butt);
        assert_eq!(geom.vertex_count, 4);
        assert_close(geom.bounds.max_y, 1.0);
        assert_eq!(geom.warnings.len(), 1);
    }

    #[test]
    fn ut_str_007_rect_outline_strokes_four_sides() {
        let mut builder = GeometryBuilder::new();
        draw_rect_outline(&mut builder, Point::new(0.0, 0.0), Point::new(600.0, 400.0), 1.0);
        let geom = builder.build();
        assert_close(geom.bounds.min_x, -0.5);
        assert_close(geom.bounds.max_x, 600.5);
        assert_close(geom.bounds.max_y, 400.5);
        assert!(geom.warnings.is_empty());
    }
}
