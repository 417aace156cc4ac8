//! Hole symbols: drilled-hole rings, end-face hole bodies and point markers.

use crate::model::Edge;

use super::stroke::{draw_linear, Cap};
use super::types::{GeometryBuilder, Point};
use super::DrawOptions;

/// Draws a top or bottom hole as an outline ring with a centre cross.
///
/// A non-positive diameter leaves only a point marker.
pub fn draw_drilled_hole(
    builder: &mut GeometryBuilder,
    center: Point,
    diameter: f64,
    options: &DrawOptions,
) {
    let Some(diameter) = positive_dimension(builder, diameter, "hole diameter") else {
        draw_marker(builder, center, options);
        return;
    };

    let radius = diameter / 2.0;
    let half_line = options.hole_outline_width / 2.0;
    builder.push_ring(
        center,
        (radius - half_line).max(0.0),
        radius + half_line,
        options.circle_segments,
    );

    let arm = radius.max(options.marker_size / 2.0);
    draw_linear(
        builder,
        Point::new(center.x - arm, center.y),
        Point::new(center.x + arm, center.y),
        options.hole_outline_width,
        Cap::Butt,
    );
    draw_linear(
        builder,
        Point::new(center.x, center.y - arm),
        Point::new(center.x, center.y + arm),
        options.hole_outline_width,
        Cap::Butt,
    );
}

/// Draws an end-face hole.
///
/// With an `edge` the hole is a `depth × diameter` rectangle running from
/// that edge into the panel; without one it is a point marker.
pub fn draw_face_hole(
    builder: &mut GeometryBuilder,
    center: Point,
    diameter: f64,
    depth: f64,
    edge: Option<Edge>,
    options: &DrawOptions,
) {
    let Some(edge) = edge else {
        draw_marker(builder, center, options);
        return;
    };

    let (Some(diameter), Some(depth)) = (
        positive_dimension(builder, diameter, "face hole diameter"),
        positive_dimension(builder, depth, "face hole depth"),
    ) else {
        draw_marker(builder, center, options);
        return;
    };

    let half = diameter / 2.0;
    let (min, max) = match edge {
        Edge::NearX => ((center.x, center.y - half), (center.x + depth, center.y + half)),
        Edge::FarX => ((center.x - depth, center.y - half), (center.x, center.y + half)),
        Edge::NearY => ((center.x - half, center.y), (center.x + half, center.y + depth)),
        Edge::FarY => ((center.x - half, center.y - depth), (center.x + half, center.y)),
    };
    builder.push_rect(Point::new(min.0, min.1), Point::new(max.0, max.1));
}

/// Draws a filled dot of `options.marker_size`.
pub fn draw_marker(builder: &mut GeometryBuilder, at: Point, options: &DrawOptions) {
    builder.push_disc(at, options.marker_size / 2.0, options.circle_segments.max(3));
}

fn positive_dimension(builder: &mut GeometryBuilder, value: f64, label: &str) -> Option<f64> {
    if value.is_finite() && value > f64::EPSILON {
        Some(value)
    } else {
        builder.warn(format!("{label} must be positive, got {value}"));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DrawingGeometry;

    const EPSILON: f64 = 1e-6;

    fn assert_bounds(geom: &DrawingGeometry, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        let b = geom.bounds;
        assert!(
            (b.min_x - min_x).abs() < EPSILON
                && (b.min_y - min_y).abs() < EPSILON
                && (b.max_x - max_x).abs() < EPSILON
                && (b.max_y - max_y).abs() < EPSILON,
            "unexpected bounds {b:?}"
        );
    }

    fn face(center: Point, edge: Option<Edge>) -> DrawingGeometry {
        let mut builder = GeometryBuilder::new();
        draw_face_hole(&mut builder, center, 8.0, 30.0, edge, &DrawOptions::default());
        builder.build()
    }

    #[test]
    fn ut_hole_001_face_hole_from_near_x_points_inward() {
        let geom = face(Point::new(0.0, 100.0), Some(Edge::NearX));
        assert_eq!(geom.vertex_count, 4);
        assert_bounds(&geom, 0.0, 96.0, 30.0, 104.0);
    }

    #[test]
    fn ut_hole_002_face_hole_from_far_x_points_inward() {
        let geom = face(Point::new(600.0, 100.0), Some(Edge::FarX));
        assert_bounds(&geom, 570.0, 96.0, 600.0, 104.0);
    }

    #[test]
    fn ut_hole_003_face_holes_on_y_edges() {
        let near = face(Point::new(200.0, 0.0), Some(Edge::NearY));
        assert_bounds(&near, 196.0, 0.0, 204.0, 30.0);
        let far = face(Point::new(200.0, 400.0), Some(Edge::FarY));
        assert_bounds(&far, 196.0, 370.0, 204.0, 400.0);
    }

    #[test]
    fn ut_hole_004_face_hole_without_edge_is_a_marker() {
        let options = DrawOptions::default();
        let geom = face(Point::new(300.0, 200.0), None);
        assert_eq!(geom.vertex_count, options.circle_segments);
        assert!(geom.warnings.is_empty());
    }

    #[test]
    fn ut_hole_005_drilled_hole_ring_spans_diameter() {
        let options = DrawOptions::default();
        let mut builder = GeometryBuilder::new();
        draw_drilled_hole(&mut builder, Point::new(50.0, 50.0), 10.0, &options);
        let geom = builder.build();
        let half_line = options.hole_outline_width / 2.0;
        assert!((geom.bounds.max_x - (55.0 + half_line)).abs() < EPSILON);
        assert!((geom.bounds.min_y - (45.0 - half_line)).abs() < EPSILON);
        assert!(geom.warnings.is_empty());
    }

    #[test]
    fn ut_hole_006_zero_diameter_hole_degrades_to_marker() {
        let mut builder = GeometryBuilder::new();
        draw_drilled_hole(&mut builder, Point::new(0.0, 0.0), 0.0, &DrawOptions::default());
        let geom = builder.build();
        assert_eq!(geom.warnings.len(), 1);
        assert!(geom.vertex_count > 0);
    }
}
