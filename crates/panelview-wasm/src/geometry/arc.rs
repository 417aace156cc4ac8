//! Arc edges of mill paths.
//!
//! An arc edge is given by its two endpoints, a radius and a direction. The
//! centre is found on the chord bisector, the minor arc is tessellated into a
//! centreline and each piece is widened with [`super::stroke::draw_linear`].

use std::f64::consts::{PI, TAU};

use crate::error::GeometryError;
use crate::model::ArcDirection;

use super::stroke::{draw_linear, draw_polyline, Cap};
use super::types::{GeometryBuilder, Point};

const MIN_ARC_SEGMENTS: u32 = 16;
const MAX_ARC_SEGMENTS: u32 = 512;
const MIN_SEGMENT_LENGTH_FLOOR: f64 = 0.01;

/// Centre of the circle of `radius` through `from` and `to`.
///
/// [`ArcDirection::Clockwise`] puts the centre on the left normal of the
/// chord `from → to`, [`ArcDirection::CounterClockwise`] on the right one.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] for coincident endpoints and
/// [`GeometryError::ArcError`] when the radius is shorter than half the chord.
pub fn arc_center(
    from: Point,
    to: Point,
    radius: f64,
    direction: ArcDirection,
) -> Result<Point, GeometryError> {
    let chord_length = from.distance(to);
    if chord_length <= f64::EPSILON {
        return Err(GeometryError::DegenerateGeometry(
            "arc endpoints coincide".to_string(),
        ));
    }

    let half_chord = chord_length / 2.0;
    if !radius.is_finite() || radius < half_chord {
        return Err(GeometryError::ArcError(format!(
            "radius {radius} is too small to span a chord of {chord_length}"
        )));
    }

    let mid = Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    let ux = (to.x - from.x) / chord_length;
    let uy = (to.y - from.y) / chord_length;
    let (nx, ny) = (-uy, ux);

    let offset = radius.mul_add(radius, -(half_chord * half_chord)).max(0.0).sqrt();
    let sign = match direction {
        ArcDirection::Clockwise => 1.0,
        ArcDirection::CounterClockwise => -1.0,
    };

    Ok(Point::new(
        (sign * offset).mul_add(nx, mid.x),
        (sign * offset).mul_add(ny, mid.y),
    ))
}

/// Centreline points of the minor arc from `from` to `to` around `center`.
///
/// The first and last points are exactly `from` and `to`.
pub fn arc_centerline_points(
    from: Point,
    to: Point,
    center: Point,
    max_segment_length: f64,
) -> Vec<Point> {
    let radius = from.distance(center);
    let start_angle = (from.y - center.y).atan2(from.x - center.x);
    let end_angle = (to.y - center.y).atan2(to.x - center.x);
    let sweep = minor_sweep(end_angle - start_angle);

    let segments = segment_count_for_arc(sweep.abs() * radius, max_segment_length);
    let mut points = Vec::with_capacity(segments as usize + 1);
    points.push(from);
    for step in 1..segments {
        let t = f64::from(step) / f64::from(segments);
        let angle = sweep.mul_add(t, start_angle);
        points.push(Point::new(
            radius.mul_add(angle.cos(), center.x),
            radius.mul_add(angle.sin(), center.y),
        ));
    }
    points.push(to);
    points
}

/// Draws an arc edge of the given tool `width`.
///
/// When no circle of `radius` passes through both endpoints the edge is drawn
/// as a straight stroke and a warning is recorded.
pub fn draw_arc(
    builder: &mut GeometryBuilder,
    from: Point,
    to: Point,
    radius: f64,
    direction: ArcDirection,
    width: f64,
) {
    match arc_center(from, to, radius, direction) {
        Ok(center) => {
            let points = arc_centerline_points(from, to, center, max_segment_length(width));
            draw_polyline(builder, &points, width, Cap::Round);
        }
        Err(err) => {
            builder.warn(format!("{err}; drawing a straight edge instead"));
            draw_linear(builder, from, to, width, Cap::Round);
        }
    }
}

/// Wraps an angle difference into `(-π, π]`.
fn minor_sweep(delta: f64) -> f64 {
    let wrapped = delta.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

fn max_segment_length(stroke_width: f64) -> f64 {
    (stroke_width.abs() * 0.25).max(MIN_SEGMENT_LENGTH_FLOOR)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn segment_count_for_arc(arc_length: f64, max_segment_length: f64) -> u32 {
    let raw = (arc_length / max_segment_length).ceil();
    if !raw.is_finite() || raw <= 0.0 {
        return MIN_ARC_SEGMENTS;
    }

    let estimated = raw.min(f64::from(MAX_ARC_SEGMENTS)) as u32;
    estimated.clamp(MIN_ARC_SEGMENTS, MAX_ARC_SEGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < EPSILON && (actual.y - y).abs() < EPSILON,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn ut_arc_001_semicircle_centre_is_chord_midpoint() {
        let center = arc_center(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            50.0,
            ArcDirection::Clockwise,
        );
        assert!(center.is_ok());
        if let Ok(c) = center {
            assert_point(c, 50.0, 0.0);
        }
    }

    #[test]
    fn ut_arc_002_direction_selects_side_of_chord() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(80.0, 0.0);

        let left = arc_center(from, to, 50.0, ArcDirection::Clockwise);
        let right = arc_center(from, to, 50.0, ArcDirection::CounterClockwise);
        assert!(left.is_ok() && right.is_ok());
        if let (Ok(l), Ok(r)) = (left, right) {
            assert_point(l, 40.0, 30.0);
            assert_point(r, 40.0, -30.0);
        }
    }

    #[test]
    fn ut_arc_003_radius_shorter_than_half_chord_fails() {
        let result = arc_center(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            10.0,
            ArcDirection::Clockwise,
        );
        assert!(matches!(result, Err(GeometryError::ArcError(_))));
    }

    #[test]
    fn ut_arc_004_coincident_endpoints_are_degenerate() {
        let p = Point::new(5.0, 5.0);
        let result = arc_center(p, p, 10.0, ArcDirection::Clockwise);
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn ut_arc_005_centerline_stays_on_circle_and_hits_endpoints() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(80.0, 0.0);
        let center = Point::new(40.0, 30.0);
        let points = arc_centerline_points(from, to, center, 1.0);

        assert!(points.len() > MIN_ARC_SEGMENTS as usize);
        assert_eq!(points.first().copied(), Some(from));
        assert_eq!(points.last().copied(), Some(to));
        for p in &points {
            assert!((p.distance(center) - 50.0).abs() < 1e-6);
        }
        // Minor arc: stays on the chord side away from the centre.
        assert!(points.iter().all(|p| p.y <= 1e-6));
    }

    #[test]
    fn ut_arc_006_draw_arc_falls_back_to_line() {
        let mut builder = GeometryBuilder::new();
        draw_arc(
            &mut builder,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            5.0,
            ArcDirection::Clockwise,
            8.0,
        );
        let geom = builder.build();
        assert_eq!(geom.warnings.len(), 1);
        assert!(geom.vertex_count > 0);
        assert!((geom.bounds.max_y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn ut_arc_007_minor_sweep_wraps() {
        assert!((minor_sweep(1.5 * PI) + 0.5 * PI).abs() < EPSILON);
        assert!((minor_sweep(-1.5 * PI) - 0.5 * PI).abs() < EPSILON);
        assert!((minor_sweep(0.25 * PI) - 0.25 * PI).abs() < EPSILON);
    }

    #[test]
    fn ut_arc_008_segment_count_is_clamped() {
        assert_eq!(segment_count_for_arc(0.0, 1.0), MIN_ARC_SEGMENTS);
        assert_eq!(segment_count_for_arc(1e9, 0.01), MAX_ARC_SEGMENTS);
        assert_eq!(segment_count_for_arc(100.0, 2.0), 50);
    }
}
