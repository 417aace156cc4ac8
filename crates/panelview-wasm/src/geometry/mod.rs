//! Drawing geometry for a panel and its operations.
//!
//! [`draw_panel`] turns the model into a flat triangle list in panel
//! coordinates (millimetres, origin at the panel corner the machine treats as
//! zero). The renderer is responsible for flipping axes and colouring by
//! [`DrawCategory`].

pub mod arc;
pub mod hole;
pub mod ranges;
pub mod stroke;
pub mod types;

pub use arc::*;
pub use hole::*;
pub use ranges::*;
pub use stroke::*;
pub use types::*;

use crate::expr::CoordContext;
use crate::model::{
    Edge, Hole, MillLine, MillPath, Operation, Panel, VertexKind, EDGE_SNAP_TOLERANCE,
};

/// Tunables for [`draw_panel`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    /// Segments used for hole rings and markers.
    pub circle_segments: u32,
    /// Diameter of point markers (mm).
    pub marker_size: f64,
    /// Line width of the panel outline (mm).
    pub outline_width: f64,
    /// Line width of hole rings and crosses (mm).
    pub hole_outline_width: f64,
    /// Lower bound for mill stroke widths, so zero-width tools stay visible.
    pub min_stroke_width: f64,
    /// Distance from an edge within which end-face holes are drawn from it.
    pub edge_snap_tolerance: f64,
    /// Depth from which a top or bottom hole counts as a through hole.
    pub through_depth: f64,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            circle_segments: 32,
            marker_size: 4.0,
            outline_width: 1.0,
            hole_outline_width: 0.5,
            min_stroke_width: 1.0,
            edge_snap_tolerance: EDGE_SNAP_TOLERANCE,
            through_depth: 16.0,
        }
    }
}

/// Draws the panel outline and every operation.
///
/// An unsized panel yields empty geometry with a warning. Operations that
/// cannot be drawn (single-vertex paths) are skipped without a range.
pub fn draw_panel(panel: &Panel, operations: &[Operation], options: &DrawOptions) -> DrawingGeometry {
    let mut builder = GeometryBuilder::new();
    let mut tracker = RangeTracker::new();

    if !panel.is_sized() {
        builder.warn(format!(
            "panel has no size ({} x {}); nothing drawn",
            panel.length, panel.width
        ));
        return builder.build();
    }

    tracker.begin(None, DrawCategory::Outline, &builder);
    draw_rect_outline(
        &mut builder,
        Point::new(0.0, 0.0),
        Point::new(panel.length, panel.width),
        options.outline_width,
    );

    let coords = panel.coords();
    for (index, operation) in operations.iter().enumerate() {
        match operation {
            Operation::VerticalHole(hole) => {
                let category = drilled_category(hole, DrawCategory::TopHole, &coords, options);
                tracker.begin(Some(index), category, &builder);
                draw_hole(&mut builder, hole, &coords, options);
            }
            Operation::BackVerticalHole(hole) => {
                let category = drilled_category(hole, DrawCategory::BottomHole, &coords, options);
                tracker.begin(Some(index), category, &builder);
                draw_hole(&mut builder, hole, &coords, options);
            }
            Operation::HorizontalHole(hole) => {
                tracker.begin(Some(index), DrawCategory::FaceHole, &builder);
                let center = hole.position(&coords);
                let edge = Edge::snap(center, panel.length, panel.width, options.edge_snap_tolerance);
                draw_face_hole(
                    &mut builder,
                    center,
                    coords.eval(&hole.diameter),
                    coords.eval(&hole.depth),
                    edge,
                    options,
                );
            }
            Operation::Line(line) => {
                tracker.begin(Some(index), DrawCategory::Mill, &builder);
                draw_line(&mut builder, line, &coords, options);
            }
            Operation::Path(path) => {
                if !path.is_drawable() {
                    tracing::debug!(index, "path has fewer than two vertices; not drawn");
                    tracker.end(&builder);
                    continue;
                }
                tracker.begin(Some(index), DrawCategory::PathMill, &builder);
                draw_path(&mut builder, path, &coords, options);
            }
        }
    }

    let ranges = tracker.finish(&builder);
    let mut geometry = builder.build();
    apply_ranges(&mut geometry, ranges);
    tracing::debug!(
        operations = operations.len(),
        drawn = geometry.operation_count,
        vertices = geometry.vertex_count,
        warnings = geometry.warnings.len(),
        "panel drawn"
    );
    geometry
}

fn drilled_category(
    hole: &Hole,
    blind: DrawCategory,
    coords: &CoordContext,
    options: &DrawOptions,
) -> DrawCategory {
    if coords.eval(&hole.depth) >= options.through_depth {
        DrawCategory::ThroughHole
    } else {
        blind
    }
}

fn draw_hole(builder: &mut GeometryBuilder, hole: &Hole, coords: &CoordContext, options: &DrawOptions) {
    draw_drilled_hole(builder, hole.position(coords), coords.eval(&hole.diameter), options);
}

fn stroke_width(text: &str, coords: &CoordContext, options: &DrawOptions) -> f64 {
    coords.eval(text).abs().max(options.min_stroke_width)
}

fn draw_line(builder: &mut GeometryBuilder, line: &MillLine, coords: &CoordContext, options: &DrawOptions) {
    let (begin, end) = line.endpoints(coords);
    let width = stroke_width(&line.width, coords, options);
    draw_linear(builder, begin, end, width, Cap::Round);
}

fn draw_path(builder: &mut GeometryBuilder, path: &MillPath, coords: &CoordContext, options: &DrawOptions) {
    let width = stroke_width(&path.width, coords, options);
    for (from, to) in path.edges() {
        let start = from.position(coords);
        let end = to.position(coords);
        match to.kind {
            // A repeated start point is a rapid move; nothing is cut.
            VertexKind::Point => {}
            VertexKind::Line => draw_linear(builder, start, end, width, Cap::Round),
            VertexKind::Arc { radius, direction } => {
                draw_arc(builder, start, end, radius, direction, width);
            }
        }
    }
}
