//! Integration tests for drawing geometry.

use panelview_wasm::codec::parse_document;
use panelview_wasm::geometry::{draw_panel, DrawCategory, DrawOptions, DrawingGeometry};
use panelview_wasm::model::{ArcDirection, MillPath, Operation, Panel, PanelDocument, Vertex};
use panelview_wasm::{draw_panel_internal, get_indices, get_positions};

#[allow(clippy::expect_used)]
fn fixture() -> PanelDocument {
    parse_document(include_str!("fixtures/minimal/panel.xml")).expect("fixture should parse")
}

fn draw(panel: &Panel, operations: &[Operation]) -> DrawingGeometry {
    draw_panel(panel, operations, &DrawOptions::default())
}

fn assert_buffers_consistent(geom: &DrawingGeometry) {
    assert_eq!(
        geom.positions.len(),
        geom.vertex_count as usize * 2,
        "positions length should match vertex_count * 2"
    );
    assert_eq!(geom.indices.len() % 3, 0, "indices form a triangle list");
    let max_idx = geom.positions.len() / 2;
    for idx in &geom.indices {
        assert!(
            (*idx as usize) < max_idx,
            "index {idx} out of bounds for {max_idx} vertices"
        );
    }
}

/// Draw the full fixture → valid buffers and one range per drawn operation.
#[test]
fn fixture_geometry_invariants() {
    let doc = fixture();
    let geom = draw(&doc.panel, &doc.operations);

    assert_buffers_consistent(&geom);
    assert!(geom.warnings.is_empty(), "unexpected warnings: {:?}", geom.warnings);
    assert_eq!(geom.operation_count as usize, doc.operations.len());

    let categories: Vec<DrawCategory> = geom.ranges.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![
            DrawCategory::Outline,
            DrawCategory::TopHole,
            DrawCategory::ThroughHole,
            DrawCategory::FaceHole,
            DrawCategory::FaceHole,
            DrawCategory::Mill,
            DrawCategory::PathMill,
        ]
    );

    let mut previous_end = 0;
    for range in &geom.ranges {
        assert_eq!(range.index_start, previous_end, "ranges are contiguous");
        assert!(range.index_end > range.index_start);
        previous_end = range.index_end;
    }
    assert_eq!(previous_end as usize, geom.indices.len());
}

/// Drawing stays within the panel plus stroke and tool allowances.
#[test]
fn fixture_bounds_cover_panel() {
    let doc = fixture();
    let geom = draw(&doc.panel, &doc.operations);
    let b = geom.bounds;
    let slack = 5.0;
    assert!(b.min_x <= 0.0 && b.min_x > -slack);
    assert!(b.min_y <= 0.0 && b.min_y > -slack);
    assert!(b.max_x >= 600.0 && b.max_x < 600.0 + slack);
    assert!(b.max_y >= 400.0 && b.max_y < 400.0 + slack);
}

/// Resizing the panel moves relative operations with it.
#[test]
fn relative_holes_follow_panel_length() {
    let doc = fixture();
    let hole = doc.operations.first().cloned().into_iter().collect::<Vec<_>>();

    let small = draw(&Panel::new(600.0, 400.0, 16.0), &hole);
    let large = draw(&Panel::new(900.0, 400.0, 16.0), &hole);

    let small_hole = small.ranges.get(1).map(|r| r.index_start);
    let large_hole = large.ranges.get(1).map(|r| r.index_start);
    assert!(small_hole.is_some() && large_hole.is_some());

    // Same operation, same tessellation: matching vertices differ only by the shift.
    let first_vertex_x = |geom: &DrawingGeometry, start: u32| {
        geom.indices
            .get(start as usize)
            .and_then(|&i| geom.positions.get(i as usize * 2))
            .copied()
    };
    let small_x = small_hole.and_then(|s| first_vertex_x(&small, s));
    let large_x = large_hole.and_then(|s| first_vertex_x(&large, s));
    assert!(small_x.is_some() && large_x.is_some());
    if let (Some(a), Some(b)) = (small_x, large_x) {
        assert!((b - a - 300.0).abs() < 1e-3, "expected a 300 mm shift, got {a} → {b}");
    }
}

/// A single-vertex path is loaded but draws nothing.
#[test]
#[allow(clippy::expect_used)]
fn single_vertex_path_draws_zero_edges() {
    let doc = parse_document(include_str!("fixtures/minimal/path_single_vertex.xml"))
        .expect("fixture should parse");
    let geom = draw(&doc.panel, &doc.operations);

    assert_eq!(doc.operations.len(), 1);
    assert_eq!(geom.operation_count, 0);
    assert_eq!(geom.ranges.len(), 1, "only the outline is drawn");
    assert!(geom.warnings.is_empty());
}

/// An arc whose radius cannot span its chord falls back to a straight edge.
#[test]
fn impossible_arc_falls_back_with_warning() {
    let path = MillPath::new(
        "8",
        "17",
        vec![
            Vertex::point("100", "200"),
            Vertex::arc("500", "200", 10.0, ArcDirection::Clockwise),
        ],
    );
    let geom = draw(&Panel::new(600.0, 400.0, 16.0), &[Operation::Path(path)]);

    assert_eq!(geom.warnings.len(), 1);
    assert_eq!(geom.operation_count, 1);
    assert_buffers_consistent(&geom);
}

/// Arc direction decides which side of the chord the bulge is on.
#[test]
fn arc_direction_selects_bulge_side() {
    let panel = Panel::new(600.0, 400.0, 16.0);
    let arc = |direction| {
        Operation::Path(MillPath::new(
            "2",
            "17",
            vec![
                Vertex::point("200", "200"),
                Vertex::arc("300", "200", 60.0, direction),
            ],
        ))
    };

    let bulge = |direction| {
        let geom = draw(&panel, &[arc(direction)]);
        let range = geom.ranges.iter().find(|r| r.operation == Some(0)).copied();
        range.map_or(0.0_f64, |r| {
            let ys = geom
                .indices
                .get(r.index_start as usize..r.index_end as usize)
                .unwrap_or_default()
                .iter()
                .filter_map(|&i| geom.positions.get(i as usize * 2 + 1))
                .map(|&y| f64::from(y) - 200.0);
            ys.fold(0.0, |acc: f64, y| if y.abs() > acc.abs() { y } else { acc })
        })
    };

    let clockwise = bulge(ArcDirection::Clockwise);
    let counter = bulge(ArcDirection::CounterClockwise);
    assert!(clockwise * counter < 0.0, "bulges {clockwise} and {counter} should be opposite");
    // Centre on the left normal (+y) for clockwise; the minor arc bulges to -y.
    assert!(clockwise < 0.0);
}

/// The wasm-facing draw stores buffers that match its metadata.
#[test]
fn draw_internal_stores_buffers() {
    let doc = fixture();
    let meta = draw_panel_internal(&doc);

    let positions = get_positions();
    let indices = get_indices();
    assert_eq!(positions.len(), meta.vertex_count as usize * 2);
    assert_eq!(indices.len(), meta.index_count as usize);
    assert_eq!(meta.warning_count, 0);
}
