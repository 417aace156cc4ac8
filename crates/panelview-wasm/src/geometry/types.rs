//! Points, drawing output and the triangle accumulator.

use serde::{Deserialize, Serialize};

/// 2D point in panel coordinate space (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate, along the panel length.
    pub x: f64,
    /// Y coordinate, along the panel width.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy).sqrt()
    }
}

/// Extent of everything drawn so far, in panel millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Left edge.
    pub min_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub max_y: f64,
}

impl BoundingBox {
    /// A box containing nothing; the first [`Self::include`] sets it.
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = p.x.min(self.min_x);
        self.max_x = p.x.max(self.max_x);
        self.min_y = p.y.min(self.min_y);
        self.max_y = p.y.max(self.max_y);
    }

    /// Whether nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// What a span of triangles depicts; the shell maps categories to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawCategory {
    /// Panel outline.
    Outline,
    /// Top or bottom hole deep enough to pass through the panel.
    ThroughHole,
    /// Blind hole drilled from the top face.
    TopHole,
    /// Blind hole drilled from the bottom face.
    BottomHole,
    /// End-face hole.
    FaceHole,
    /// Straight mill cut.
    Mill,
    /// Compound mill path.
    PathMill,
}

impl DrawCategory {
    /// Stable numeric code used in the flat range buffer handed to JS.
    pub const fn code(self) -> u32 {
        match self {
            Self::Outline => 0,
            Self::ThroughHole => 1,
            Self::TopHole => 2,
            Self::BottomHole => 3,
            Self::FaceHole => 4,
            Self::Mill => 5,
            Self::PathMill => 6,
        }
    }
}

/// Triangle-index span belonging to one drawn item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRange {
    /// Index of the operation in document order; `None` for the outline.
    pub operation: Option<usize>,
    /// Drawing category.
    pub category: DrawCategory,
    /// Start index (inclusive) in the triangle index buffer.
    pub index_start: u32,
    /// End index (exclusive) in the triangle index buffer.
    pub index_end: u32,
}

/// Triangle soup for one panel, ready to upload to a WebGL buffer.
#[derive(Debug, Clone)]
pub struct DrawingGeometry {
    /// `x, y` pairs as `f32`.
    pub positions: Vec<f32>,
    /// Three entries per triangle, each an index into the `positions` pairs.
    pub indices: Vec<u32>,
    /// Extent of `positions`.
    pub bounds: BoundingBox,
    /// Distinct operations that left triangles behind.
    pub operation_count: u32,
    /// `positions.len() / 2`.
    pub vertex_count: u32,
    /// Problems met while drawing; the drawing is still usable.
    pub warnings: Vec<String>,
    /// Index spans of the outline and each drawn operation, in order.
    pub ranges: Vec<OperationRange>,
}

/// Metadata returned to JavaScript for a drawn panel.
#[derive(Debug, Clone, Serialize)]
pub struct DrawingMeta {
    /// Axis-aligned bounding box.
    pub bounds: BoundingBox,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of triangle indices.
    pub index_count: u32,
    /// Number of operations that produced geometry.
    pub operation_count: u32,
    /// Number of warnings.
    pub warning_count: u32,
    /// Warning messages.
    pub warnings: Vec<String>,
}

impl DrawingMeta {
    /// Summarises a drawing for the JS side.
    pub fn from_geometry(geometry: &DrawingGeometry) -> Self {
        Self {
            bounds: geometry.bounds,
            vertex_count: geometry.vertex_count,
            index_count: saturate_u32(geometry.indices.len()),
            operation_count: geometry.operation_count,
            warning_count: saturate_u32(geometry.warnings.len()),
            warnings: geometry.warnings.clone(),
        }
    }
}

/// Converts a length to `u32`, clamping at `u32::MAX`.
pub fn saturate_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Collects vertices and triangles while a panel is drawn.
///
/// Drawing helpers take `&mut GeometryBuilder` and append to it; nothing is
/// ever removed.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    positions: Vec<f32>,
    indices: Vec<u32>,
    bounds: BoundingBox,
    warnings: Vec<String>,
}

impl GeometryBuilder {
    /// Creates an empty builder.
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            bounds: BoundingBox::empty(),
            warnings: Vec::new(),
        }
    }

    /// Appends a vertex and returns its index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, p: Point) -> u32 {
        let index = self.vertex_count();
        self.positions.extend([p.x as f32, p.y as f32]);
        self.bounds.include(p);
        index
    }

    /// Appends one triangle.
    pub fn push_triangle(&mut self, corners: [u32; 3]) {
        self.indices.extend(corners);
    }

    /// Appends a convex quad `a b c d` as the triangles `a b c` and `a c d`.
    pub fn push_quad(&mut self, [a, b, c, d]: [u32; 4]) {
        self.indices.extend([a, b, c, a, c, d]);
    }

    /// Appends a filled rectangle spanning `min` to `max`.
    pub fn push_rect(&mut self, min: Point, max: Point) {
        let quad = [
            self.push_vertex(min),
            self.push_vertex(Point::new(max.x, min.y)),
            self.push_vertex(max),
            self.push_vertex(Point::new(min.x, max.y)),
        ];
        self.push_quad(quad);
    }

    /// Appends a filled regular polygon with `segments` rim vertices.
    ///
    /// The fan starts at the rim vertex on the +x side of `center`, so no
    /// centre vertex is added. Fewer than three segments add vertices only.
    pub fn push_disc(&mut self, center: Point, radius: f64, segments: u32) {
        let first = self.vertex_count();
        for step in 0..segments {
            self.push_vertex(polar(center, radius, step_angle(step, segments)));
        }
        for step in 1..segments.saturating_sub(1) {
            self.push_triangle([first, first + step, first + step + 1]);
        }
    }

    /// Appends a pie slice from `start` sweeping `sweep` radians.
    ///
    /// Used for round stroke caps; the rim has `segments + 1` vertices.
    pub fn push_sector(&mut self, center: Point, radius: f64, start: f64, sweep: f64, segments: u32) {
        let hub = self.push_vertex(center);
        let step = sweep / f64::from(segments.max(1));
        let mut previous = self.push_vertex(polar(center, radius, start));
        for i in 1..=segments.max(1) {
            let current = self.push_vertex(polar(center, radius, step.mul_add(f64::from(i), start)));
            self.push_triangle([hub, previous, current]);
            previous = current;
        }
    }

    /// Appends an annulus between `inner` and `outer` around `center`.
    pub fn push_ring(&mut self, center: Point, inner: f64, outer: f64, segments: u32) {
        let segments = segments.max(3);
        let first = self.vertex_count();
        for step in 0..segments {
            let angle = step_angle(step, segments);
            self.push_vertex(polar(center, outer, angle));
            self.push_vertex(polar(center, inner, angle));
        }
        for step in 0..segments {
            let rim = first + 2 * step;
            let next_rim = first + 2 * ((step + 1) % segments);
            self.push_quad([rim, next_rim, next_rim + 1, rim + 1]);
        }
    }

    /// Records a drawing problem and logs it.
    pub fn warn(&mut self, message: String) {
        tracing::warn!(%message, "drawing problem");
        self.warnings.push(message);
    }

    /// Indices written so far.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        saturate_u32(self.indices.len())
    }

    /// Vertices written so far.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        saturate_u32(self.positions.len() / 2)
    }

    /// Finishes the drawing.
    ///
    /// `ranges` is empty and `operation_count` zero until
    /// [`super::ranges::apply_ranges`] fills them in.
    pub fn build(self) -> DrawingGeometry {
        DrawingGeometry {
            vertex_count: self.vertex_count(),
            positions: self.positions,
            indices: self.indices,
            bounds: self.bounds,
            operation_count: 0,
            warnings: self.warnings,
            ranges: Vec::new(),
        }
    }
}

fn step_angle(step: u32, segments: u32) -> f64 {
    std::f64::consts::TAU * f64::from(step) / f64::from(segments)
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(radius.mul_add(cos, center.x), radius.mul_add(sin, center.y))
}
