//! Panel and machining operation types.
//!
//! Coordinate and numeric fields of operations are kept as the text the user
//! (or the file) supplied. They are resolved against the panel dimensions only
//! when needed, so resizing the panel reflows every relative coordinate.

use serde::{Deserialize, Serialize};

use crate::expr::CoordContext;
use crate::geometry::Point;

/// The rectangular workpiece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel name.
    pub name: String,
    /// Length `L` in millimetres.
    pub length: f64,
    /// Width `W` in millimetres.
    pub width: f64,
    /// Thickness `T` in millimetres.
    pub thickness: f64,
    /// Order the panel belongs to.
    pub order_name: String,
    /// Material name.
    pub material: String,
    /// Texture flag, passed through verbatim.
    pub texture: String,
    /// Number of panels to machine, passed through verbatim.
    pub quantity: String,
    /// Inch flag, passed through verbatim.
    pub inch: String,
    /// Machine coordinate-system id, passed through verbatim.
    pub coordinate_system: String,
}

impl Panel {
    /// Creates an unnamed panel of the given size with default metadata.
    pub fn new(length: f64, width: f64, thickness: f64) -> Self {
        Self {
            length,
            width,
            thickness,
            ..Self::default()
        }
    }

    /// Whether both length and width are positive.
    ///
    /// Unsized panels have no meaningful geometry; consumers skip drawing
    /// and coordinate resolution for them.
    pub fn is_sized(&self) -> bool {
        self.length > 0.0 && self.width > 0.0
    }

    /// Coordinate context for resolving operation fields on this panel.
    pub const fn coords(&self) -> CoordContext {
        CoordContext::new(self.length, self.width)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            name: String::new(),
            length: 0.0,
            width: 0.0,
            thickness: 0.0,
            order_name: String::new(),
            material: String::new(),
            texture: "0".to_string(),
            quantity: "1".to_string(),
            inch: "0".to_string(),
            coordinate_system: "3".to_string(),
        }
    }
}

/// Operation kind as declared by `TypeName` / `TypeNo` in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Top-face hole.
    VerticalHole,
    /// Bottom-face hole.
    BackVerticalHole,
    /// End-face hole drilled from one of the four edges.
    HorizontalHole,
    /// Straight mill cut.
    Line,
    /// Compound mill path.
    Path,
}

impl OperationKind {
    /// All kinds, in `TypeNo` order.
    pub const ALL: [Self; 5] = [
        Self::VerticalHole,
        Self::HorizontalHole,
        Self::Line,
        Self::Path,
        Self::BackVerticalHole,
    ];

    /// Canonical `TypeName` string.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::VerticalHole => "Vertical Hole",
            Self::BackVerticalHole => "Back Vertical Hole",
            Self::HorizontalHole => "Horizontal Hole",
            Self::Line => "Line",
            Self::Path => "Path",
        }
    }

    /// Fixed `TypeNo` code expected by the controller.
    pub const fn type_no(self) -> u8 {
        match self {
            Self::VerticalHole => 1,
            Self::HorizontalHole => 2,
            Self::Line => 3,
            Self::Path => 7,
            Self::BackVerticalHole => 8,
        }
    }

    /// Looks up a kind by its `TypeName`. Unknown names yield `None`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

/// A single machining instruction (one `CAD` record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Operation {
    /// Top-face hole.
    VerticalHole(Hole),
    /// Bottom-face hole.
    BackVerticalHole(Hole),
    /// End-face hole; must resolve near one of the four edges.
    HorizontalHole(Hole),
    /// Straight mill cut.
    Line(MillLine),
    /// Compound mill path.
    Path(MillPath),
}

impl Operation {
    /// New top-face hole with default hole type and enable flag.
    pub fn vertical_hole(x: &str, y: &str, diameter: &str, depth: &str) -> Self {
        Self::VerticalHole(Hole::new(x, y, diameter, depth))
    }

    /// New bottom-face hole.
    pub fn back_vertical_hole(x: &str, y: &str, diameter: &str, depth: &str) -> Self {
        Self::BackVerticalHole(Hole::new(x, y, diameter, depth))
    }

    /// New end-face hole at the default drilling height.
    pub fn horizontal_hole(x: &str, y: &str, diameter: &str, depth: &str) -> Self {
        Self::HorizontalHole(Hole {
            z: Some(DEFAULT_FACE_HOLE_Z.to_string()),
            ..Hole::new(x, y, diameter, depth)
        })
    }

    /// The kind of this operation.
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::VerticalHole(_) => OperationKind::VerticalHole,
            Self::BackVerticalHole(_) => OperationKind::BackVerticalHole,
            Self::HorizontalHole(_) => OperationKind::HorizontalHole,
            Self::Line(_) => OperationKind::Line,
            Self::Path(_) => OperationKind::Path,
        }
    }

    /// Canonical `TypeName` of this operation.
    pub const fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Absolute positions of the operation's defining points.
    ///
    /// Holes yield their centre, lines their two endpoints, paths every
    /// vertex in order.
    pub fn resolve(&self, coords: &CoordContext) -> Vec<Point> {
        match self {
            Self::VerticalHole(hole) | Self::BackVerticalHole(hole) | Self::HorizontalHole(hole) => {
                vec![hole.position(coords)]
            }
            Self::Line(line) => {
                let (begin, end) = line.endpoints(coords);
                vec![begin, end]
            }
            Self::Path(path) => path
                .vertices
                .iter()
                .map(|vertex| vertex.position(coords))
                .collect(),
        }
    }
}

/// Default `Z1` written for end-face holes.
pub const DEFAULT_FACE_HOLE_Z: &str = "8";

/// A drilled hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Centre X (text, may be a formula or far-edge offset).
    pub x: String,
    /// Centre Y.
    pub y: String,
    /// Drill diameter.
    pub diameter: String,
    /// Drilling depth.
    pub depth: String,
    /// Controller hole type, passed through verbatim.
    pub hole_type: String,
    /// Enable flag, passed through verbatim.
    pub enable: String,
    /// Drilling height `Z1`; only end-face holes carry one.
    pub z: Option<String>,
}

impl Hole {
    /// New hole with hole type `0`, enabled, and no `Z1`.
    pub fn new(x: &str, y: &str, diameter: &str, depth: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            diameter: diameter.to_string(),
            depth: depth.to_string(),
            hole_type: "0".to_string(),
            enable: "1".to_string(),
            z: None,
        }
    }

    /// Absolute centre of the hole.
    pub fn position(&self, coords: &CoordContext) -> Point {
        Point {
            x: coords.x(&self.x),
            y: coords.y(&self.y),
        }
    }
}

/// A straight mill cut.
///
/// Fields missing from a loaded file stay empty and are not written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MillLine {
    /// Start X.
    pub begin_x: String,
    /// Start Y.
    pub begin_y: String,
    /// End X.
    pub end_x: String,
    /// End Y.
    pub end_y: String,
    /// Tool width.
    pub width: String,
    /// Milling depth.
    pub depth: String,
    /// Tool radius correction mode.
    pub correction: String,
    /// Controller direction code.
    pub direction: String,
    /// Enable flag.
    pub enable: String,
}

impl MillLine {
    /// New cut with the editor's default correction (`1`) and direction (`6`).
    pub fn new(begin: (&str, &str), end: (&str, &str), width: &str, depth: &str) -> Self {
        Self {
            begin_x: begin.0.to_string(),
            begin_y: begin.1.to_string(),
            end_x: end.0.to_string(),
            end_y: end.1.to_string(),
            width: width.to_string(),
            depth: depth.to_string(),
            correction: "1".to_string(),
            direction: "6".to_string(),
            enable: String::new(),
        }
    }

    /// Absolute start and end points.
    pub fn endpoints(&self, coords: &CoordContext) -> (Point, Point) {
        (
            Point {
                x: coords.x(&self.begin_x),
                y: coords.y(&self.begin_y),
            },
            Point {
                x: coords.x(&self.end_x),
                y: coords.y(&self.end_y),
            },
        )
    }
}

/// A compound mill path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MillPath {
    /// Tool width.
    pub width: String,
    /// Milling depth.
    pub depth: String,
    /// Tool radius correction mode.
    pub correction: String,
    /// Extra correction.
    pub correction_extra: String,
    /// Closed-contour flag.
    pub close: String,
    /// Empty flag.
    pub empty: String,
    /// Relative-coordinates flag.
    pub relative: String,
    /// Enable flag.
    pub enable: String,
    /// Vertices in machining order; the first one is a [`VertexKind::Point`].
    pub vertices: Vec<Vertex>,
}

impl MillPath {
    /// New path with the controller's default settings.
    pub fn new(width: &str, depth: &str, vertices: Vec<Vertex>) -> Self {
        Self {
            width: width.to_string(),
            depth: depth.to_string(),
            vertices,
            ..Self::default()
        }
    }

    /// A path needs at least one edge to be drawn.
    pub fn is_drawable(&self) -> bool {
        self.vertices.len() >= 2
    }

    /// Edges as `(from, to)` vertex pairs; `to` decides the edge shape.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices.iter().zip(self.vertices.iter().skip(1))
    }
}

impl Default for MillPath {
    fn default() -> Self {
        Self {
            width: "8".to_string(),
            depth: "17".to_string(),
            correction: "2".to_string(),
            correction_extra: "0".to_string(),
            close: "0".to_string(),
            empty: "0".to_string(),
            relative: "0".to_string(),
            enable: "1".to_string(),
            vertices: Vec::new(),
        }
    }
}

/// Sweep direction of an arc edge, as encoded by the `Direction` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    /// `Direction = 0`.
    CounterClockwise,
    /// `Direction = 1`.
    Clockwise,
}

impl ArcDirection {
    /// Decodes the file value; anything but `0` is clockwise.
    pub fn from_code(code: &str) -> Self {
        if code.trim() == "0" {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    /// File value of this direction.
    pub const fn code(self) -> &'static str {
        match self {
            Self::CounterClockwise => "0",
            Self::Clockwise => "1",
        }
    }
}

/// Shape of the edge arriving at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VertexKind {
    /// Start point; never an edge.
    Point,
    /// Straight edge from the previous vertex.
    Line,
    /// Circular edge from the previous vertex.
    Arc {
        /// Arc radius in millimetres.
        radius: f64,
        /// Which side of the chord the centre lies on.
        direction: ArcDirection,
    },
}

impl VertexKind {
    /// Element name used inside `Vertexes`.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Line => "Line",
            Self::Arc { .. } => "Arc",
        }
    }
}

/// One control point of a [`MillPath`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Edge shape arriving at this vertex.
    pub kind: VertexKind,
    /// X (absolute; formulas allowed).
    pub x: String,
    /// Y (absolute; formulas allowed).
    pub y: String,
    /// Z, always `0.00` in files written by the editor.
    pub z: String,
    /// Controller vertex type, passed through verbatim.
    pub vertex_type: String,
}

impl Vertex {
    fn with_kind(kind: VertexKind, x: &str, y: &str) -> Self {
        Self {
            kind,
            x: x.to_string(),
            y: y.to_string(),
            z: "0.00".to_string(),
            vertex_type: "0".to_string(),
        }
    }

    /// Path start point.
    pub fn point(x: &str, y: &str) -> Self {
        Self::with_kind(VertexKind::Point, x, y)
    }

    /// Straight edge ending at `(x, y)`.
    pub fn line(x: &str, y: &str) -> Self {
        Self::with_kind(VertexKind::Line, x, y)
    }

    /// Arc edge ending at `(x, y)`.
    pub fn arc(x: &str, y: &str, radius: f64, direction: ArcDirection) -> Self {
        Self::with_kind(VertexKind::Arc { radius, direction }, x, y)
    }

    /// Absolute position of the vertex.
    pub fn position(&self, coords: &CoordContext) -> Point {
        Point {
            x: coords.path_x(&self.x),
            y: coords.path_y(&self.y),
        }
    }
}

/// A panel together with its operations, as stored in one file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelDocument {
    /// The workpiece.
    pub panel: Panel,
    /// Operations in document order.
    pub operations: Vec<Operation>,
}

impl PanelDocument {
    /// Bundles a panel and its operations.
    pub const fn new(panel: Panel, operations: Vec<Operation>) -> Self {
        Self { panel, operations }
    }

    /// Splits the document back into its parts.
    pub fn into_parts(self) -> (Panel, Vec<Operation>) {
        (self.panel, self.operations)
    }
}
