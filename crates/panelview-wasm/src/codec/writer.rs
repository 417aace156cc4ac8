//! `KDTPanelFormat` writer.
//!
//! The whole document is rendered into memory; nothing touches the
//! filesystem until serialisation has succeeded.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::PanelError;
use crate::expr::evaluate;
use crate::geometry::Point;
use crate::model::{
    Edge, Hole, MillLine, MillPath, Operation, Panel, Vertex, VertexKind, DEFAULT_FACE_HOLE_Z,
};

use super::number::{format_float, format_num};

/// Renders a panel and its operations as `KDTPanelFormat` XML.
///
/// # Errors
///
/// Returns [`PanelError::Operation`] naming the first operation that could
/// not be written, or [`PanelError::Write`] for failures outside operations.
pub fn write_document(panel: &Panel, operations: &[Operation]) -> Result<String, PanelError> {
    let mut out = XmlOut::new();

    write_head(&mut out, panel).map_err(PanelError::Write)?;

    for (index, operation) in operations.iter().enumerate() {
        write_operation(&mut out, panel, operation).map_err(|message| PanelError::Operation {
            index,
            type_name: operation.type_name().to_string(),
            message,
        })?;
    }

    out.end("KDTPanelFormat").map_err(PanelError::Write)?;
    let xml = out.finish().map_err(PanelError::Write)?;
    tracing::debug!(
        operations = operations.len(),
        bytes = xml.len(),
        "panel document written"
    );
    Ok(xml)
}

/// Thin wrapper over the quick-xml writer with string errors.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), String> {
        self.writer.write_event(event).map_err(|e| e.to_string())
    }

    fn start(&mut self, tag: &str) -> Result<(), String> {
        self.event(Event::Start(BytesStart::new(tag)))
    }

    fn end(&mut self, tag: &str) -> Result<(), String> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    /// `<tag>text</tag>`, or `<tag/>` for empty text.
    fn text(&mut self, tag: &str, text: &str) -> Result<(), String> {
        if text.is_empty() {
            return self.event(Event::Empty(BytesStart::new(tag)));
        }
        self.start(tag)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    /// Writes `<tag>` only when `text` is non-empty, number-formatted.
    fn optional_num(&mut self, tag: &str, text: &str) -> Result<(), String> {
        if text.trim().is_empty() {
            return Ok(());
        }
        self.text(tag, &format_num(text))
    }

    fn empty_with_attributes(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Result<(), String> {
        let mut element = BytesStart::new(tag);
        for &attribute in attributes {
            element.push_attribute(attribute);
        }
        self.event(Event::Empty(element))
    }

    fn finish(self) -> Result<String, String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| e.to_string())
    }
}

fn dimension_text(value: f64) -> String {
    format_float(value).unwrap_or_else(|| "0".to_string())
}

fn write_head(out: &mut XmlOut, panel: &Panel) -> Result<(), String> {
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.start("KDTPanelFormat")?;
    write_panel(out, panel)
}

fn write_panel(out: &mut XmlOut, panel: &Panel) -> Result<(), String> {
    let length = dimension_text(panel.length);
    let width = dimension_text(panel.width);
    let thickness = dimension_text(panel.thickness);

    out.start("PANEL")?;
    out.text("CoordinateSystem", &panel.coordinate_system)?;
    out.text("PanelLength", &length)?;
    out.text("PanelWidth", &width)?;
    out.text("PanelThickness", &thickness)?;
    out.text("PanelName", &panel.name)?;
    out.text("PanelOrderName", &panel.order_name)?;
    out.text("PanelMaterial", &panel.material)?;
    out.text("PanelTexture", &panel.texture)?;
    out.text("PanelQuantity", &panel.quantity)?;
    out.text("Inch", &panel.inch)?;

    out.start("Params")?;
    let params = [
        ("Длина детали", "L", &length),
        ("Ширина детали", "W", &width),
        ("Толщина детали", "T", &thickness),
    ];
    for (comment, key, value) in params {
        out.empty_with_attributes(
            "Param",
            &[("Comment", comment), ("Key", key), ("Value", value.as_str())],
        )?;
    }
    out.end("Params")?;
    out.end("PANEL")
}

fn write_operation(out: &mut XmlOut, panel: &Panel, operation: &Operation) -> Result<(), String> {
    let kind = operation.kind();
    out.start("CAD")?;
    out.text("TypeNo", &kind.type_no().to_string())?;
    out.text("TypeName", kind.type_name())?;

    match operation {
        Operation::VerticalHole(hole) | Operation::BackVerticalHole(hole) => {
            write_hole(out, hole, None)?;
        }
        Operation::HorizontalHole(hole) => write_hole(out, hole, Some(panel))?,
        Operation::Line(line) => write_line(out, line)?,
        Operation::Path(path) => write_path(out, path)?,
    }

    out.end("CAD")
}

/// `face_of` is the panel for end-face holes, which also carry `Z1` and
/// `Quadrant`.
fn write_hole(out: &mut XmlOut, hole: &Hole, face_of: Option<&Panel>) -> Result<(), String> {
    let x = format_num(&hole.x);
    let y = format_num(&hole.y);

    out.text("HoleType", &hole.hole_type)?;
    out.text("X1", &x)?;
    out.text("Y1", &y)?;

    if let Some(panel) = face_of {
        out.text("Z1", &format_num(hole.z.as_deref().unwrap_or(DEFAULT_FACE_HOLE_Z)))?;
        if let Some(quadrant) = quadrant(panel, &x, &y) {
            out.text("Quadrant", &quadrant.to_string())?;
        }
    }

    out.text("Depth", &format_num(&hole.depth))?;
    out.text("Diameter", &format_num(&hole.diameter))?;
    out.text("Enable", &hole.enable)
}

/// Edge code of an end-face hole, resolved with the plain evaluator.
fn quadrant(panel: &Panel, x: &str, y: &str) -> Option<u8> {
    let position = Point::new(
        evaluate(x, panel.length, panel.width),
        evaluate(y, panel.length, panel.width),
    );
    Edge::locate(position, panel.length, panel.width).map(Edge::quadrant)
}

fn write_line(out: &mut XmlOut, line: &MillLine) -> Result<(), String> {
    let fields = [
        ("BeginX", &line.begin_x),
        ("BeginY", &line.begin_y),
        ("EndX", &line.end_x),
        ("EndY", &line.end_y),
        ("Width", &line.width),
        ("Depth", &line.depth),
        ("Correction", &line.correction),
        ("Direction", &line.direction),
        ("Enable", &line.enable),
    ];
    for (tag, value) in fields {
        out.optional_num(tag, value)?;
    }
    Ok(())
}

fn write_path(out: &mut XmlOut, path: &MillPath) -> Result<(), String> {
    let settings = [
        ("Width", &path.width),
        ("Depth", &path.depth),
        ("Correction", &path.correction),
        ("CorrectionExtra", &path.correction_extra),
        ("Close", &path.close),
        ("Empty", &path.empty),
        ("Relative", &path.relative),
        ("Enable", &path.enable),
    ];
    for (tag, value) in settings {
        out.optional_num(tag, value)?;
    }

    if path.vertices.is_empty() {
        return out.event(Event::Empty(BytesStart::new("Vertexes")));
    }

    out.start("Vertexes")?;
    for vertex in &path.vertices {
        write_vertex(out, vertex)?;
    }
    out.end("Vertexes")
}

fn write_vertex(out: &mut XmlOut, vertex: &Vertex) -> Result<(), String> {
    let tag = vertex.kind.tag();
    out.start(tag)?;
    out.text("X1", &format_num(&vertex.x))?;
    out.text("Y1", &format_num(&vertex.y))?;
    out.text("Z1", &format_num(&vertex.z))?;
    out.text("VertexType", &vertex.vertex_type)?;
    if let VertexKind::Arc { radius, direction } = vertex.kind {
        let radius = format_float(radius).ok_or_else(|| format!("arc radius {radius} is not finite"))?;
        out.text("Radius", &radius)?;
        out.text("Direction", direction.code())?;
    }
    out.end(tag)
}
