//! `KDTPanelFormat` reader.
//!
//! Missing or malformed fields fall back to the controller defaults; only a
//! document that is not XML or has no panel element is rejected.

use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::error::PanelError;
use crate::expr::evaluate;
use crate::model::{
    ArcDirection, Hole, MillLine, MillPath, Operation, OperationKind, Panel, PanelDocument,
    Vertex, VertexKind, DEFAULT_FACE_HOLE_Z,
};

/// Parses a panel document from XML text.
///
/// # Errors
///
/// Returns [`PanelError::Xml`] when the text is not well-formed XML and
/// [`PanelError::Format`] when the root has no `PANEL` (or `Panel`) child.
pub fn parse_document(xml: &str) -> Result<PanelDocument, PanelError> {
    let doc = Document::parse(xml).map_err(|e| PanelError::Xml(e.to_string()))?;
    let root = doc.root_element();

    let panel_node = child(root, "PANEL")
        .or_else(|| child(root, "Panel"))
        .ok_or_else(|| PanelError::Format("missing <PANEL> element".to_string()))?;
    let panel = read_panel(panel_node);

    let mut operations = Vec::new();
    for (position, cad) in elements(root).filter(|n| n.has_tag_name("CAD")).enumerate() {
        let fields = Fields::collect(cad);
        let type_name = fields.get("TypeName").unwrap_or_default();
        let Some(kind) = OperationKind::from_type_name(type_name) else {
            tracing::warn!(position, type_name, "skipping CAD record of unknown type");
            continue;
        };
        operations.push(read_operation(kind, cad, &fields));
    }

    tracing::debug!(
        name = %panel.name,
        length = panel.length,
        width = panel.width,
        operations = operations.len(),
        "panel document parsed"
    );
    Ok(PanelDocument::new(panel, operations))
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    elements(node).find(|n| n.has_tag_name(tag))
}

/// Trimmed text of the first `tag` child, or `default` if it is missing or
/// blank.
fn text_or(node: Node<'_, '_>, tag: &str, default: &str) -> String {
    child(node, tag)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn read_panel(node: Node<'_, '_>) -> Panel {
    let mut length = text_or(node, "PanelLength", "0");
    let mut width = text_or(node, "PanelWidth", "0");
    let mut thickness = text_or(node, "PanelThickness", "0");

    if let Some(params) = child(node, "Params") {
        for param in elements(params).filter(|n| n.has_tag_name("Param")) {
            let key = param.attribute("Key").unwrap_or_default().trim().to_uppercase();
            let value = param.attribute("Value").unwrap_or("0").trim().to_string();
            match key.as_str() {
                "L" => length = value,
                "W" => width = value,
                "T" => thickness = value,
                _ => {}
            }
        }
    }

    Panel {
        name: text_or(node, "PanelName", ""),
        length: dimension(&length),
        width: dimension(&width),
        thickness: dimension(&thickness),
        order_name: text_or(node, "PanelOrderName", ""),
        material: text_or(node, "PanelMaterial", ""),
        texture: text_or(node, "PanelTexture", "0"),
        quantity: text_or(node, "PanelQuantity", "1"),
        inch: text_or(node, "Inch", "0"),
        coordinate_system: text_or(node, "CoordinateSystem", "3"),
    }
}

/// Panel dimensions may be written with a decimal comma or as arithmetic.
fn dimension(text: &str) -> f64 {
    evaluate(text, 0.0, 0.0)
}

/// Direct child texts of a `CAD` record, keyed by tag. Later duplicates win.
struct Fields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    fn collect(cad: Node<'a, '_>) -> Self {
        let values = elements(cad)
            .map(|n| (n.tag_name().name(), n.text().map_or("", str::trim)))
            .collect();
        Self { values }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied()
    }

    /// Field text if the element exists (even when empty), else `default`.
    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Field text, or `default` when the element is missing or blank.
    fn non_blank_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .filter(|t| !t.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    /// Field text, empty when the element is missing.
    fn opt(&self, key: &str) -> String {
        self.or(key, "")
    }
}

fn read_operation(kind: OperationKind, cad: Node<'_, '_>, fields: &Fields<'_>) -> Operation {
    match kind {
        OperationKind::VerticalHole => Operation::VerticalHole(read_hole(fields, None)),
        OperationKind::BackVerticalHole => Operation::BackVerticalHole(read_hole(fields, None)),
        OperationKind::HorizontalHole => {
            Operation::HorizontalHole(read_hole(fields, Some(fields.or("Z1", DEFAULT_FACE_HOLE_Z))))
        }
        OperationKind::Line => Operation::Line(read_line(fields)),
        OperationKind::Path => Operation::Path(read_path(cad, fields)),
    }
}

fn read_hole(fields: &Fields<'_>, z: Option<String>) -> Hole {
    Hole {
        x: fields.or("X1", "0"),
        y: fields.or("Y1", "0"),
        diameter: fields.or("Diameter", "5"),
        depth: fields.or("Depth", "0"),
        hole_type: fields.or("HoleType", "0"),
        enable: fields.or("Enable", "1"),
        z,
    }
}

fn read_line(fields: &Fields<'_>) -> MillLine {
    MillLine {
        begin_x: fields.opt("BeginX"),
        begin_y: fields.opt("BeginY"),
        end_x: fields.opt("EndX"),
        end_y: fields.opt("EndY"),
        width: fields.opt("Width"),
        depth: fields.opt("Depth"),
        correction: fields.opt("Correction"),
        direction: fields.opt("Direction"),
        enable: fields.opt("Enable"),
    }
}

fn read_path(cad: Node<'_, '_>, fields: &Fields<'_>) -> MillPath {
    let vertices = child(cad, "Vertexes")
        .map(|container| elements(container).filter_map(read_vertex).collect())
        .unwrap_or_default();

    MillPath {
        width: fields.non_blank_or("Width", "8"),
        depth: fields.non_blank_or("Depth", "17"),
        correction: fields.non_blank_or("Correction", "2"),
        correction_extra: fields.non_blank_or("CorrectionExtra", "0"),
        close: fields.non_blank_or("Close", "0"),
        empty: fields.non_blank_or("Empty", "0"),
        relative: fields.non_blank_or("Relative", "0"),
        enable: fields.non_blank_or("Enable", "1"),
        vertices,
    }
}

fn read_vertex(node: Node<'_, '_>) -> Option<Vertex> {
    let kind = match node.tag_name().name().to_lowercase().as_str() {
        "point" => VertexKind::Point,
        "line" => VertexKind::Line,
        "arc" => VertexKind::Arc {
            radius: evaluate(&text_or(node, "Radius", "0"), 0.0, 0.0),
            direction: ArcDirection::from_code(&text_or(node, "Direction", "1")),
        },
        other => {
            tracing::warn!(tag = other, "skipping unknown vertex element");
            return None;
        }
    };

    Some(Vertex {
        kind,
        x: text_or(node, "X1", "0"),
        y: text_or(node, "Y1", "0"),
        z: text_or(node, "Z1", "0.00"),
        vertex_type: text_or(node, "VertexType", "0"),
    })
}
