#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::indexing_slicing)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `PanelView` WASM module: CNC panel programs, coordinate formulas and
//! drawing geometry.
//!
//! The JS editing shell loads a `KDTPanelFormat` file through
//! [`load_panel`], edits the returned document, draws it with [`draw_panel`]
//! and writes it back with [`save_panel`]. Native code can use the
//! [`codec`], [`model`] and [`geometry`] modules directly.

pub mod codec;
pub mod error;
pub mod expr;
pub mod geometry;
pub mod model;

use std::cell::RefCell;
use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::geometry::{DrawOptions, DrawingGeometry, DrawingMeta};
use crate::model::{EditSession, PanelDocument};

thread_local! {
    static LAST_DRAWING: RefCell<Option<DrawingGeometry>> = const { RefCell::new(None) };
}

fn store_drawing(geom: DrawingGeometry) {
    LAST_DRAWING.with(|g| {
        *g.borrow_mut() = Some(geom);
    });
}

fn js_error(message: impl Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Initialize the WASM module. Sets up the panic hook for debugging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Parse a `KDTPanelFormat` file from raw bytes.
///
/// Returns the [`PanelDocument`] as a `JsValue` via `serde-wasm-bindgen`.
///
/// # Errors
///
/// Returns a JS `Error` if the bytes are not UTF-8, not XML, or have no
/// panel element.
#[wasm_bindgen]
pub fn load_panel(data: &[u8]) -> Result<JsValue, JsValue> {
    let doc = load_panel_internal(data).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&doc).map_err(js_error)
}

/// Internal load logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn load_panel_internal(data: &[u8]) -> Result<PanelDocument, String> {
    if data.is_empty() {
        return Err("empty input".to_string());
    }
    let text = std::str::from_utf8(data).map_err(|e| format!("input is not UTF-8: {e}"))?;
    let text = text.trim_start_matches('\u{feff}');
    codec::parse_document(text).map_err(|e| e.to_string())
}

/// Serialize a panel document (as produced by [`load_panel`]) to XML text.
///
/// # Errors
///
/// Returns a JS `Error` if the value is not a panel document or an
/// operation cannot be written.
#[wasm_bindgen]
pub fn save_panel(doc: JsValue) -> Result<String, JsValue> {
    let doc: PanelDocument = serde_wasm_bindgen::from_value(doc).map_err(js_error)?;
    save_panel_internal(&doc).map_err(js_error)
}

/// Internal save logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn save_panel_internal(doc: &PanelDocument) -> Result<String, String> {
    codec::write_document(&doc.panel, &doc.operations).map_err(|e| e.to_string())
}

/// Evaluate a coordinate formula against the panel length and width.
///
/// Invalid input evaluates to `0`.
#[wasm_bindgen]
pub fn evaluate(formula: &str, length: f64, width: f64) -> f64 {
    expr::evaluate(formula, length, width)
}

/// Resolve a hole or line coordinate field, honouring far-edge offsets.
#[wasm_bindgen]
pub fn parse_coord(value: &str, length: f64, width: f64, is_y: bool) -> f64 {
    let axis = if is_y { expr::Axis::Y } else { expr::Axis::X };
    expr::parse_coord(value, length, width, axis)
}

/// Normalise a numeric field the way it is written to files.
#[wasm_bindgen]
pub fn format_num(value: &str) -> String {
    codec::format_num(value)
}

/// Draw a panel document and keep the geometry for the buffer getters.
///
/// Returns `DrawingMeta` as a `JsValue` via `serde-wasm-bindgen`.
/// Geometry buffers are stored internally; retrieve with
/// [`get_positions`], [`get_indices`] and [`get_operation_ranges`].
///
/// # Errors
///
/// Returns a JS `Error` if the value is not a panel document.
#[wasm_bindgen]
pub fn draw_panel(doc: JsValue) -> Result<JsValue, JsValue> {
    let doc: PanelDocument = serde_wasm_bindgen::from_value(doc).map_err(js_error)?;
    let meta = draw_panel_internal(&doc);
    serde_wasm_bindgen::to_value(&meta).map_err(js_error)
}

/// Internal draw logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn draw_panel_internal(doc: &PanelDocument) -> DrawingMeta {
    let geom = geometry::draw_panel(&doc.panel, &doc.operations, &DrawOptions::default());
    let meta = DrawingMeta::from_geometry(&geom);
    store_drawing(geom);
    meta
}

/// Indices of end-face holes that are not on a panel edge.
///
/// # Errors
///
/// Returns a JS `Error` if the value is not a panel document.
#[wasm_bindgen]
pub fn face_hole_issues(doc: JsValue) -> Result<Vec<u32>, JsValue> {
    let doc: PanelDocument = serde_wasm_bindgen::from_value(doc).map_err(js_error)?;
    Ok(face_hole_issues_internal(doc))
}

/// Internal edge check shared between the wasm export and native tests.
#[doc(hidden)]
pub fn face_hole_issues_internal(doc: PanelDocument) -> Vec<u32> {
    EditSession::from_document(doc)
        .face_hole_issues()
        .into_iter()
        .map(geometry::saturate_u32)
        .collect()
}

/// Retrieve the position buffer for the last drawing.
///
/// Returns a copy of the interleaved `[x0, y0, x1, y1, ...]` positions.
/// Returns an empty array if nothing has been drawn yet.
#[wasm_bindgen]
pub fn get_positions() -> Vec<f32> {
    LAST_DRAWING.with(|g| {
        g.borrow()
            .as_ref()
            .map_or_else(Vec::new, |geom| geom.positions.clone())
    })
}

/// Retrieve the index buffer for the last drawing.
///
/// Returns a copy of the triangle-list indices.
/// Returns an empty array if nothing has been drawn yet.
#[wasm_bindgen]
pub fn get_indices() -> Vec<u32> {
    LAST_DRAWING.with(|g| {
        g.borrow()
            .as_ref()
            .map_or_else(Vec::new, |geom| geom.indices.clone())
    })
}

/// Retrieve the per-operation index ranges for the last drawing.
///
/// Returns a flattened `[operation0, category0, start0, end0, ...]` array.
/// `operation` is `u32::MAX` for the panel outline; `category` is
/// [`geometry::DrawCategory::code`].
#[wasm_bindgen]
pub fn get_operation_ranges() -> Vec<u32> {
    LAST_DRAWING.with(|g| {
        g.borrow().as_ref().map_or_else(Vec::new, |geom| {
            let mut flat = Vec::with_capacity(geom.ranges.len() * 4);
            for range in &geom.ranges {
                flat.push(range.operation.map_or(u32::MAX, geometry::saturate_u32));
                flat.push(range.category.code());
                flat.push(range.index_start);
                flat.push(range.index_end);
            }
            flat
        })
    })
}
