//! `KDTPanelFormat` XML codec.
//!
//! Reads with `roxmltree`, writes with `quick-xml`. Coordinate fields travel
//! as text in both directions, so formulas survive a round trip.

pub mod number;
pub mod reader;
pub mod writer;

use std::path::Path;

pub use number::{format_float, format_num};
pub use reader::parse_document;
pub use writer::write_document;

use crate::error::PanelError;
use crate::model::{Operation, Panel};

/// Loads a panel program from disk.
///
/// # Errors
///
/// Returns [`PanelError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_document`].
pub fn load(path: impl AsRef<Path>) -> Result<(Panel, Vec<Operation>), PanelError> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "loading panel program");
    Ok(parse_document(&xml)?.into_parts())
}

/// Saves a panel program to disk.
///
/// The document is fully rendered before the file is opened, so a write
/// error never leaves a half-written file behind.
///
/// # Errors
///
/// Returns the errors of [`write_document`], or [`PanelError::Io`] if the file
/// cannot be written.
pub fn save(path: impl AsRef<Path>, panel: &Panel, operations: &[Operation]) -> Result<(), PanelError> {
    let path = path.as_ref();
    let xml = write_document(panel, operations)?;
    std::fs::write(path, xml)?;
    tracing::debug!(path = %path.display(), operations = operations.len(), "panel program saved");
    Ok(())
}
