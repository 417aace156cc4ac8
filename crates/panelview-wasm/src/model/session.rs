//! Editing session: owns the panel and its operation list.

use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::PanelError;
use crate::geometry::Point;

use super::edge::Edge;
use super::types::{Operation, Panel, PanelDocument};

/// The program being edited, plus the file it came from.
///
/// All edits go through this type; undo is left to the caller, which can
/// keep [`EditSession::snapshot`]s.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    panel: Panel,
    operations: Vec<Operation>,
    path: Option<PathBuf>,
}

impl EditSession {
    /// Starts an unsaved session for the given document.
    pub fn from_document(document: PanelDocument) -> Self {
        let (panel, operations) = document.into_parts();
        Self {
            panel,
            operations,
            path: None,
        }
    }

    /// Opens a program file and remembers its path for [`Self::save`].
    ///
    /// # Errors
    ///
    /// Propagates [`codec::load`] errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PanelError> {
        let path = path.as_ref();
        let (panel, operations) = codec::load(path)?;
        Ok(Self {
            panel,
            operations,
            path: Some(path.to_path_buf()),
        })
    }

    /// Writes the program back to the file it was opened from or last saved to.
    ///
    /// # Errors
    ///
    /// [`PanelError::NoPath`] if the session never had a path, otherwise the
    /// errors of [`codec::save`].
    pub fn save(&self) -> Result<(), PanelError> {
        let path = self.path.as_deref().ok_or(PanelError::NoPath)?;
        codec::save(path, &self.panel, &self.operations)
    }

    /// Writes the program to `path` and makes it the session's path.
    ///
    /// # Errors
    ///
    /// Propagates [`codec::save`] errors; the remembered path is unchanged
    /// on failure.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), PanelError> {
        let path = path.as_ref();
        codec::save(path, &self.panel, &self.operations)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// File the session saves to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The workpiece.
    pub const fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Operations in document order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Resizes the panel. Relative coordinates follow automatically.
    pub fn set_dimensions(&mut self, length: f64, width: f64, thickness: f64) {
        self.panel.length = length;
        self.panel.width = width;
        self.panel.thickness = thickness;
    }

    /// Replaces the panel metadata and dimensions.
    pub fn set_panel(&mut self, panel: Panel) {
        self.panel = panel;
    }

    /// Appends an operation and returns its index.
    pub fn push(&mut self, operation: Operation) -> usize {
        self.operations.push(operation);
        self.operations.len() - 1
    }

    /// Replaces the operation at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// [`PanelError::OperationIndex`] if `index` is out of range.
    pub fn replace(&mut self, index: usize, operation: Operation) -> Result<Operation, PanelError> {
        let len = self.operations.len();
        let slot = self
            .operations
            .get_mut(index)
            .ok_or(PanelError::OperationIndex { index, len })?;
        Ok(std::mem::replace(slot, operation))
    }

    /// Removes and returns the operation at `index`.
    ///
    /// # Errors
    ///
    /// [`PanelError::OperationIndex`] if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<Operation, PanelError> {
        let len = self.operations.len();
        if index >= len {
            return Err(PanelError::OperationIndex { index, len });
        }
        Ok(self.operations.remove(index))
    }

    /// Absolute defining points of the operation at `index`.
    ///
    /// Empty for an unsized panel.
    ///
    /// # Errors
    ///
    /// [`PanelError::OperationIndex`] if `index` is out of range.
    pub fn resolve(&self, index: usize) -> Result<Vec<Point>, PanelError> {
        let operation = self.operations.get(index).ok_or(PanelError::OperationIndex {
            index,
            len: self.operations.len(),
        })?;
        if !self.panel.is_sized() {
            return Ok(Vec::new());
        }
        Ok(operation.resolve(&self.panel.coords()))
    }

    /// Indices of end-face holes that do not sit on a panel edge.
    ///
    /// Such holes are saved without a `Quadrant` and cannot be drilled.
    pub fn face_hole_issues(&self) -> Vec<usize> {
        if !self.panel.is_sized() {
            return Vec::new();
        }
        let coords = self.panel.coords();
        self.operations
            .iter()
            .enumerate()
            .filter_map(|(index, operation)| match operation {
                Operation::HorizontalHole(hole) => {
                    let position = Point::new(coords.eval(&hole.x), coords.eval(&hole.y));
                    Edge::locate(position, self.panel.length, self.panel.width)
                        .is_none()
                        .then_some(index)
                }
                _ => None,
            })
            .collect()
    }

    /// Deep copy of the current program, for an undo stack.
    pub fn snapshot(&self) -> PanelDocument {
        PanelDocument::new(self.panel.clone(), self.operations.clone())
    }

    /// Restores a previously taken snapshot, keeping the file path.
    pub fn restore(&mut self, snapshot: PanelDocument) {
        let (panel, operations) = snapshot.into_parts();
        self.panel = panel;
        self.operations = operations;
    }
}
