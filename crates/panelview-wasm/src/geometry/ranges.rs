//! Per-operation index range tracking.
//!
//! Records which span of the triangle index buffer each drawn item occupies,
//! so the renderer can colour by category and the shell can highlight or
//! hit-test a single operation.

use super::types::{DrawCategory, DrawingGeometry, GeometryBuilder, OperationRange};

#[derive(Debug, Clone, Copy)]
struct OpenRange {
    operation: Option<usize>,
    category: DrawCategory,
    index_start: u32,
}

/// Tracks the currently drawn item and accumulates closed ranges.
#[derive(Debug, Default)]
pub struct RangeTracker {
    open: Option<OpenRange>,
    ranges: Vec<OperationRange>,
}

impl RangeTracker {
    /// Creates a tracker with no open range.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open: None,
            ranges: Vec::new(),
        }
    }

    /// Starts a new item at the builder's current index count.
    ///
    /// Any range still open is closed first.
    pub fn begin(
        &mut self,
        operation: Option<usize>,
        category: DrawCategory,
        builder: &GeometryBuilder,
    ) {
        self.end(builder);
        self.open = Some(OpenRange {
            operation,
            category,
            index_start: builder.index_count(),
        });
    }

    /// Closes the open range. Items that emitted no triangles are dropped.
    pub fn end(&mut self, builder: &GeometryBuilder) {
        let Some(open) = self.open.take() else {
            return;
        };

        let index_end = builder.index_count();
        if index_end > open.index_start {
            self.ranges.push(OperationRange {
                operation: open.operation,
                category: open.category,
                index_start: open.index_start,
                index_end,
            });
        }
    }

    /// Closes any open range and returns everything recorded.
    #[must_use]
    pub fn finish(mut self, builder: &GeometryBuilder) -> Vec<OperationRange> {
        self.end(builder);
        self.ranges
    }
}

/// Attaches tracked ranges to a built drawing and counts drawn operations.
pub fn apply_ranges(geometry: &mut DrawingGeometry, ranges: Vec<OperationRange>) {
    let mut operations: Vec<usize> = ranges.iter().filter_map(|r| r.operation).collect();
    operations.dedup();
    geometry.operation_count = super::types::saturate_u32(operations.len());
    geometry.ranges = ranges;
}
