//! Panel edges and the two proximity tests that use them.
//!
//! The codec needs an exact match (within [`QUADRANT_TOLERANCE`]) to encode the
//! `Quadrant` of an end-face hole. Drawing is looser and snaps a hole to an
//! edge within [`EDGE_SNAP_TOLERANCE`].

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Distance (mm) within which an end-face hole counts as on an edge when
/// its `Quadrant` is written.
pub const QUADRANT_TOLERANCE: f64 = 0.1;

/// Distance (mm) within which an end-face hole is drawn from an edge.
pub const EDGE_SNAP_TOLERANCE: f64 = 10.0;

/// One of the four panel edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// `x = L`, quadrant 1.
    FarX,
    /// `x = 0`, quadrant 2.
    NearX,
    /// `y = W`, quadrant 3.
    FarY,
    /// `y = 0`, quadrant 4.
    NearY,
}

impl Edge {
    /// Controller `Quadrant` code.
    pub const fn quadrant(self) -> u8 {
        match self {
            Self::FarX => 1,
            Self::NearX => 2,
            Self::FarY => 3,
            Self::NearY => 4,
        }
    }

    /// Unit vector pointing from the edge into the panel.
    pub const fn inward(self) -> (f64, f64) {
        match self {
            Self::FarX => (-1.0, 0.0),
            Self::NearX => (1.0, 0.0),
            Self::FarY => (0.0, -1.0),
            Self::NearY => (0.0, 1.0),
        }
    }

    /// Edge the point lies on within [`QUADRANT_TOLERANCE`].
    ///
    /// Checked in the order `x = 0`, `x = L`, `y = 0`, `y = W`, so a corner
    /// resolves to an X edge.
    pub fn locate(point: Point, length: f64, width: f64) -> Option<Self> {
        if point.x.abs() < QUADRANT_TOLERANCE {
            Some(Self::NearX)
        } else if (point.x - length).abs() < QUADRANT_TOLERANCE {
            Some(Self::FarX)
        } else if point.y.abs() < QUADRANT_TOLERANCE {
            Some(Self::NearY)
        } else if (point.y - width).abs() < QUADRANT_TOLERANCE {
            Some(Self::FarY)
        } else {
            None
        }
    }

    /// Edge the point is drawn from, within `tolerance` on the inner side.
    ///
    /// Checked in the order `x < tol`, `x > L - tol`, `y < tol`, `y > W - tol`.
    /// Points outside the panel near an edge also snap to it.
    pub fn snap(point: Point, length: f64, width: f64, tolerance: f64) -> Option<Self> {
        if point.x < tolerance {
            Some(Self::NearX)
        } else if point.x > length - tolerance {
            Some(Self::FarX)
        } else if point.y < tolerance {
            Some(Self::NearY)
        } else if point.y > width - tolerance {
            Some(Self::FarY)
        } else {
            None
        }
    }
}
