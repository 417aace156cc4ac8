//! In-memory panel program: the panel, its operations and the edit session.

pub mod edge;
pub mod session;
pub mod types;

pub use edge::{Edge, EDGE_SNAP_TOLERANCE, QUADRANT_TOLERANCE};
pub use session::EditSession;
pub use types::*;
