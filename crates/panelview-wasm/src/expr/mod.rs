//! Coordinate expression evaluation.
//!
//! Coordinate fields are stored as text and may hold plain numbers, comma
//! decimals, far-edge offsets (`-10`) or formulas over the panel length `L`
//! and width `W`. This module turns that text into absolute millimetres.

pub mod coord;
pub mod eval;

pub use coord::{parse_coord, Axis, CoordContext};
pub use eval::{evaluate, try_evaluate};
