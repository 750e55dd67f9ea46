//! **gruid-core**: geometry primitives for grid-based games.
//!
//! Everything in the gruid spatial crates is addressed by an integer
//! [`Point`] and bounded by a half-open [`Range`]. Flat per-cell buffers
//! (map grids, pathfinding nodes, vision nodes) map points to offsets through
//! [`Range::offset`] and back through [`Range::point_at`].

pub mod geom;

pub use geom::{Point, Range, RangeIter};
