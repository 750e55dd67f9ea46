//! Pathfinding on 2D grids.
//!
//! [`PathRange`] is a reusable A* workspace: it owns its node array, open
//! set and scratch buffers, so repeated searches (one per monster per turn,
//! or one per animation frame) do not allocate proportionally to the map
//! size. The search graph is described by the caller through
//! [`AstarPather`]; [`neighbors`] provides the usual 4-way and 8-way
//! enumerations in a fixed order, and [`manhattan`] / [`chebyshev`] are the
//! matching admissible estimates.
//!
//! ```
//! use gruid_core::{Point, Range};
//! use gruid_paths::{AstarPather, PathRange, manhattan, neighbors};
//!
//! struct Open(Range);
//!
//! impl AstarPather for Open {
//!     fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
//!         buf.extend(neighbors::cardinal(p, |q| self.0.contains(q)));
//!     }
//!     fn cost(&self, _from: Point, _to: Point) -> i32 {
//!         1
//!     }
//!     fn estimate(&self, from: Point, to: Point) -> i32 {
//!         manhattan(from, to)
//!     }
//! }
//!
//! let rng = Range::new(0, 0, 10, 10);
//! let mut pr = PathRange::new(rng);
//! let path = pr.astar_path(&Open(rng), Point::new(0, 0), Point::new(9, 9)).unwrap();
//! assert_eq!(path.len(), 19);
//! ```

mod astar;
mod distance;
pub mod neighbors;
mod pathrange;
mod traits;

pub use distance::{chebyshev, manhattan};
pub use neighbors::Neighbors;
pub use pathrange::PathRange;
pub use traits::AstarPather;
