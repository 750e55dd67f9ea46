//! Roguelike utilities for gruid: map grid, field of vision, cave
//! generation.
//!
//! ```
//! use gruid_core::Point;
//! use gruid_rl::{Cell, FourDirectionWalker, Grid, MapGen};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! const GROUND: Cell = Cell(1);
//!
//! let mut mg = MapGen::with_grid(Grid::new(40, 20), StdRng::seed_from_u64(7));
//! let carved = mg.random_walk_cave(&FourDirectionWalker, GROUND, 0.25, 4);
//! assert_eq!(carved, 200);
//! assert_eq!(mg.grid.at(Point::new(20, 10)), GROUND);
//! ```

pub mod fov;
pub mod grid;
pub mod mapgen;

pub use fov::{FOV, LightNode, Lighter};
pub use grid::{Cell, Grid, GridError, GridIter};
pub use mapgen::{BiasedWalker, CellularAutomataRule, FourDirectionWalker, MapGen, RandomWalker};
