//! Map generation algorithms for roguelike games.
//!
//! Provides two cave generators:
//! - **Random Walk Cave**: a drunk walk carves connected open space.
//! - **Cellular Automata Cave**: random noise smoothed by neighbor-count
//!   rules into organic cave shapes.

use gruid_core::Point;
use gruid_paths::neighbors::{CARDINAL, EAST, NORTH, SOUTH, WEST};
use rand::{Rng, RngExt};

use crate::grid::{Cell, Grid};

/// Chooses the next position of a random walk.
pub trait RandomWalker {
    /// Given a position `p`, return a random neighbor using `rng`. The
    /// returned point may lie outside the map; the walk then stays put.
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point;
}

/// Uniform 4-directional walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct FourDirectionWalker;

impl RandomWalker for FourDirectionWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point {
        p + CARDINAL[rng.random_range(0..CARDINAL.len())]
    }
}

/// 4-directional walker with separate weights for horizontal and vertical
/// steps. The default favors horizontal steps 2:1, for maps wider than
/// tall.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BiasedWalker {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for BiasedWalker {
    fn default() -> Self {
        Self {
            horizontal: 2,
            vertical: 1,
        }
    }
}

impl RandomWalker for BiasedWalker {
    fn neighbor(&self, p: Point, rng: &mut impl Rng) -> Point {
        let h = u64::from(self.horizontal);
        let v = u64::from(self.vertical);
        let total = 2 * (h + v);
        if total == 0 {
            return p;
        }
        let r = rng.random_range(0..total);
        let d = if r < h {
            EAST
        } else if r < 2 * h {
            WEST
        } else if r < 2 * h + v {
            SOUTH
        } else {
            NORTH
        };
        p + d
    }
}

/// A rule for one stage of cellular automata smoothing.
///
/// Wall counts are taken over the 3×3 and 5×5 windows centered on a
/// position, the position itself included (9 and 25 cells). A cell becomes
/// a wall if `walls1 >= w_cutoff1` or `walls2 <= w_cutoff2`, and ground
/// otherwise. A negative `w_cutoff2` disables the second test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellularAutomataRule {
    pub w_cutoff1: i32,
    pub w_cutoff2: i32,
    /// Whether positions outside the grid count as walls.
    pub walls_out_of_range: bool,
    /// Maximum number of successive passes of this rule.
    pub reps: usize,
}

impl Default for CellularAutomataRule {
    fn default() -> Self {
        Self {
            w_cutoff1: 5,
            w_cutoff2: 2,
            walls_out_of_range: true,
            reps: 4,
        }
    }
}

/// Map generator operating on a [`Grid`] of [`Cell`] values.
///
/// The generator owns its grid and random source. Seeding the source makes
/// every generation method deterministic.
#[derive(Debug)]
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub grid: Grid,
}

impl<R: Rng> MapGen<R> {
    /// Create a new generator for `grid`.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Self { rng, grid }
    }

    /// Consume the generator, returning the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Generate a cave by random walks starting at the grid's center.
    ///
    /// See [`random_walk_cave_from`](Self::random_walk_cave_from).
    pub fn random_walk_cave(
        &mut self,
        walker: &impl RandomWalker,
        cell: Cell,
        fill_pct: f64,
        walks: usize,
    ) -> usize {
        let start = self.grid.range().center();
        self.random_walk_cave_from(walker, start, cell, fill_pct, walks)
    }

    /// Generate a cave by random walks, the first one starting at `start`.
    ///
    /// Walks set the cells they visit to `cell` until `fill_pct` of the grid
    /// area has been carved. Each walk carves its share of the target, then
    /// the next one restarts from a random cell carved so far, so the carved
    /// area stays 4-connected. A walk gives up after `4 * area` steps.
    ///
    /// Cells already equal to `cell` are not counted. Returns the number of
    /// cells carved, 0 when `walks` is 0 or `start` is outside the grid.
    pub fn random_walk_cave_from(
        &mut self,
        walker: &impl RandomWalker,
        start: Point,
        cell: Cell,
        fill_pct: f64,
        walks: usize,
    ) -> usize {
        let area = self.grid.len();
        if walks == 0 || !self.grid.contains(start) {
            return 0;
        }
        let fill_pct = if fill_pct.is_nan() {
            0.0
        } else {
            fill_pct.clamp(0.0, 1.0)
        };
        let target = (area as f64 * fill_pct) as usize;
        let quota = target.div_ceil(walks);
        let max_steps = area * 4;

        let mut carved = 0;
        let mut trail: Vec<Point> = Vec::with_capacity(target);
        for walk in 0..walks {
            if carved >= target {
                break;
            }
            let goal = (carved + quota).min(target);
            let mut pos = if walk == 0 || trail.is_empty() {
                start
            } else {
                trail[self.rng.random_range(0..trail.len())]
            };
            for _ in 0..max_steps {
                if self.grid.at(pos) != cell {
                    self.grid.set(pos, cell);
                    trail.push(pos);
                    carved += 1;
                    if carved >= goal {
                        break;
                    }
                }
                let next = walker.neighbor(pos, &mut self.rng);
                if self.grid.contains(next) {
                    pos = next;
                }
            }
        }

        if carved < target {
            log::debug!("random walk cave: carved {carved} of {target} cells, step limit reached");
        } else {
            log::debug!("random walk cave: carved {carved} cells in {walks} walks");
        }
        carved
    }

    /// Generate a cave with cellular automata.
    ///
    /// Each cell is first set to `wall` with probability `wall_init_pct` and
    /// to `ground` otherwise, then the `rules` are applied in order. Returns
    /// the number of ground cells in the final grid.
    pub fn cellular_automata_cave(
        &mut self,
        wall: Cell,
        ground: Cell,
        wall_init_pct: f64,
        rules: &[CellularAutomataRule],
    ) -> usize {
        self.fill_random(wall, ground, wall_init_pct);
        let passes = self.apply_rules(wall, ground, rules);
        let n = self.grid.count(ground);
        log::debug!(
            "cellular automata cave: {n} ground cells of {} after {passes} passes",
            self.grid.len()
        );
        n
    }

    /// Set every cell to `wall` with probability `wall_pct`, and to `ground`
    /// otherwise.
    pub fn fill_random(&mut self, wall: Cell, ground: Cell, wall_pct: f64) {
        let rng = &mut self.rng;
        self.grid.fill_fn(|_| {
            let r: f64 = rng.random();
            if r < wall_pct { wall } else { ground }
        });
    }

    /// Apply cellular automata `rules` to the current grid.
    ///
    /// Every pass computes the next state of all cells from the previous
    /// state. A rule stops before its `reps` are exhausted once a pass
    /// changes no cell. Returns the number of passes computed.
    pub fn apply_rules(&mut self, wall: Cell, ground: Cell, rules: &[CellularAutomataRule]) -> usize {
        let range = self.grid.range();
        let mut next = Vec::with_capacity(self.grid.len());
        let mut passes = 0;
        for rule in rules {
            for _ in 0..rule.reps {
                passes += 1;
                next.clear();
                next.extend(range.iter().map(|p| {
                    let (walls1, walls2) = self.count_walls(p, wall, rule.walls_out_of_range);
                    if walls1 >= rule.w_cutoff1 || walls2 <= rule.w_cutoff2 {
                        wall
                    } else {
                        ground
                    }
                }));
                let cells = self.grid.cells_mut();
                let changed = cells.iter().zip(&next).filter(|(a, b)| a != b).count();
                cells.copy_from_slice(&next);
                if changed == 0 {
                    log::trace!("cellular automata: rule {rule:?} stable after {passes} passes");
                    break;
                }
            }
        }
        passes
    }

    /// Wall counts within distance 1 and 2 of `p`, `p` included.
    fn count_walls(&self, p: Point, wall: Cell, walls_out_of_range: bool) -> (i32, i32) {
        let mut walls1 = 0;
        let mut walls2 = 0;
        for dy in -2..=2 {
            for dx in -2..=2 {
                let is_wall = match self.grid.get(p.shift(dx, dy)) {
                    Some(c) => c == wall,
                    None => walls_out_of_range,
                };
                if is_wall {
                    walls2 += 1;
                    if dx.abs() <= 1 && dy.abs() <= 1 {
                        walls1 += 1;
                    }
                }
            }
        }
        (walls1, walls2)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const WALL: Cell = Cell(0);
    const GROUND: Cell = Cell(1);

    fn walls(w: i32, h: i32) -> Grid {
        let mut g = Grid::new(w, h);
        g.fill(WALL);
        g
    }

    #[test]
    fn walkers_take_unit_steps() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = Point::new(3, 3);
        for _ in 0..100 {
            let q = FourDirectionWalker.neighbor(p, &mut rng);
            assert_eq!((q - p).abs().x + (q - p).abs().y, 1);
            let q = BiasedWalker::default().neighbor(p, &mut rng);
            assert_eq!((q - p).abs().x + (q - p).abs().y, 1);
        }
        let still = BiasedWalker {
            horizontal: 0,
            vertical: 0,
        };
        assert_eq!(still.neighbor(p, &mut rng), p);
    }

    #[test]
    fn biased_walker_prefers_horizontal_steps() {
        let mut rng = StdRng::seed_from_u64(11);
        let walker = BiasedWalker::default();
        let horizontal = (0..3000)
            .filter(|_| walker.neighbor(Point::ZERO, &mut rng).y == 0)
            .count();
        assert!((1700..2300).contains(&horizontal), "{horizontal}");
    }

    #[test]
    fn random_walk_reaches_fill_target() {
        let mut mg = MapGen::with_grid(walls(20, 20), StdRng::seed_from_u64(1));
        let carved = mg.random_walk_cave(&FourDirectionWalker, GROUND, 0.4, 4);
        assert_eq!(carved, 160);
        assert_eq!(mg.grid.count(GROUND), 160);
        assert_eq!(mg.grid.at(Point::new(10, 10)), GROUND);
    }

    #[test]
    fn random_walk_is_deterministic_for_a_seed() {
        let gen_map = |seed| {
            let mut mg = MapGen::with_grid(walls(30, 12), StdRng::seed_from_u64(seed));
            let n = mg.random_walk_cave(&BiasedWalker::default(), GROUND, 0.35, 5);
            (n, mg.into_grid())
        };
        assert_eq!(gen_map(42), gen_map(42));
    }

    #[test]
    fn random_walk_degenerate_inputs() {
        let mut mg = MapGen::with_grid(walls(10, 10), StdRng::seed_from_u64(3));
        assert_eq!(mg.random_walk_cave(&FourDirectionWalker, GROUND, 0.5, 0), 0);
        assert_eq!(mg.random_walk_cave(&FourDirectionWalker, GROUND, 0.0, 3), 0);
        assert_eq!(mg.random_walk_cave(&FourDirectionWalker, GROUND, f64::NAN, 3), 0);
        assert_eq!(
            mg.random_walk_cave_from(&FourDirectionWalker, Point::new(-1, 0), GROUND, 0.5, 3),
            0
        );
        assert_eq!(mg.grid.count(GROUND), 0);

        let mut empty = MapGen::with_grid(Grid::new(0, 0), StdRng::seed_from_u64(3));
        assert_eq!(empty.random_walk_cave(&FourDirectionWalker, GROUND, 0.5, 3), 0);
    }

    #[test]
    fn random_walk_from_corner() {
        let mut mg = MapGen::with_grid(walls(15, 15), StdRng::seed_from_u64(9));
        let carved =
            mg.random_walk_cave_from(&FourDirectionWalker, Point::ZERO, GROUND, 0.2, 2);
        assert_eq!(carved, 45);
        assert_eq!(mg.grid.at(Point::ZERO), GROUND);
    }

    #[test]
    fn zero_reps_keeps_initial_noise() {
        let rule = CellularAutomataRule {
            reps: 0,
            ..Default::default()
        };
        let mut a = MapGen::with_grid(Grid::new(20, 15), StdRng::seed_from_u64(5));
        a.cellular_automata_cave(WALL, GROUND, 0.45, &[rule]);
        let mut b = MapGen::with_grid(Grid::new(20, 15), StdRng::seed_from_u64(5));
        b.fill_random(WALL, GROUND, 0.45);
        assert_eq!(a.grid, b.grid);
        let walls = a.grid.count(WALL);
        assert!(walls > 0 && walls < 300);
    }

    #[test]
    fn all_walls_is_a_fixed_point() {
        let mut mg = MapGen::with_grid(walls(12, 8), StdRng::seed_from_u64(0));
        let passes = mg.apply_rules(WALL, GROUND, &[CellularAutomataRule::default()]);
        assert_eq!(passes, 1);
        assert_eq!(mg.grid.count(WALL), 96);
    }

    #[test]
    fn isolated_ground_fills_in_then_converges() {
        let mut g = walls(7, 7);
        g.set(Point::new(3, 3), GROUND);
        let mut mg = MapGen::with_grid(g, StdRng::seed_from_u64(0));
        let rule = CellularAutomataRule {
            reps: 10,
            ..Default::default()
        };
        assert_eq!(mg.apply_rules(WALL, GROUND, &[rule]), 2);
        assert_eq!(mg.grid.count(GROUND), 0);
    }

    #[test]
    fn oscillation_stops_at_reps() {
        let mut g = Grid::new(10, 10);
        g.fill_fn(|p| if p.x % 2 == 0 { WALL } else { GROUND });
        let mut mg = MapGen::with_grid(g, StdRng::seed_from_u64(0));
        let rule = CellularAutomataRule {
            walls_out_of_range: false,
            reps: 3,
            ..Default::default()
        };
        assert_eq!(mg.apply_rules(WALL, GROUND, &[rule]), 3);
        // Interior stripes flip on every pass.
        assert_eq!(mg.grid.at(Point::new(4, 5)), GROUND);
        assert_eq!(mg.grid.at(Point::new(5, 5)), WALL);
    }

    #[test]
    fn default_rule_settles_on_noise() {
        let rule = CellularAutomataRule {
            reps: 1,
            ..Default::default()
        };
        let settle = CellularAutomataRule::default().reps;
        for seed in 0..5 {
            let mut mg = MapGen::with_grid(Grid::new(40, 25), StdRng::seed_from_u64(seed));
            mg.fill_random(WALL, GROUND, 0.45);
            let mut changes = Vec::new();
            let mut grounds = Vec::new();
            for _ in 0..20 {
                let before = mg.grid.clone();
                mg.apply_rules(WALL, GROUND, &[rule]);
                let changed = before
                    .iter()
                    .zip(mg.grid.iter())
                    .filter(|(a, b)| a.1 != b.1)
                    .count();
                changes.push(changed);
                grounds.push(mg.grid.count(GROUND));
            }
            let first = changes[0];
            assert!(first > 100, "seed {seed}: first pass changed {first}");
            for (i, &c) in changes.iter().enumerate().skip(settle) {
                assert!(c * 4 < first, "seed {seed}: pass {i} changed {c} of {first}");
            }
            let tail = &grounds[settle..];
            let spread = tail.iter().max().unwrap() - tail.iter().min().unwrap();
            assert!(spread < 60, "seed {seed}: ground count spread {spread}");
        }
    }

    #[test]
    fn random_walk_gives_up_when_stuck() {
        let stuck = BiasedWalker {
            horizontal: 0,
            vertical: 0,
        };
        let mut mg = MapGen::with_grid(walls(10, 10), StdRng::seed_from_u64(4));
        let carved = mg.random_walk_cave(&stuck, GROUND, 0.5, 3);
        assert_eq!(carved, 1);
        assert_eq!(mg.grid.count(GROUND), 1);
        assert_eq!(mg.grid.at(Point::new(5, 5)), GROUND);
    }

    #[test]
    fn restarts_never_carve_past_target() {
        for walks in [2, 7, 50, 200] {
            let mut mg = MapGen::with_grid(walls(10, 10), StdRng::seed_from_u64(walks as u64));
            let carved = mg.random_walk_cave(&FourDirectionWalker, GROUND, 0.5, walks);
            assert!(carved <= 50, "{walks} walks carved {carved}");
            assert_eq!(mg.grid.count(GROUND), carved);
            if walks >= 7 {
                assert_eq!(carved, 50, "{walks} walks");
            }
        }
    }

    #[test]
    fn cellular_automata_cave_is_mixed_and_deterministic() {
        let rules = [
            CellularAutomataRule::default(),
            CellularAutomataRule {
                w_cutoff2: -1,
                reps: 3,
                ..Default::default()
            },
        ];
        let gen_map = || {
            let mut mg = MapGen::with_grid(Grid::new(40, 25), StdRng::seed_from_u64(2024));
            let n = mg.cellular_automata_cave(WALL, GROUND, 0.45, &rules);
            (n, mg.into_grid())
        };
        let (n, grid) = gen_map();
        assert!(n > 100 && n < 900, "{n} ground cells");
        assert_eq!(grid.count(GROUND), n);
        assert_eq!((n, grid), gen_map());
    }
}
