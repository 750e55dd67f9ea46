//! Neighbor enumeration in a fixed, reproducible order.
//!
//! Cardinal neighbors come first (north, east, south, west), then diagonals
//! (north-east, south-east, south-west, north-west). Given the same `keep`
//! predicate, results are identical from run to run, which keeps searches
//! built on top of them deterministic.

use gruid_core::Point;

pub const NORTH: Point = Point::new(0, -1);
pub const EAST: Point = Point::new(1, 0);
pub const SOUTH: Point = Point::new(0, 1);
pub const WEST: Point = Point::new(-1, 0);

/// Unit steps to the four axis-aligned neighbors: N, E, S, W.
pub const CARDINAL: [Point; 4] = [NORTH, EAST, SOUTH, WEST];

/// Unit steps to the four diagonal neighbors: NE, SE, SW, NW.
pub const DIAGONAL: [Point; 4] = [
    Point::new(1, -1),
    Point::new(1, 1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// The cardinal neighbors of `p` for which `keep` returns `true`.
pub fn cardinal<F>(p: Point, keep: F) -> impl Iterator<Item = Point>
where
    F: Fn(Point) -> bool,
{
    CARDINAL.into_iter().map(move |d| p + d).filter(move |q| keep(*q))
}

/// All eight neighbors of `p` for which `keep` returns `true`, cardinals first.
pub fn all<F>(p: Point, keep: F) -> impl Iterator<Item = Point>
where
    F: Fn(Point) -> bool,
{
    CARDINAL
        .into_iter()
        .chain(DIAGONAL)
        .map(move |d| p + d)
        .filter(move |q| keep(*q))
}

/// Whether the step `from → to` changes both coordinates.
#[inline]
pub fn is_diagonal(from: Point, to: Point) -> bool {
    from.x != to.x && from.y != to.y
}

/// Neighbor helper with a cached buffer, for callers that want a slice
/// without allocating on each query.
#[derive(Debug, Default)]
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Cardinal neighbors of `p` kept by `keep`. See [`cardinal`].
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(cardinal(p, keep));
        &self.buf
    }

    /// All neighbors of `p` kept by `keep`. See [`all`].
    pub fn all(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        self.buf.extend(all(p, keep));
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gruid_core::Range;

    #[test]
    fn cardinal_order_is_n_e_s_w() {
        let p = Point::new(5, 5);
        let got: Vec<_> = cardinal(p, |_| true).collect();
        assert_eq!(
            got,
            vec![
                Point::new(5, 4),
                Point::new(6, 5),
                Point::new(5, 6),
                Point::new(4, 5),
            ]
        );
    }

    #[test]
    fn all_lists_cardinals_then_diagonals() {
        let p = Point::new(0, 0);
        let got: Vec<_> = all(p, |_| true).collect();
        assert_eq!(got.len(), 8);
        assert_eq!(&got[..4], &CARDINAL);
        assert_eq!(&got[4..], &DIAGONAL);
        assert!(got[..4].iter().all(|&q| !is_diagonal(p, q)));
        assert!(got[4..].iter().all(|&q| is_diagonal(p, q)));
    }

    #[test]
    fn predicate_filters_out_of_range() {
        let rng = Range::new(0, 0, 3, 3);
        let corner = Point::new(0, 0);
        let got: Vec<_> = all(corner, |q| rng.contains(q)).collect();
        assert_eq!(
            got,
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn cached_helper_matches_iterators() {
        let mut nb = Neighbors::new();
        let p = Point::new(2, 2);
        let keep = |q: Point| q.x != 3;
        let expected: Vec<_> = all(p, keep).collect();
        assert_eq!(nb.all(p, keep), expected.as_slice());
        let expected: Vec<_> = cardinal(p, keep).collect();
        assert_eq!(nb.cardinal(p, keep), expected.as_slice());
    }
}
