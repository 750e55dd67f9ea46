//! Grid distance metrics, usable as A* heuristics.

use gruid_core::Point;

/// Manhattan (L1) distance. Admissible for 4-way movement with unit cost.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Chebyshev (L∞) distance. Admissible for 8-way movement with unit cost.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_on_offsets() {
        let a = Point::new(1, 1);
        assert_eq!(manhattan(a, Point::new(4, -1)), 5);
        assert_eq!(chebyshev(a, Point::new(4, -1)), 3);
        assert_eq!(manhattan(a, a), 0);
        assert_eq!(chebyshev(a, a), 0);
        // Symmetric.
        assert_eq!(manhattan(Point::new(4, -1), a), 5);
    }
}
