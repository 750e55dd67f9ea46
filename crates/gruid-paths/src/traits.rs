use gruid_core::Point;

/// Caller-supplied view of the search graph for [`PathRange::astar_path`].
///
/// Implementations are expected to be pure functions of a map snapshot: the
/// search may call every method many times per node.
///
/// [`PathRange::astar_path`]: crate::PathRange::astar_path
pub trait AstarPather {
    /// Append the neighbors of `p` reachable in one step into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Cost of moving from `from` to the adjacent `to`. Must be non-negative
    /// and finite.
    fn cost(&self, from: Point, to: Point) -> i32;

    /// Estimated remaining cost from `from` to `to`.
    ///
    /// The search stays correct with any finite estimate; it returns a
    /// shortest path only when the estimate never overestimates.
    fn estimate(&self, from: Point, to: Point) -> i32;
}
