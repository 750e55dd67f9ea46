use gruid_core::Point;

use crate::PathRange;
use crate::pathrange::NO_PARENT;
use crate::traits::AstarPather;

impl PathRange {
    /// Compute a path from `from` to `to` using A*.
    ///
    /// Returns the full path, both endpoints included, or `None` if `to`
    /// cannot be reached or either endpoint lies outside the range. When
    /// `from == to` the path is that single point.
    ///
    /// Nodes with equal `g + h` are expanded in the order they were pushed,
    /// so identical inputs always produce identical paths. A node reached
    /// again at a strictly lower cost is reopened: with an inconsistent
    /// estimate the path may not be the shortest, but it is always a valid
    /// chain of [`neighbors`](AstarPather::neighbors) steps.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Option<Vec<Point>> {
        let start = self.idx(from)?;
        let goal = self.idx(to)?;
        let generation = self.begin_search();

        if start == goal {
            return Some(vec![from]);
        }

        {
            let n = &mut self.nodes[start];
            n.g = 0;
            n.parent = NO_PARENT;
            n.generation = generation;
            n.closed = false;
        }
        self.push_open(start, 0, pather.estimate(from, to));

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = loop {
            let Some(entry) = self.open.pop() else {
                break false;
            };
            let ci = entry.idx;
            let node = &self.nodes[ci];
            if node.closed || node.g != entry.g {
                // Superseded by a cheaper entry for the same point.
                continue;
            }
            if ci == goal {
                break true;
            }
            self.nodes[ci].closed = true;
            self.expanded += 1;

            let cp = self.point(ci);
            nbuf.clear();
            pather.neighbors(cp, &mut nbuf);

            for &np in &nbuf {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let g = entry.g.saturating_add(pather.cost(cp, np));
                let n = &mut self.nodes[ni];
                if n.generation == generation && g >= n.g {
                    continue;
                }
                n.generation = generation;
                n.g = g;
                n.parent = ci;
                n.closed = false;
                let f = g.saturating_add(pather.estimate(np, to));
                self.push_open(ni, g, f);
            }
        };

        self.nbuf = nbuf;

        if !found {
            log::trace!(
                "astar: no path {from} -> {to} after {} expansions",
                self.expanded
            );
            return None;
        }

        let mut path = Vec::new();
        let mut ci = goal;
        // Parent links form a tree for non-negative costs; the bound only
        // matters for callers breaking that contract.
        for _ in 0..self.nodes.len() {
            path.push(self.point(ci));
            ci = self.nodes[ci].parent;
            if ci == NO_PARENT {
                break;
            }
        }
        path.reverse();
        Some(path)
    }
}
