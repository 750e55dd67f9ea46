//! Field of Vision.
//!
//! [`FOV::vision_map`] propagates light from a source outward over a local
//! range, Dijkstra-style: every point receives the smallest accumulated
//! [`Lighter::cost`] of a light path from the source, and points whose cost
//! stays below the maximum radius are visible. Light may step diagonally,
//! except through a gap between two occluding orthogonal cells:
//!
//! ```text
//!  # .        light from @ does not reach the `.` above-right,
//!  @ #        because both cells flanking the diagonal step occlude.
//! ```
//!
//! The FOV keeps its node storage between calls. When the observer moves,
//! [`FOV::translate`] shifts the range along without reallocating.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gruid_core::{Point, Range};
use gruid_paths::neighbors::{CARDINAL, DIAGONAL};

/// A point reached by light, with its accumulated cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightNode {
    pub pos: Point,
    pub cost: i32,
}

/// Caller-supplied light propagation rules.
pub trait Lighter {
    /// Cost for light from source `src` to pass from `from` to the adjacent
    /// `to`.
    ///
    /// Costs should be non-negative; a negative cost blocks the step. The
    /// usual rule charges 1 per step and a prohibitive cost when `from` is
    /// an opaque cell other than `src`, so that walls are lit but not seen
    /// through.
    fn cost(&self, src: Point, from: Point, to: Point) -> i32;

    /// Whether `p` occludes diagonal steps that pass between it and another
    /// occluding cell. Called for points that may lie outside the FOV range.
    fn occludes(&self, p: Point) -> bool;
}

const NO_PARENT: usize = usize::MAX;

#[derive(Debug, Clone)]
struct VisionNode {
    cost: i32,
    parent: usize,
    origin: Point,
    generation: u32,
}

impl Default for VisionNode {
    fn default() -> Self {
        Self {
            cost: 0,
            parent: NO_PARENT,
            origin: Point::ZERO,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LightEntry {
    cost: i32,
    seq: u32,
    idx: usize,
}

impl Ord for LightEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for LightEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Field of Vision computation over a local [`Range`].
#[derive(Debug)]
pub struct FOV {
    range: Range,
    nodes: Vec<VisionNode>,
    generation: u32,
    queue: BinaryHeap<LightEntry>,
    seq: u32,
    max_radius: i32,
    /// Visible nodes of the last computation, in non-decreasing cost order.
    lighted: Vec<LightNode>,
    ray_cache: Vec<LightNode>,
}

impl FOV {
    /// Create a new FOV for the given range.
    pub fn new(range: Range) -> Self {
        Self {
            range,
            nodes: vec![VisionNode::default(); range.len()],
            generation: 0,
            queue: BinaryHeap::new(),
            seq: 0,
            max_radius: 0,
            lighted: Vec::new(),
            ray_cache: Vec::new(),
        }
    }

    /// Change the range. Storage is kept when the new range fits in the
    /// current capacity. Previous results are discarded.
    pub fn set_range(&mut self, range: Range) {
        self.range = range;
        if range.len() > self.nodes.len() {
            self.nodes.clear();
            self.nodes.resize(range.len(), VisionNode::default());
            self.generation = 0;
        }
        self.invalidate();
    }

    /// Move the range by `delta`, typically the observer's last step.
    /// Previous results are discarded; storage is kept.
    pub fn translate(&mut self, delta: Point) {
        self.range = self.range + delta;
        self.invalidate();
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Maximum radius used by the last computation.
    #[inline]
    pub fn max_radius(&self) -> i32 {
        self.max_radius
    }

    fn invalidate(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            for n in &mut self.nodes {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.lighted.clear();
        self.ray_cache.clear();
        self.generation
    }

    fn push(&mut self, idx: usize, cost: i32) {
        self.queue.push(LightEntry {
            cost,
            seq: self.seq,
            idx,
        });
        self.seq = self.seq.wrapping_add(1);
    }

    /// Recorded node at `p` for the current computation.
    fn node(&self, p: Point) -> Option<&VisionNode> {
        let n = &self.nodes[self.range.offset(p)?];
        (n.generation == self.generation).then_some(n)
    }

    /// Compute the field of vision from `src`.
    ///
    /// Returns the visible nodes (cost `< max_radius`) in non-decreasing
    /// cost order, the source first with cost 0. The result is empty when
    /// `src` is outside the range or `max_radius <= 0`.
    pub fn vision_map<L: Lighter>(&mut self, lt: &L, src: Point, max_radius: i32) -> &[LightNode] {
        self.light_map(lt, &[src], max_radius)
    }

    /// Compute a light map from several sources at once.
    ///
    /// Each point is lit by the source giving it the lowest cost, and step
    /// costs along that path are queried with that source as `src`. Sources
    /// outside the range are ignored.
    pub fn light_map<L: Lighter>(
        &mut self,
        lt: &L,
        srcs: &[Point],
        max_radius: i32,
    ) -> &[LightNode] {
        let generation = self.invalidate();
        self.queue.clear();
        self.seq = 0;
        self.max_radius = max_radius;
        if max_radius <= 0 {
            return &self.lighted;
        }

        for &src in srcs {
            let Some(i) = self.range.offset(src) else {
                continue;
            };
            if self.nodes[i].generation == generation {
                continue;
            }
            self.nodes[i] = VisionNode {
                cost: 0,
                parent: NO_PARENT,
                origin: src,
                generation,
            };
            self.push(i, 0);
        }

        while let Some(entry) = self.queue.pop() {
            let node = &self.nodes[entry.idx];
            if node.cost != entry.cost {
                continue;
            }
            let origin = node.origin;
            let from = self.range.point_at(entry.idx);
            self.lighted.push(LightNode {
                pos: from,
                cost: entry.cost,
            });

            for d in CARDINAL.into_iter().chain(DIAGONAL) {
                let to = from + d;
                let Some(ti) = self.range.offset(to) else {
                    continue;
                };
                let cost = if d.x != 0
                    && d.y != 0
                    && lt.occludes(Point::new(to.x, from.y))
                    && lt.occludes(Point::new(from.x, to.y))
                {
                    max_radius
                } else {
                    let step = lt.cost(origin, from, to);
                    if step < 0 {
                        max_radius
                    } else {
                        entry.cost.saturating_add(step).min(max_radius)
                    }
                };
                let t = &mut self.nodes[ti];
                if t.generation == generation && cost >= t.cost {
                    continue;
                }
                *t = VisionNode {
                    cost,
                    parent: entry.idx,
                    origin,
                    generation,
                };
                if cost < max_radius {
                    self.push(ti, cost);
                }
            }
        }

        log::trace!(
            "fov: {} sources, {} lit points in {}",
            srcs.len(),
            self.lighted.len(),
            self.range
        );
        &self.lighted
    }

    /// Cost recorded at `p` by the last computation, or `None` if light did
    /// not reach `p`.
    ///
    /// Points reached at the maximum radius are recorded but not visible;
    /// use [`visible`](Self::visible) for "in view" tests.
    pub fn at(&self, p: Point) -> Option<i32> {
        self.node(p).map(|n| n.cost)
    }

    /// Whether `p` was lit at a cost below the maximum radius.
    pub fn visible(&self, p: Point) -> bool {
        self.at(p).is_some_and(|c| c < self.max_radius)
    }

    /// Iterate over the visible nodes of the last computation, in
    /// non-decreasing cost order. Nodes capped at the maximum radius are
    /// left out; see [`iter_nodes`](Self::iter_nodes).
    pub fn iter_lighted(&self) -> impl Iterator<Item = LightNode> + '_ {
        self.lighted.iter().copied()
    }

    /// Iterate in row-major order over every node recorded by the last
    /// computation, including those reached at the maximum radius. Callers
    /// keep the visible ones with `cost < max_radius`.
    pub fn iter_nodes(&self) -> impl Iterator<Item = LightNode> + '_ {
        let generation = self.generation;
        self.range
            .iter()
            .zip(&self.nodes)
            .filter(move |(_, n)| n.generation == generation)
            .map(|(pos, n)| LightNode { pos, cost: n.cost })
    }

    /// Previous node on the light ray reaching `to`, or `None` if `to` was
    /// not reached or is a source.
    pub fn from(&self, to: Point) -> Option<LightNode> {
        let n = self.node(to)?;
        if n.parent == NO_PARENT {
            return None;
        }
        Some(LightNode {
            pos: self.range.point_at(n.parent),
            cost: self.nodes[n.parent].cost,
        })
    }

    /// The light ray from its source to `to`, both included.
    pub fn ray(&mut self, to: Point) -> Option<&[LightNode]> {
        let mut idx = self.range.offset(to)?;
        if self.nodes[idx].generation != self.generation {
            return None;
        }
        self.ray_cache.clear();
        for _ in 0..self.nodes.len() {
            let n = &self.nodes[idx];
            self.ray_cache.push(LightNode {
                pos: self.range.point_at(idx),
                cost: n.cost,
            });
            if n.parent == NO_PARENT {
                break;
            }
            idx = n.parent;
        }
        self.ray_cache.reverse();
        Some(&self.ray_cache)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FOV {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.range.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FOV {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let range = Range::deserialize(deserializer)?;
        Ok(FOV::new(range))
    }
}
