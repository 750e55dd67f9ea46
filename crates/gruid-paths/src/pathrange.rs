use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gruid_core::{Point, Range};

/// Parent sentinel for nodes without predecessor.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Search nodes
// ---------------------------------------------------------------------------

/// Per-point search state. Only meaningful when `generation` matches the
/// owning [`PathRange`]'s current generation.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0,
            parent: NO_PARENT,
            generation: 0,
            closed: false,
        }
    }
}

/// Open-set entry. Pops smallest `f` first, then the earliest pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub(crate) f: i32,
    pub(crate) seq: u32,
    pub(crate) g: i32,
    pub(crate) idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other.f.cmp(&self.f).then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Reusable pathfinding workspace over a grid rectangle.
///
/// `PathRange` keeps its node array, open set and neighbor buffer between
/// searches. Nodes are invalidated by bumping a generation counter rather
/// than by clearing memory, so a search on a warm workspace allocates only
/// the returned path.
///
/// A workspace serves one search at a time; use one per thread.
#[derive(Debug)]
pub struct PathRange {
    pub(crate) rng: Range,
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) open: BinaryHeap<OpenEntry>,
    pub(crate) seq: u32,
    pub(crate) expanded: usize,
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Create a new `PathRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            open: BinaryHeap::new(),
            seq: 0,
            expanded: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Replace the underlying range.
    ///
    /// Storage is kept when the new range is not larger than the current
    /// capacity; otherwise it is reallocated. Stale nodes are invalidated by
    /// the next search.
    pub fn set_range(&mut self, rng: Range) {
        self.rng = rng;
        let len = rng.len();
        if len > self.nodes.len() {
            self.nodes.clear();
            self.nodes.resize(len, Node::default());
            self.generation = 0;
        }
    }

    /// The grid rectangle being used.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Number of nodes expanded by the last search.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Start a new search: invalidate all nodes and reset the open set.
    pub(crate) fn begin_search(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps from the previous cycle could alias the new ones.
            for n in &mut self.nodes {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.open.clear();
        self.seq = 0;
        self.expanded = 0;
        self.generation
    }

    pub(crate) fn push_open(&mut self, idx: usize, g: i32, f: i32) {
        self.open.push(OpenEntry {
            f,
            seq: self.seq,
            g,
            idx,
        });
        self.seq = self.seq.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.offset(p)
    }

    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.rng.point_at(idx)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PathRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rng.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PathRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rng = Range::deserialize(deserializer)?;
        Ok(PathRange::new(rng))
    }
}
