//! An integer-cell grid for map representation.
//!
//! [`Cell`] is a newtype over `i32` whose meaning (wall, floor, door...) is
//! chosen by the user. [`Grid`] stores one cell per point of a [`Range`] in
//! a dense row-major buffer that it owns exclusively: generators mutate it
//! through `&mut Grid`, vision and pathfinding read it through `&Grid`.

use gruid_core::{Point, Range, RangeIter};
use thiserror::Error;

/// A map cell value, wrapping an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell(pub i32);

impl Cell {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl From<Cell> for i32 {
    fn from(c: Cell) -> Self {
        c.0
    }
}

/// Errors reported by the checked [`Grid`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("point {point} is outside grid range {range}")]
    OutOfRange { point: Point, range: Range },
    #[error("grid range {range} needs {expected} cells, got {got}")]
    SizeMismatch {
        range: Range,
        expected: usize,
        got: usize,
    },
}

/// A 2D grid of [`Cell`] values over a fixed [`Range`].
///
/// Points are absolute: a grid built with [`with_range`](Grid::with_range)
/// over `(10, 10)-(20, 20)` is addressed with points in that rectangle.
/// Accessing a point outside the range through [`at`](Grid::at) or
/// [`set`](Grid::set) is a programming error and panics; use
/// [`get`](Grid::get) or [`try_set`](Grid::try_set) when the point may be
/// outside.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    range: Range,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a `width × height` grid at the origin, filled with `Cell(0)`.
    /// Negative sizes are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_range(Range::new(0, 0, width.max(0), height.max(0)))
    }

    /// Create a grid covering `range`, filled with `Cell(0)`.
    pub fn with_range(range: Range) -> Self {
        Self {
            range,
            cells: vec![Cell::default(); range.len()],
        }
    }

    /// Build a grid from a row-major buffer of exactly `range.len()` cells.
    pub fn from_cells(range: Range, cells: Vec<Cell>) -> Result<Self, GridError> {
        if cells.len() != range.len() {
            return Err(GridError::SizeMismatch {
                range,
                expected: range.len(),
                got: cells.len(),
            });
        }
        Ok(Self { range, cells })
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.range.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.range.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.range.height()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.range.contains(p)
    }

    /// The row-major cell buffer.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The cell at `p`.
    ///
    /// # Panics
    ///
    /// If `p` is outside the grid range.
    #[inline]
    pub fn at(&self, p: Point) -> Cell {
        match self.range.offset(p) {
            Some(i) => self.cells[i],
            None => panic!("{}", self.out_of_range(p)),
        }
    }

    /// The cell at `p`, or `None` if `p` is outside the grid.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Cell> {
        self.range.offset(p).map(|i| self.cells[i])
    }

    /// Set the cell at `p`.
    ///
    /// # Panics
    ///
    /// If `p` is outside the grid range.
    #[inline]
    pub fn set(&mut self, p: Point, cell: Cell) {
        match self.range.offset(p) {
            Some(i) => self.cells[i] = cell,
            None => panic!("{}", self.out_of_range(p)),
        }
    }

    /// Set the cell at `p`, reporting an error if `p` is outside the grid.
    pub fn try_set(&mut self, p: Point, cell: Cell) -> Result<(), GridError> {
        let i = self.range.offset(p).ok_or_else(|| self.out_of_range(p))?;
        self.cells[i] = cell;
        Ok(())
    }

    fn out_of_range(&self, point: Point) -> GridError {
        GridError::OutOfRange {
            point,
            range: self.range,
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Fill the grid using a function of each point.
    pub fn fill_fn(&mut self, mut f: impl FnMut(Point) -> Cell) {
        for (p, c) in self.range.iter().zip(self.cells.iter_mut()) {
            *c = f(p);
        }
    }

    /// Replace every cell with `f(point, old_cell)`.
    pub fn map_cells(&mut self, mut f: impl FnMut(Point, Cell) -> Cell) {
        for (p, c) in self.range.iter().zip(self.cells.iter_mut()) {
            *c = f(p, *c);
        }
    }

    /// Copy the cells of `other` that fall inside this grid's range.
    pub fn copy_from(&mut self, other: &Grid) {
        for p in self.range.intersect(other.range) {
            self.set(p, other.at(p));
        }
    }

    /// Count the cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Count the cells satisfying a predicate.
    pub fn count_fn(&self, mut f: impl FnMut(Point, Cell) -> bool) -> usize {
        self.iter().filter(|&(p, c)| f(p, c)).count()
    }

    /// Iterate over `(Point, Cell)` pairs in row-major order.
    pub fn iter(&self) -> GridIter<'_> {
        GridIter {
            points: self.range.iter(),
            cells: self.cells.iter(),
        }
    }
}

/// Row-major iterator over the `(Point, Cell)` pairs of a [`Grid`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    points: RangeIter,
    cells: std::slice::Iter<'a, Cell>,
}

impl Iterator for GridIter<'_> {
    type Item = (Point, Cell);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.points.next()?, *self.cells.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl ExactSizeIterator for GridIter<'_> {}

impl<'a> IntoIterator for &'a Grid {
    type Item = (Point, Cell);
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> GridIter<'a> {
        self.iter()
    }
}

/// Unvalidated wire form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    range: Range,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, GridError> {
        Grid::from_cells(raw.range, raw.cells)
    }
}
