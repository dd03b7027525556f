use std::fmt;

use gridstar_core::Cell;

/// A search result: the cells from the neighbour of start through goal.
///
/// Start is not included. Consecutive cells are orthogonally adjacent, and
/// the path is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Cell>", into = "Vec<Cell>"))]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells }
    }

    /// All cells, goal last.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of unit moves from start to goal.
    #[inline]
    pub fn steps(&self) -> usize {
        self.cells.len()
    }

    /// The final cell.
    #[inline]
    pub fn goal(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Every cell except the goal, for callers that draw the route between
    /// the two endpoints.
    #[inline]
    pub fn intermediate(&self) -> &[Cell] {
        &self.cells[..self.cells.len() - 1]
    }

    /// Whether the path is an unbroken chain of unit moves beginning next to
    /// `start`.
    pub fn is_continuous_from(&self, start: Cell) -> bool {
        std::iter::once(&start)
            .chain(self.cells.iter())
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[0].is_adjacent(*w[1]))
    }

    /// Iterate over the cells, goal last.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Take ownership of the cells.
    pub fn into_vec(self) -> Vec<Cell> {
        self.cells
    }
}

impl TryFrom<Vec<Cell>> for Path {
    type Error = EmptyPath;

    fn try_from(cells: Vec<Cell>) -> Result<Self, EmptyPath> {
        if cells.is_empty() {
            return Err(EmptyPath);
        }
        Ok(Self { cells })
    }
}

impl From<Path> for Vec<Cell> {
    fn from(p: Path) -> Self {
        p.cells
    }
}

/// Error returned when building a [`Path`] from no cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPath;

impl fmt::Display for EmptyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("path: no cells")
    }
}

impl std::error::Error for EmptyPath {}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
