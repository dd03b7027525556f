use gridstar_core::{Cell, GridMap};

/// Neighbor enumeration for a search space.
pub trait Pather {
    /// Append the cells reachable in one unit step from `c` into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>);
}

/// Estimate of the remaining cost between two cells.
pub trait Heuristic {
    /// Must be non-negative and never overestimate the true cost
    /// (admissible), or A* loses its optimality guarantee.
    fn estimate(&self, from: Cell, to: Cell) -> i32;
}

impl<F> Heuristic for F
where
    F: Fn(Cell, Cell) -> i32,
{
    #[inline]
    fn estimate(&self, from: Cell, to: Cell) -> i32 {
        self(from, to)
    }
}

impl Pather for GridMap {
    #[inline]
    fn neighbors(&self, c: Cell, buf: &mut Vec<Cell>) {
        self.neighbors_into(c, buf);
    }
}
