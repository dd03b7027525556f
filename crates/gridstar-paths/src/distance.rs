use gridstar_core::Cell;

use crate::traits::Heuristic;

/// Manhattan (L1) distance between two cells.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Manhattan distance as an A* estimate.
///
/// Admissible and consistent on 4-connected grids with unit step cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, from: Cell, to: Cell) -> i32 {
        manhattan(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_values() {
        assert_eq!(manhattan(Cell::new(0, 0), Cell::new(2, 2)), 4);
        assert_eq!(manhattan(Cell::new(3, -1), Cell::new(-2, 4)), 10);
        assert_eq!(manhattan(Cell::new(5, 5), Cell::new(5, 5)), 0);
    }

    #[test]
    fn manhattan_is_consistent_across_steps() {
        let goal = Cell::new(4, 1);
        for c in gridstar_core::Bounds::new(6, 6) {
            for n in c.neighbors_4() {
                assert!(Manhattan.estimate(c, goal) <= 1 + Manhattan.estimate(n, goal));
            }
        }
    }
}
