//! Obstacle map: a sparse set of blocked cells with fixed bounds and
//! endpoints.
//!
//! [`GridMap`] is plain data. It is mutated by its owner between searches and
//! only read while a search runs.

use std::collections::HashSet;
use std::fmt;

use crate::geom::{Bounds, Cell};

/// Construction parameters for a [`GridMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub start: Cell,
    pub goal: Cell,
}

impl GridConfig {
    /// Create a configuration.
    pub const fn new(width: i32, height: i32, start: Cell, goal: Cell) -> Self {
        Self {
            width,
            height,
            start,
            goal,
        }
    }

    /// The configured bounds.
    #[inline]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Check the configuration without building a map.
    pub fn validate(&self) -> Result<(), GridError> {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return Err(GridError::EmptyBounds(bounds));
        }
        if !bounds.contains(self.start) {
            return Err(GridError::OutOfBounds {
                endpoint: Endpoint::Start,
                cell: self.start,
                bounds,
            });
        }
        if !bounds.contains(self.goal) {
            return Err(GridError::OutOfBounds {
                endpoint: Endpoint::Goal,
                cell: self.goal,
                bounds,
            });
        }
        if self.start == self.goal {
            return Err(GridError::StartIsGoal(self.start));
        }
        Ok(())
    }
}

/// Result of an obstacle toggle request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// The cell is now blocked.
    Blocked,
    /// The cell is now open.
    Cleared,
    /// Nothing changed: the cell is the start, the goal, or out of bounds.
    Ignored,
    /// Nothing changed: a search is in progress.
    Rejected,
}

impl Toggle {
    /// Whether the map was modified.
    #[inline]
    pub fn changed(self) -> bool {
        matches!(self, Self::Blocked | Self::Cleared)
    }
}

/// A bounded grid with blocked cells and fixed start and goal.
///
/// Start and goal are never blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    config: GridConfig,
    blocked: HashSet<Cell>,
}

impl GridMap {
    /// Create an obstacle-free map.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self {
            config,
            blocked: HashSet::new(),
        })
    }

    /// Build a map from an ASCII layout.
    ///
    /// `.` is an open cell, `#` a blocked one, `S` the start and `G` the
    /// goal. All lines must have the same width. Leading and trailing blank
    /// lines are ignored.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = text
            .trim_matches(|c: char| c == '\n' || c == '\r')
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        let mut start = None;
        let mut goal = None;
        let mut blocked = HashSet::new();

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(GridError::InconsistentWidth {
                    line: y,
                    expected: width,
                    found: line.chars().count(),
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                match ch {
                    '.' => {}
                    '#' => {
                        blocked.insert(cell);
                    }
                    'S' => {
                        if start.replace(cell).is_some() {
                            return Err(GridError::DuplicateEndpoint(Endpoint::Start, cell));
                        }
                    }
                    'G' => {
                        if goal.replace(cell).is_some() {
                            return Err(GridError::DuplicateEndpoint(Endpoint::Goal, cell));
                        }
                    }
                    _ => return Err(GridError::InvalidRune { ch, cell }),
                }
            }
        }

        let start = start.ok_or(GridError::MissingEndpoint(Endpoint::Start))?;
        let goal = goal.ok_or(GridError::MissingEndpoint(Endpoint::Goal))?;
        let mut map = Self::new(GridConfig::new(
            width as i32,
            lines.len() as i32,
            start,
            goal,
        ))?;
        map.blocked = blocked;
        Ok(map)
    }

    /// The configuration this map was built from.
    #[inline]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Grid bounds.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.config.bounds()
    }

    /// The fixed start cell.
    #[inline]
    pub fn start(&self) -> Cell {
        self.config.start
    }

    /// The fixed goal cell.
    #[inline]
    pub fn goal(&self) -> Cell {
        self.config.goal
    }

    /// Whether `c` lies inside the grid.
    #[inline]
    pub fn contains(&self, c: Cell) -> bool {
        self.bounds().contains(c)
    }

    /// Whether `c` is blocked.
    #[inline]
    pub fn is_blocked(&self, c: Cell) -> bool {
        self.blocked.contains(&c)
    }

    /// Whether `c` is in bounds and not blocked.
    #[inline]
    pub fn is_passable(&self, c: Cell) -> bool {
        self.contains(c) && !self.is_blocked(c)
    }

    /// Flip the blocked state of `c`.
    ///
    /// Start, goal and out-of-bounds cells are left alone and reported as
    /// [`Toggle::Ignored`].
    pub fn toggle_blocked(&mut self, c: Cell) -> Toggle {
        if !self.is_mutable(c) {
            return Toggle::Ignored;
        }
        if self.blocked.remove(&c) {
            Toggle::Cleared
        } else {
            self.blocked.insert(c);
            Toggle::Blocked
        }
    }

    /// Set the blocked state of `c` explicitly. Returns whether anything
    /// changed; start, goal and out-of-bounds cells never change.
    pub fn set_blocked(&mut self, c: Cell, blocked: bool) -> bool {
        if !self.is_mutable(c) {
            return false;
        }
        if blocked {
            self.blocked.insert(c)
        } else {
            self.blocked.remove(&c)
        }
    }

    /// Remove every obstacle.
    pub fn clear_obstacles(&mut self) {
        self.blocked.clear();
    }

    /// Iterate over blocked cells in no particular order.
    pub fn blocked(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked.iter().copied()
    }

    /// Number of blocked cells.
    #[inline]
    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Append the passable orthogonal neighbours of `c` to `buf`, in the
    /// order left, right, up, down. The caller clears `buf`.
    pub fn neighbors_into(&self, c: Cell, buf: &mut Vec<Cell>) {
        buf.extend(c.neighbors_4().into_iter().filter(|&n| self.is_passable(n)));
    }

    /// The passable orthogonal neighbours of `c`, in the order left, right,
    /// up, down.
    pub fn neighbors(&self, c: Cell) -> Vec<Cell> {
        let mut buf = Vec::with_capacity(4);
        self.neighbors_into(c, &mut buf);
        buf
    }

    /// Render the map back into the layout accepted by [`GridMap::parse`].
    pub fn layout(&self) -> String {
        let b = self.bounds();
        let mut s = String::with_capacity(b.len() + b.height as usize);
        for c in b {
            let ch = if c == self.start() {
                'S'
            } else if c == self.goal() {
                'G'
            } else if self.is_blocked(c) {
                '#'
            } else {
                '.'
            };
            s.push(ch);
            if c.x == b.width - 1 && c.y < b.height - 1 {
                s.push('\n');
            }
        }
        s
    }

    fn is_mutable(&self, c: Cell) -> bool {
        self.contains(c) && c != self.start() && c != self.goal()
    }
}

/// One of the two fixed endpoints of a map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// Errors that can occur when building a [`GridMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is not positive.
    EmptyBounds(Bounds),
    /// An endpoint lies outside the grid.
    OutOfBounds {
        endpoint: Endpoint,
        cell: Cell,
        bounds: Bounds,
    },
    /// Start and goal are the same cell.
    StartIsGoal(Cell),
    /// Layout lines have different widths.
    InconsistentWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A layout character other than `.`, `#`, `S` or `G`.
    InvalidRune { ch: char, cell: Cell },
    /// A layout has no start or no goal.
    MissingEndpoint(Endpoint),
    /// A layout has more than one start or goal.
    DuplicateEndpoint(Endpoint, Cell),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBounds(b) => write!(f, "grid: empty bounds {b}"),
            Self::OutOfBounds {
                endpoint,
                cell,
                bounds,
            } => write!(f, "grid: {endpoint} {cell} outside bounds {bounds}"),
            Self::StartIsGoal(c) => write!(f, "grid: start and goal are both {c}"),
            Self::InconsistentWidth {
                line,
                expected,
                found,
            } => write!(
                f,
                "grid layout: line {line} has width {found}, expected {expected}"
            ),
            Self::InvalidRune { ch, cell } => {
                write!(f, "grid layout: invalid rune \u{201c}{ch}\u{201d} at {cell}")
            }
            Self::MissingEndpoint(e) => write!(f, "grid layout: no {e} cell"),
            Self::DuplicateEndpoint(e, c) => write!(f, "grid layout: second {e} cell at {c}"),
        }
    }
}

impl std::error::Error for GridError {}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let cfg = GridConfig::new(20, 10, Cell::new(1, 2), Cell::new(18, 7));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
        assert!(GridMap::new(back).is_ok());
    }
}
