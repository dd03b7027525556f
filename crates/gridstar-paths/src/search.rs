//! Step-wise A* search.
//!
//! [`SearchEngine`] performs one node expansion per [`SearchEngine::step`]
//! call and hands a [`Snapshot`] back to the caller in between, so the
//! caller decides the pacing. A search moves through
//! `Idle → Running → {Succeeded, Exhausted, Cancelled}` and never leaves a
//! terminal state; call [`SearchEngine::start`] again for a fresh search.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use gridstar_core::{Cell, CancelToken, GridMap};
use log::{debug, trace};

use crate::distance::Manhattan;
use crate::heap::{Comparator, PriorityQueue};
use crate::path::Path;
use crate::traits::{Heuristic, Pather};

/// Queue payload. The route back to start is kept as a back-pointer and
/// resolved through the parent map once the goal is popped.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    f: i32,
    g: i32,
    cell: Cell,
    parent: Cell,
}

/// Ascending `f`; among equal `f`, deeper entries first.
fn frontier_order(a: &FrontierEntry, b: &FrontierEntry) -> Ordering {
    a.f.cmp(&b.f).then(b.g.cmp(&a.g))
}

/// Lifecycle of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Succeeded(Path),
    Exhausted,
    Cancelled,
}

impl SearchState {
    /// Whether the search has started and not yet finished.
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the search reached one of its final states.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Exhausted | Self::Cancelled)
    }

    /// The final outcome, if the search has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Idle | Self::Running => None,
            Self::Succeeded(p) => Some(Outcome::Succeeded(p.clone())),
            Self::Exhausted => Some(Outcome::Exhausted),
            Self::Cancelled => Some(Outcome::Cancelled),
        }
    }
}

/// How a finished search ended.
///
/// `Exhausted` means no path exists. It is an expected result, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(Path),
    Exhausted,
    Cancelled,
}

impl Outcome {
    /// The path, if the search succeeded.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Succeeded(p) => Some(p),
            _ => None,
        }
    }

    /// Consume the outcome, returning the path if the search succeeded.
    pub fn into_path(self) -> Option<Path> {
        match self {
            Self::Succeeded(p) => Some(p),
            _ => None,
        }
    }
}

/// Visualization state after one expansion.
///
/// Cell lists are sorted row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// 1-based index of this expansion.
    pub step: usize,
    /// The cell just expanded.
    pub current: Cell,
    /// Finalized cells, start included.
    pub visited: Vec<Cell>,
    /// Discovered cells not yet finalized.
    pub frontier: Vec<Cell>,
}

/// What a single [`SearchEngine::step`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// A cell was expanded; the search continues.
    Expanded(Snapshot),
    /// The search is over.
    Finished(Outcome),
}

/// A* over a 4-connected, unit-cost grid.
///
/// The engine owns the open list, the visited set and the parent map for one
/// search. It never mutates the grid; the caller must keep the grid unchanged
/// while the state is [`SearchState::Running`].
pub struct SearchEngine<H = Manhattan> {
    heuristic: H,
    start: Cell,
    goal: Cell,
    open: PriorityQueue<FrontierEntry>,
    visited: HashSet<Cell>,
    frontier: HashSet<Cell>,
    parents: HashMap<Cell, Cell>,
    state: SearchState,
    token: Option<CancelToken>,
    steps: usize,
    nbuf: Vec<Cell>,
}

impl SearchEngine<Manhattan> {
    /// An idle engine searching from `start` to `goal` with the Manhattan
    /// heuristic.
    pub fn new(start: Cell, goal: Cell) -> Self {
        Self::with_heuristic(start, goal, Manhattan)
    }

    /// An idle engine for the endpoints of `map`.
    pub fn for_map(map: &GridMap) -> Self {
        Self::new(map.start(), map.goal())
    }
}

impl<H: Heuristic> SearchEngine<H> {
    /// An idle engine using a custom heuristic.
    pub fn with_heuristic(start: Cell, goal: Cell, heuristic: H) -> Self {
        Self {
            heuristic,
            start,
            goal,
            open: PriorityQueue::with_comparator(frontier_order as Comparator<FrontierEntry>),
            visited: HashSet::new(),
            frontier: HashSet::new(),
            parents: HashMap::new(),
            state: SearchState::Idle,
            token: None,
            steps: 0,
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Attach a cancellation token, checked before every step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Number of expansions performed so far.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The start cell.
    #[inline]
    pub fn start_cell(&self) -> Cell {
        self.start
    }

    /// The goal cell.
    #[inline]
    pub fn goal_cell(&self) -> Cell {
        self.goal
    }

    /// Whether `c` has been finalized in the current search.
    #[inline]
    pub fn is_visited(&self, c: Cell) -> bool {
        self.visited.contains(&c)
    }

    /// Whether `c` is discovered but not yet finalized.
    #[inline]
    pub fn is_frontier(&self, c: Cell) -> bool {
        self.frontier.contains(&c)
    }

    /// Number of queued entries, stale duplicates included.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Begin a fresh search, discarding any previous state.
    ///
    /// Start is marked visited and each passable neighbour of start is
    /// queued at depth 1.
    pub fn start<P: Pather>(&mut self, pather: &P) {
        self.open.clear();
        self.visited.clear();
        self.frontier.clear();
        self.parents.clear();
        self.steps = 0;

        self.visited.insert(self.start);
        self.nbuf.clear();
        pather.neighbors(self.start, &mut self.nbuf);
        for &n in self.nbuf.iter() {
            self.open.insert(FrontierEntry {
                f: 1 + self.heuristic.estimate(n, self.goal),
                g: 1,
                cell: n,
                parent: self.start,
            });
            self.frontier.insert(n);
        }
        self.state = SearchState::Running;
        debug!(
            "search from {} to {}: {} initial frontier cells",
            self.start,
            self.goal,
            self.open.len()
        );
    }

    /// Stop a running search, moving it to [`SearchState::Cancelled`].
    /// Has no effect on idle or finished searches.
    pub fn cancel(&mut self) {
        if self.state.is_running() {
            self.finish(Outcome::Cancelled);
        }
    }

    /// Advance the search by one expansion.
    ///
    /// An idle engine is started first. Stale queue entries for cells that
    /// are already visited are dropped without counting as a step. Once the
    /// search is finished every call returns the same
    /// [`SearchEvent::Finished`].
    pub fn step<P: Pather>(&mut self, pather: &P) -> SearchEvent {
        match self.advance(pather) {
            Advance::Expanded(current) => SearchEvent::Expanded(self.snapshot(current)),
            Advance::Finished(outcome) => SearchEvent::Finished(outcome),
        }
    }

    /// Step until the search finishes and return its outcome.
    ///
    /// No snapshots are built along the way.
    pub fn run_to_end<P: Pather>(&mut self, pather: &P) -> Outcome {
        loop {
            if let Advance::Finished(outcome) = self.advance(pather) {
                return outcome;
            }
        }
    }

    fn advance<P: Pather>(&mut self, pather: &P) -> Advance {
        if self.state == SearchState::Idle {
            self.start(pather);
        } else if let Some(outcome) = self.state.outcome() {
            return Advance::Finished(outcome);
        }

        if self.token.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Advance::Finished(self.finish(Outcome::Cancelled));
        }

        loop {
            let Some(entry) = self.open.extract_top() else {
                return Advance::Finished(self.finish(Outcome::Exhausted));
            };

            if entry.cell == self.goal {
                self.frontier.remove(&entry.cell);
                let path = self.reconstruct(entry);
                return Advance::Finished(self.finish(Outcome::Succeeded(path)));
            }

            if !self.visited.insert(entry.cell) {
                // Stale duplicate.
                continue;
            }
            self.frontier.remove(&entry.cell);
            self.parents.insert(entry.cell, entry.parent);

            self.nbuf.clear();
            pather.neighbors(entry.cell, &mut self.nbuf);
            let g = entry.g + 1;
            for &n in self.nbuf.iter() {
                if self.visited.contains(&n) {
                    continue;
                }
                self.open.insert(FrontierEntry {
                    f: g + self.heuristic.estimate(n, self.goal),
                    g,
                    cell: n,
                    parent: entry.cell,
                });
                self.frontier.insert(n);
            }

            self.steps += 1;
            trace!(
                "step {}: expanded {} (g={}, f={}), open={}",
                self.steps,
                entry.cell,
                entry.g,
                entry.f,
                self.open.len()
            );
            return Advance::Expanded(entry.cell);
        }
    }

    fn snapshot(&self, current: Cell) -> Snapshot {
        let mut visited: Vec<Cell> = self.visited.iter().copied().collect();
        visited.sort_unstable();
        let mut frontier: Vec<Cell> = self.frontier.iter().copied().collect();
        frontier.sort_unstable();
        Snapshot {
            step: self.steps,
            current,
            visited,
            frontier,
        }
    }

    fn reconstruct(&self, goal: FrontierEntry) -> Path {
        let mut cells = vec![goal.cell];
        let mut cur = goal.parent;
        while cur != self.start {
            cells.push(cur);
            match self.parents.get(&cur) {
                Some(&p) => cur = p,
                None => break,
            }
        }
        cells.reverse();
        Path::new(cells)
    }

    /// Move to the terminal state matching `outcome` and hand it back.
    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.state = match &outcome {
            Outcome::Succeeded(p) => {
                debug!(
                    "search succeeded after {} expansions: {} steps to {}",
                    self.steps,
                    p.steps(),
                    self.goal
                );
                SearchState::Succeeded(p.clone())
            }
            Outcome::Exhausted => {
                debug!(
                    "search exhausted after {} expansions: no path to {}",
                    self.steps, self.goal
                );
                SearchState::Exhausted
            }
            Outcome::Cancelled => {
                debug!("search cancelled after {} expansions", self.steps);
                SearchState::Cancelled
            }
        };
        outcome
    }
}

/// What one internal advance did.
enum Advance {
    Expanded(Cell),
    Finished(Outcome),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::bfs_distance;
    use crate::distance::manhattan;
    use gridstar_core::GridConfig;
    use rand::RngExt;

    fn open_map(w: i32, h: i32, start: Cell, goal: Cell) -> GridMap {
        GridMap::new(GridConfig::new(w, h, start, goal)).unwrap()
    }

    fn solve(map: &GridMap) -> (Outcome, usize) {
        let mut engine = SearchEngine::for_map(map);
        let outcome = engine.run_to_end(map);
        (outcome, engine.steps())
    }

    #[test]
    fn three_by_three_open() {
        let m = open_map(3, 3, Cell::new(0, 0), Cell::new(2, 2));
        let (outcome, _) = solve(&m);
        let path = outcome.into_path().expect("path exists");
        assert_eq!(path.steps(), 4);
        assert_eq!(path.goal(), Cell::new(2, 2));
        assert!(path.is_continuous_from(m.start()));
        assert!(!path.cells().contains(&m.start()));
    }

    #[test]
    fn full_column_wall_is_exhausted() {
        let mut m = open_map(3, 3, Cell::new(0, 0), Cell::new(2, 2));
        for y in 0..3 {
            m.toggle_blocked(Cell::new(1, y));
        }
        let (outcome, steps) = solve(&m);
        assert_eq!(outcome, Outcome::Exhausted);
        // Only (0,1) and (0,2) are reachable besides start.
        assert_eq!(steps, 2);
    }

    #[test]
    fn enclosed_goal_terminates() {
        let m = GridMap::parse(
            "\
S.....
...###
...#G#
...###",
        )
        .unwrap();
        let (outcome, steps) = solve(&m);
        assert_eq!(outcome, Outcome::Exhausted);
        let reachable = crate::bfs::bfs_map(&m, m.start(), i32::MAX).len();
        assert!(steps < reachable);
    }

    #[test]
    fn start_boxed_in() {
        let m = GridMap::parse(
            "\
S#.
#..
..G",
        )
        .unwrap();
        let mut engine = SearchEngine::for_map(&m);
        assert_eq!(engine.step(&m), SearchEvent::Finished(Outcome::Exhausted));
        assert_eq!(engine.steps(), 0);
    }

    #[test]
    fn open_grid_matches_manhattan() {
        let mut rng = rand::rng();
        for _ in 0..30 {
            let w = rng.random_range(2..15);
            let h = rng.random_range(2..15);
            let start = Cell::new(rng.random_range(0..w), rng.random_range(0..h));
            let goal = Cell::new(rng.random_range(0..w), rng.random_range(0..h));
            if start == goal {
                continue;
            }
            let m = open_map(w, h, start, goal);
            let (outcome, _) = solve(&m);
            let path = outcome.into_path().expect("open grid always has a path");
            assert_eq!(path.steps() as i32, manhattan(start, goal));
            assert!(path.is_continuous_from(start));
        }
    }

    #[test]
    fn random_obstacles_match_bfs() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let mut m = open_map(12, 9, Cell::new(0, 0), Cell::new(11, 8));
            for c in m.bounds() {
                if rng.random_range(0..100) < 30 {
                    m.set_blocked(c, true);
                }
            }
            let (outcome, _) = solve(&m);
            match bfs_distance(&m, m.start(), m.goal()) {
                Some(d) => {
                    let path = outcome.into_path().expect("bfs found a path");
                    assert_eq!(path.steps() as i32, d);
                    assert!(path.is_continuous_from(m.start()));
                    assert!(path.iter().all(|&c| m.is_passable(c)));
                }
                None => assert_eq!(outcome, Outcome::Exhausted),
            }
        }
    }

    #[test]
    fn large_walled_goal_runs_to_end() {
        // 40k reachable cells; each expansion must stay cheap.
        let n = 200;
        let goal = Cell::new(n - 1, n - 1);
        let mut m = open_map(n, n, Cell::new(0, 0), goal);
        m.set_blocked(Cell::new(n - 2, n - 1), true);
        m.set_blocked(Cell::new(n - 1, n - 2), true);
        let mut engine = SearchEngine::for_map(&m);
        assert_eq!(engine.run_to_end(&m), Outcome::Exhausted);
        // Everything except start, goal and the two walls is expanded.
        assert_eq!(engine.steps(), (n * n) as usize - 4);
        assert_eq!(engine.state(), &SearchState::Exhausted);
    }

    #[test]
    fn snapshots_track_sets() {
        let m = open_map(4, 4, Cell::new(0, 0), Cell::new(3, 3));
        let mut engine = SearchEngine::for_map(&m);
        let mut last_visited = 1;
        let mut n = 0;
        loop {
            match engine.step(&m) {
                SearchEvent::Expanded(snap) => {
                    n += 1;
                    assert_eq!(snap.step, n);
                    assert!(snap.visited.contains(&m.start()));
                    assert!(snap.visited.contains(&snap.current));
                    assert!(!snap.frontier.contains(&snap.current));
                    assert!(snap.frontier.iter().all(|c| !snap.visited.contains(c)));
                    // Visited grows by exactly one per expansion.
                    assert_eq!(snap.visited.len(), last_visited + 1);
                    last_visited = snap.visited.len();
                }
                SearchEvent::Finished(outcome) => {
                    assert_eq!(outcome.path().map(Path::steps), Some(6));
                    break;
                }
            }
        }
    }

    #[test]
    fn finished_is_sticky() {
        let m = open_map(2, 1, Cell::new(0, 0), Cell::new(1, 0));
        let mut engine = SearchEngine::for_map(&m);
        let first = engine.step(&m);
        let SearchEvent::Finished(Outcome::Succeeded(path)) = &first else {
            panic!("adjacent goal should be found on the first pop: {first:?}");
        };
        assert_eq!(path.cells(), &[Cell::new(1, 0)]);
        assert_eq!(engine.step(&m), first);
        assert!(engine.state().is_terminal());
    }

    #[test]
    fn restart_resets_state() {
        let mut m = open_map(3, 3, Cell::new(0, 0), Cell::new(2, 2));
        let mut engine = SearchEngine::for_map(&m);
        assert!(engine.run_to_end(&m).path().is_some());
        for y in 0..3 {
            m.toggle_blocked(Cell::new(1, y));
        }
        engine.start(&m);
        assert_eq!(engine.state(), &SearchState::Running);
        assert_eq!(engine.steps(), 0);
        assert!(!engine.is_visited(Cell::new(2, 2)));
        assert_eq!(engine.run_to_end(&m), Outcome::Exhausted);
    }

    #[test]
    fn token_cancels_between_steps() {
        let m = open_map(10, 10, Cell::new(0, 0), Cell::new(9, 9));
        let token = CancelToken::new();
        let mut engine = SearchEngine::for_map(&m).with_cancel(token.clone());
        assert!(matches!(engine.step(&m), SearchEvent::Expanded(_)));
        token.cancel();
        assert_eq!(engine.step(&m), SearchEvent::Finished(Outcome::Cancelled));
        assert_eq!(engine.state(), &SearchState::Cancelled);
        assert_eq!(engine.steps(), 1);

        token.reset();
        assert_eq!(engine.step(&m), SearchEvent::Finished(Outcome::Cancelled));
        engine.start(&m);
        assert_eq!(engine.run_to_end(&m).path().map(Path::steps), Some(18));
    }

    #[test]
    fn terminal_outcome_matches_state() {
        let m = GridMap::parse("S#G").unwrap();
        let mut engine = SearchEngine::for_map(&m);
        let outcome = engine.run_to_end(&m);
        assert_eq!(outcome, Outcome::Exhausted);
        assert_eq!(engine.state().outcome(), Some(outcome.clone()));
        assert_eq!(engine.step(&m), SearchEvent::Finished(outcome));
    }

    #[test]
    fn explicit_cancel() {
        let m = open_map(5, 5, Cell::new(0, 0), Cell::new(4, 4));
        let mut engine = SearchEngine::for_map(&m);
        engine.cancel();
        assert_eq!(engine.state(), &SearchState::Idle);
        engine.step(&m);
        engine.cancel();
        assert_eq!(engine.step(&m), SearchEvent::Finished(Outcome::Cancelled));
    }

    #[test]
    fn zero_heuristic_is_still_optimal() {
        let m = GridMap::parse(
            "\
S..#....
.#.#.##.
.#...#..
.####.#.
......#G",
        )
        .unwrap();
        let mut engine = SearchEngine::with_heuristic(m.start(), m.goal(), |_: Cell, _: Cell| 0);
        let dijkstra = engine.run_to_end(&m);
        let (astar, _) = solve(&m);
        assert_eq!(
            dijkstra.path().map(Path::steps),
            astar.path().map(Path::steps)
        );
        assert_eq!(
            astar.path().map(|p| p.steps() as i32),
            bfs_distance(&m, m.start(), m.goal())
        );
    }
}
