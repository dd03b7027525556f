//! Step-wise A* pathfinding on obstacle grids.
//!
//! - [`PriorityQueue`] — a binary heap ordered by an injected comparator
//! - [`SearchEngine`] — A* that expands one cell per [`SearchEngine::step`]
//!   and reports a [`Snapshot`] after each expansion
//! - [`Search`] / [`run_search`] — the same search as a lazy event stream
//! - [`Session`] — a [`GridMap`](gridstar_core::GridMap) plus the search
//!   over it, rejecting obstacle edits while the search runs
//! - [`bfs_distance`] / [`bfs_map`] — unweighted breadth-first distances
//!
//! # Traits
//!
//! | Trait | Role |
//! |---|---|
//! | [`Pather`] | neighbor enumeration, implemented for `GridMap` |
//! | [`Heuristic`] | remaining-cost estimate, implemented by [`Manhattan`] and closures |

mod bfs;
mod distance;
mod heap;
mod path;
mod search;
mod session;
mod stream;
mod traits;

pub use bfs::{bfs_distance, bfs_map};
pub use distance::{Manhattan, manhattan};
pub use heap::{Comparator, PriorityQueue};
pub use path::{EmptyPath, Path};
pub use search::{Outcome, SearchEngine, SearchEvent, SearchState, Snapshot};
pub use session::Session;
pub use stream::{Search, run_search};
pub use traits::{Heuristic, Pather};
