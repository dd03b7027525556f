//! **gridstar-core** — core types for grid pathfinding.
//!
//! This crate provides the data the search operates on: integer grid cells,
//! grid bounds, the [`GridMap`] obstacle store with its fixed start and goal,
//! and a cooperative [`CancelToken`].

pub mod context;
pub mod geom;
pub mod grid;

pub use context::CancelToken;
pub use geom::{Bounds, BoundsIter, Cell};
pub use grid::{Endpoint, GridConfig, GridError, GridMap, Toggle};
