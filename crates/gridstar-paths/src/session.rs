//! The surface a UI drives: obstacle edits and searches over one map.

use gridstar_core::{Cell, CancelToken, GridConfig, GridError, GridMap, Toggle};
use log::debug;

use crate::search::{SearchEngine, SearchEvent, SearchState};
use crate::stream::{Search, run_search};

/// Owns a [`GridMap`] and at most one step-driven search over it.
///
/// Obstacle toggles are rejected while that search is running, so the map
/// never changes under an active search. A UI that animates the search
/// calls [`Session::begin_search`] once and then [`Session::step`] on every
/// frame.
pub struct Session {
    map: GridMap,
    active: Option<SearchEngine>,
}

impl Session {
    /// Create a session over an obstacle-free map.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        Ok(Self::from_map(GridMap::new(config)?))
    }

    /// Create a session over an existing map.
    pub fn from_map(map: GridMap) -> Self {
        Self { map, active: None }
    }

    /// The map.
    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// State of the step-driven search, if one was begun.
    pub fn search_state(&self) -> Option<&SearchState> {
        self.active.as_ref().map(SearchEngine::state)
    }

    /// Whether a step-driven search is in progress.
    pub fn is_running(&self) -> bool {
        self.search_state().is_some_and(SearchState::is_running)
    }

    /// Flip the obstacle state of `c`.
    ///
    /// Returns [`Toggle::Rejected`] while a search is running and
    /// [`Toggle::Ignored`] for start, goal and out-of-bounds cells.
    pub fn toggle_obstacle(&mut self, c: Cell) -> Toggle {
        if self.is_running() {
            debug!("toggle of {c} rejected: search in progress");
            return Toggle::Rejected;
        }
        self.map.toggle_blocked(c)
    }

    /// Begin a step-driven search, replacing any previous one.
    pub fn begin_search(&mut self) {
        self.begin(SearchEngine::for_map(&self.map));
    }

    /// Begin a step-driven search that stops once `token` is cancelled.
    pub fn begin_search_with(&mut self, token: CancelToken) {
        self.begin(SearchEngine::for_map(&self.map).with_cancel(token));
    }

    /// Advance the step-driven search. Returns `None` if none was begun.
    pub fn step(&mut self) -> Option<SearchEvent> {
        let engine = self.active.as_mut()?;
        Some(engine.step(&self.map))
    }

    /// Cancel the step-driven search, if it is running.
    pub fn cancel(&mut self) {
        if let Some(engine) = self.active.as_mut() {
            engine.cancel();
        }
    }

    /// Run a fresh search as a lazy event stream.
    ///
    /// The stream borrows the session, so no toggles can happen until it is
    /// dropped. It is independent of any step-driven search.
    pub fn run_search(&self) -> Search<'_, GridMap> {
        run_search(&self.map)
    }

    fn begin(&mut self, mut engine: SearchEngine) {
        engine.start(&self.map);
        self.active = Some(engine);
    }
}
