use gridstar_core::GridMap;

use crate::distance::Manhattan;
use crate::search::{Outcome, SearchEngine, SearchEvent};
use crate::traits::{Heuristic, Pather};

/// A lazy, finite stream of search events over a borrowed grid.
///
/// Yields one [`SearchEvent::Expanded`] per expansion and ends with exactly
/// one [`SearchEvent::Finished`]. The grid stays borrowed for the lifetime
/// of the stream, so it cannot be modified mid-search.
pub struct Search<'a, P, H = Manhattan> {
    pather: &'a P,
    engine: SearchEngine<H>,
    done: bool,
}

impl<'a, P: Pather, H: Heuristic> Search<'a, P, H> {
    /// Wrap `engine`, restarting it from scratch against `pather`.
    pub fn new(pather: &'a P, mut engine: SearchEngine<H>) -> Self {
        engine.start(pather);
        Self {
            pather,
            engine,
            done: false,
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &SearchEngine<H> {
        &self.engine
    }

    /// Drain the remaining events and return the outcome.
    pub fn outcome(mut self) -> Outcome {
        self.engine.run_to_end(self.pather)
    }
}

impl<P: Pather, H: Heuristic> Iterator for Search<'_, P, H> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        if self.done {
            return None;
        }
        let event = self.engine.step(self.pather);
        if matches!(event, SearchEvent::Finished(_)) {
            self.done = true;
        }
        Some(event)
    }
}

impl<P: Pather, H: Heuristic> std::iter::FusedIterator for Search<'_, P, H> {}

/// Start a fresh A* search from the map's start to its goal.
pub fn run_search(map: &GridMap) -> Search<'_, GridMap> {
    Search::new(map, SearchEngine::for_map(map))
}
