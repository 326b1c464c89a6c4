use std::time::Duration;

use crate::array::model::ValueArray;
use crate::grid::model::{Grid, Pos};
use crate::replay::clock::Clock;
use crate::replay::driver::{BASE_STEP, CancelToken, EventSink, PaceOpts, ReplayOutcome, replay};
use crate::search::engine::{SearchAlgorithm, search};
use crate::sort::engine::{SortAlgorithm, sort};

/// Why a session request was refused.
///
/// Rejections are ordinary no-ops, never faults: a refused request leaves the
/// session untouched and is never queued or retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A run is already active on this visualizer.
    AlreadyRunning,
    /// The grid is missing its start or end designation.
    MissingEndpoints,
    /// No array (or a zero-length request) to sort.
    EmptyArray,
    /// No frame source is loaded.
    NoSource,
}

/// Statistics from one pathfinding visualization run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// Counted visit events (start/end excluded).
    pub visited: usize,
    /// Cells on the reconstructed path, start and end included; zero when
    /// the goal was unreachable.
    pub path_len: usize,
    /// Time spent producing the trace.
    pub algo_time: Duration,
    /// Replay wall time, pacing delays included.
    pub anim_time: Duration,
    /// Completion or cancellation.
    pub outcome: ReplayOutcome,
}

/// Statistics from one sorting visualization run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortReport {
    /// Value comparisons performed.
    pub comparisons: u64,
    /// Element accesses performed.
    pub accesses: u64,
    /// Time spent producing the trace.
    pub algo_time: Duration,
    /// Replay wall time, pacing delays included.
    pub anim_time: Duration,
    /// Completion or cancellation.
    pub outcome: ReplayOutcome,
}

/// Run session for the grid pathfinding visualizer.
///
/// Owns the grid and a run/not-running flag. While a run is active the grid
/// belongs to the engine: every mutation request is rejected. At most one
/// run is active at a time; a new request while running is a no-op, never
/// queued.
#[derive(Debug)]
pub struct PathVisualizer {
    grid: Grid,
    base_step: Duration,
    running: bool,
}

impl PathVisualizer {
    /// Wrap a grid with the default base step.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            base_step: BASE_STEP,
            running: false,
        }
    }

    /// Override the per-event base delay.
    pub fn with_base_step(mut self, base_step: Duration) -> Self {
        self.base_step = base_step;
        self
    }

    /// Read access to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Toggle a wall; `false` when rejected (running, out of bounds, or a
    /// start/end cell).
    pub fn toggle_wall(&mut self, pos: Pos) -> bool {
        if self.reject_mutation("toggle_wall") {
            return false;
        }
        self.grid.toggle_wall(pos).unwrap_or(false)
    }

    /// Designate the start cell; `false` when rejected.
    pub fn set_start(&mut self, pos: Pos) -> bool {
        if self.reject_mutation("set_start") {
            return false;
        }
        self.grid.set_start(pos).is_ok()
    }

    /// Designate the end cell; `false` when rejected.
    pub fn set_end(&mut self, pos: Pos) -> bool {
        if self.reject_mutation("set_end") {
            return false;
        }
        self.grid.set_end(pos).is_ok()
    }

    /// Seed maze walls; `false` when rejected.
    pub fn generate_maze(&mut self, seed: u64) -> bool {
        if self.reject_mutation("generate_maze") {
            return false;
        }
        self.grid.generate_maze(seed);
        true
    }

    /// Clear search state only; `false` when rejected.
    pub fn clear_path(&mut self) -> bool {
        if self.reject_mutation("clear_path") {
            return false;
        }
        self.grid.reset_search_state();
        true
    }

    /// Remove all walls; `false` when rejected.
    pub fn clear_walls(&mut self) -> bool {
        if self.reject_mutation("clear_walls") {
            return false;
        }
        self.grid.clear_walls();
        true
    }

    /// Clear walls, designations and search state; `false` when rejected.
    pub fn clear_all(&mut self) -> bool {
        if self.reject_mutation("clear_all") {
            return false;
        }
        self.grid.clear_all();
        true
    }

    /// Run one search and replay its trace through the sink.
    ///
    /// The pacing rate is captured for the whole run. Cancellation halts the
    /// replay at the next event boundary; the report then carries the
    /// statistics of the full trace with a `Cancelled` outcome.
    pub fn visualize(
        &mut self,
        algorithm: SearchAlgorithm,
        rate: f64,
        clock: &mut dyn Clock,
        cancel: &CancelToken,
        sink: &mut dyn EventSink,
    ) -> Result<SearchReport, Rejection> {
        if self.running {
            tracing::warn!("visualize rejected: a run is already active");
            return Err(Rejection::AlreadyRunning);
        }

        let algo_started = clock.now();
        let run = match search(&mut self.grid, algorithm) {
            Ok(run) => run,
            Err(err) => {
                tracing::warn!(%err, "visualize rejected");
                return Err(Rejection::MissingEndpoints);
            }
        };
        let algo_time = clock.now().saturating_sub(algo_started);

        self.running = true;
        let opts = PaceOpts {
            base_step: self.base_step,
            rate,
        };
        let report = replay(run.trace, &opts, clock, cancel, sink);
        self.running = false;

        Ok(SearchReport {
            visited: run.visited,
            path_len: run.path.len(),
            algo_time,
            anim_time: report.wall,
            outcome: report.outcome,
        })
    }

    fn reject_mutation(&self, op: &str) -> bool {
        if self.running {
            tracing::warn!(op, "grid mutation rejected while a run is active");
        }
        self.running
    }
}

/// Run session for the array sorting visualizer.
#[derive(Debug)]
pub struct SortVisualizer {
    array: Option<ValueArray>,
    base_step: Duration,
    running: bool,
}

impl Default for SortVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SortVisualizer {
    /// Create a session with no array loaded.
    pub fn new() -> Self {
        Self {
            array: None,
            base_step: BASE_STEP,
            running: false,
        }
    }

    /// Override the per-event base delay.
    pub fn with_base_step(mut self, base_step: Duration) -> Self {
        self.base_step = base_step;
        self
    }

    /// Read access to the current array.
    pub fn array(&self) -> Option<&ValueArray> {
        self.array.as_ref()
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generate a fresh array; `false` when rejected (running or zero size).
    pub fn generate(&mut self, len: usize, seed: u64) -> bool {
        if self.running {
            tracing::warn!("generate rejected while a run is active");
            return false;
        }
        match ValueArray::generate(len, seed) {
            Ok(array) => {
                self.array = Some(array);
                true
            }
            Err(err) => {
                tracing::warn!(%err, "generate rejected");
                false
            }
        }
    }

    /// Load explicit values; `false` when rejected.
    pub fn set_values(&mut self, values: Vec<u32>) -> bool {
        if self.running {
            tracing::warn!("set_values rejected while a run is active");
            return false;
        }
        match ValueArray::from_values(values) {
            Ok(array) => {
                self.array = Some(array);
                true
            }
            Err(err) => {
                tracing::warn!(%err, "set_values rejected");
                false
            }
        }
    }

    /// Run one sort and replay its trace through the sink.
    pub fn visualize(
        &mut self,
        algorithm: SortAlgorithm,
        rate: f64,
        clock: &mut dyn Clock,
        cancel: &CancelToken,
        sink: &mut dyn EventSink,
    ) -> Result<SortReport, Rejection> {
        if self.running {
            tracing::warn!("visualize rejected: a run is already active");
            return Err(Rejection::AlreadyRunning);
        }
        let Some(array) = self.array.as_mut() else {
            tracing::warn!("visualize rejected: no array loaded");
            return Err(Rejection::EmptyArray);
        };

        let algo_started = clock.now();
        let run = match sort(array, algorithm) {
            Ok(run) => run,
            Err(err) => {
                tracing::warn!(%err, "visualize rejected");
                return Err(Rejection::EmptyArray);
            }
        };
        let algo_time = clock.now().saturating_sub(algo_started);

        self.running = true;
        let opts = PaceOpts {
            base_step: self.base_step,
            rate,
        };
        let report = replay(run.trace, &opts, clock, cancel, sink);
        self.running = false;

        Ok(SortReport {
            comparisons: run.comparisons,
            accesses: run.accesses,
            algo_time,
            anim_time: report.wall,
            outcome: report.outcome,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/session.rs"]
mod tests;
