//! Stepviz is a stepwise algorithm visualization core.
//!
//! Stepviz turns the execution of a discrete algorithm (a grid search or an
//! in-place sort) into an ordered trace of events, then replays that trace at
//! a caller-controlled pace through a renderer callback, with cooperative
//! cancellation at every event boundary.
//!
//! # Pipeline overview
//!
//! 1. **Model**: `Grid` / `ValueArray`, explicit session state, validated on
//!    construction, mutated only by the active engine.
//! 2. **Engine**: `search` / `sort`: `Model + Algorithm -> Trace` (strict
//!    temporal order, no batching).
//! 3. **Replay**: `Trace -> EventSink` paced by an injectable [`Clock`],
//!    halted by a [`CancelToken`].
//! 4. **Sample**: [`FrameSource`] -> [`TextFrame`], per-tick intensity
//!    sampling onto an ordered symbol [`Palette`], with pause/seek control.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: every randomized input (maze walls,
//!   generated arrays) derives from an explicit seed; identical seeds
//!   reproduce identical traces.
//! - **No rendering in the core**: renderers attach at the [`EventSink`] and
//!   [`TextFrame`] boundaries; the core never draws.
//! - **Cooperative control**: one logical thread; suspension happens only at
//!   declared delay boundaries, and cancellation is checked there, never
//!   mid-step.
#![forbid(unsafe_code)]

mod array;
mod foundation;
mod grid;
mod replay;
mod sampler;
mod search;
mod sort;
mod trace;

pub use array::model::ValueArray;
pub use foundation::error::{StepvizError, StepvizResult};
pub use grid::model::{Cell, CellIdx, Grid, GridSpec, MAX_CELLS, Pos};
pub use replay::clock::{Clock, SystemClock, VirtualClock};
pub use replay::driver::{
    BASE_STEP, CancelToken, EventSink, InMemorySink, MIN_RATE, PaceOpts, ReplayOutcome,
    ReplayReport, replay,
};
pub use replay::session::{PathVisualizer, Rejection, SearchReport, SortReport, SortVisualizer};
pub use sampler::palette::Palette;
pub use sampler::player::{AsciiPlayer, SampleSpec, TextFrame};
pub use sampler::source::{FrameSource, ImageSource, SweepSource};
pub use search::engine::{SearchAlgorithm, SearchRun, search};
pub use sort::engine::{SortAlgorithm, SortRun, sort};
pub use trace::event::{Trace, TraceEvent};
