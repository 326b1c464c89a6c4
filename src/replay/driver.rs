use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::replay::clock::Clock;
use crate::trace::event::{Trace, TraceEvent};

/// Smallest usable pacing rate; a zero or negative rate clamps here instead
/// of dividing by zero.
pub const MIN_RATE: f64 = 1e-4;

/// Per-step delay at rate 1.0.
pub const BASE_STEP: Duration = Duration::from_millis(25);

/// Pacing parameters, captured once for the duration of a replay.
///
/// Mid-run rate changes are unsupported: the effective delay is computed when
/// replay begins and holds until it ends.
#[derive(Clone, Copy, Debug)]
pub struct PaceOpts {
    /// Delay per event at rate 1.0.
    pub base_step: Duration,
    /// Playback rate multiplier; clamped to [`MIN_RATE`].
    pub rate: f64,
}

impl Default for PaceOpts {
    fn default() -> Self {
        Self {
            base_step: BASE_STEP,
            rate: 1.0,
        }
    }
}

impl PaceOpts {
    /// Default base step at the given rate.
    pub fn with_rate(rate: f64) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Per-event delay: `base_step / max(rate, MIN_RATE)`, floored at zero.
    pub fn step_delay(&self) -> Duration {
        let rate = self.rate.max(MIN_RATE);
        Duration::from_secs_f64((self.base_step.as_secs_f64() / rate).max(0.0))
    }
}

/// Cooperative cancellation flag shared between a controller and a replay.
///
/// Checked once per event boundary, never mid-step.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the replay halts at its next event boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a replay finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every event was delivered.
    Completed,
    /// Cancellation halted delivery at an event boundary.
    Cancelled,
}

/// Statistics from one replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayReport {
    /// Events actually delivered.
    pub delivered: usize,
    /// Completion or cancellation.
    pub outcome: ReplayOutcome,
    /// Wall time of the replay, pacing delays included.
    pub wall: Duration,
}

/// Receives replayed events in strict trace order.
pub trait EventSink {
    /// Called once before the first delivery with the total event count.
    fn begin(&mut self, _total: usize) {}

    /// Called once per delivered event with its trace index.
    fn on_event(&mut self, index: usize, event: &TraceEvent);

    /// Called once after the last delivery or at the cancellation point.
    fn end(&mut self, _outcome: ReplayOutcome) {}
}

/// Sink that records deliveries; used by tests and tools.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Delivered events in order.
    pub events: Vec<TraceEvent>,
    /// Outcome reported by `end`, once the replay finished.
    pub outcome: Option<ReplayOutcome>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for InMemorySink {
    fn on_event(&mut self, _index: usize, event: &TraceEvent) {
        self.events.push(*event);
    }

    fn end(&mut self, outcome: ReplayOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Replay a trace through a sink at the configured pace.
///
/// Each event is delivered and then the driver suspends for the step delay.
/// A set cancel token halts the replay before the next delivery; no events
/// after the cancellation point reach the sink. The trace is consumed; a
/// fresh engine run is needed to replay again.
#[tracing::instrument(skip(trace, opts, clock, cancel, sink), fields(events = trace.len()))]
pub fn replay(
    trace: Trace,
    opts: &PaceOpts,
    clock: &mut dyn Clock,
    cancel: &CancelToken,
    sink: &mut dyn EventSink,
) -> ReplayReport {
    let delay = opts.step_delay();
    let started = clock.now();

    sink.begin(trace.len());
    let mut delivered = 0usize;
    let mut outcome = ReplayOutcome::Completed;
    for (index, event) in trace.into_iter().enumerate() {
        if cancel.is_cancelled() {
            outcome = ReplayOutcome::Cancelled;
            break;
        }
        sink.on_event(index, &event);
        delivered += 1;
        clock.sleep(delay);
    }
    sink.end(outcome);

    ReplayReport {
        delivered,
        outcome,
        wall: clock.now().saturating_sub(started),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/driver.rs"]
mod tests;
