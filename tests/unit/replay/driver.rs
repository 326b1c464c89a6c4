use super::*;
use crate::grid::model::Pos;
use crate::replay::clock::VirtualClock;

fn sample_trace(n: usize) -> Trace {
    let mut trace = Trace::new();
    for i in 0..n {
        trace.push(TraceEvent::Visit(Pos::new(0, i)));
    }
    trace
}

/// Sink that requests cancellation after a fixed number of deliveries.
struct CancellingSink {
    delivered: Vec<TraceEvent>,
    cancel_after: usize,
    token: CancelToken,
    ended_with: Option<ReplayOutcome>,
}

impl CancellingSink {
    fn new(cancel_after: usize, token: CancelToken) -> Self {
        Self {
            delivered: Vec::new(),
            cancel_after,
            token,
            ended_with: None,
        }
    }
}

impl EventSink for CancellingSink {
    fn on_event(&mut self, _index: usize, event: &TraceEvent) {
        self.delivered.push(*event);
        if self.delivered.len() == self.cancel_after {
            self.token.cancel();
        }
    }

    fn end(&mut self, outcome: ReplayOutcome) {
        self.ended_with = Some(outcome);
    }
}

#[test]
fn step_delay_scales_with_rate() {
    let base = PaceOpts::default();
    assert_eq!(base.step_delay(), Duration::from_millis(25));

    assert_eq!(
        PaceOpts::with_rate(0.5).step_delay(),
        Duration::from_millis(50)
    );
    assert_eq!(
        PaceOpts::with_rate(2.0).step_delay(),
        Duration::from_micros(12_500)
    );
}

#[test]
fn zero_and_garbage_rates_clamp_to_the_epsilon() {
    // 25ms / 1e-4 = 250s: slow, but finite and well-defined.
    let clamped = Duration::from_secs(250);
    assert_eq!(PaceOpts::with_rate(0.0).step_delay(), clamped);
    assert_eq!(PaceOpts::with_rate(-3.0).step_delay(), clamped);
    assert_eq!(PaceOpts::with_rate(f64::NAN).step_delay(), clamped);
}

#[test]
fn replay_delivers_every_event_in_order() {
    let trace = sample_trace(5);
    let expected = trace.events().to_vec();

    let mut clock = VirtualClock::new();
    let mut sink = InMemorySink::new();
    let opts = PaceOpts {
        base_step: Duration::from_millis(10),
        rate: 1.0,
    };
    let report = replay(trace, &opts, &mut clock, &CancelToken::new(), &mut sink);

    assert_eq!(sink.events, expected);
    assert_eq!(sink.outcome, Some(ReplayOutcome::Completed));
    assert_eq!(report.delivered, 5);
    assert_eq!(report.outcome, ReplayOutcome::Completed);
    // One pacing delay per delivered event.
    assert_eq!(report.wall, Duration::from_millis(50));
}

#[test]
fn cancellation_halts_at_the_next_event_boundary() {
    let token = CancelToken::new();
    let mut sink = CancellingSink::new(2, token.clone());
    let mut clock = VirtualClock::new();

    let report = replay(
        sample_trace(10),
        &PaceOpts::default(),
        &mut clock,
        &token,
        &mut sink,
    );

    assert_eq!(report.delivered, 2);
    assert_eq!(report.outcome, ReplayOutcome::Cancelled);
    assert_eq!(sink.delivered.len(), 2, "no events after the cancel point");
    assert_eq!(sink.ended_with, Some(ReplayOutcome::Cancelled));
}

#[test]
fn pre_cancelled_token_delivers_nothing() {
    let token = CancelToken::new();
    token.cancel();

    let mut sink = InMemorySink::new();
    let mut clock = VirtualClock::new();
    let report = replay(
        sample_trace(3),
        &PaceOpts::default(),
        &mut clock,
        &token,
        &mut sink,
    );

    assert_eq!(report.delivered, 0);
    assert!(sink.events.is_empty());
    assert_eq!(sink.outcome, Some(ReplayOutcome::Cancelled));
}

#[test]
fn zero_base_step_replays_without_delay() {
    let mut clock = VirtualClock::new();
    let mut sink = InMemorySink::new();
    let opts = PaceOpts {
        base_step: Duration::ZERO,
        rate: 1.0,
    };
    let report = replay(
        sample_trace(4),
        &opts,
        &mut clock,
        &CancelToken::new(),
        &mut sink,
    );
    assert_eq!(report.delivered, 4);
    assert_eq!(report.wall, Duration::ZERO);
}

#[test]
fn empty_trace_completes_immediately() {
    let mut clock = VirtualClock::new();
    let mut sink = InMemorySink::new();
    let report = replay(
        Trace::new(),
        &PaceOpts::default(),
        &mut clock,
        &CancelToken::new(),
        &mut sink,
    );
    assert_eq!(report.delivered, 0);
    assert_eq!(report.outcome, ReplayOutcome::Completed);
    assert_eq!(sink.outcome, Some(ReplayOutcome::Completed));
}
