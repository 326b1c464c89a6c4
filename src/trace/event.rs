use crate::grid::model::Pos;

/// One discrete algorithm decision, recorded in the order it was made.
///
/// Events carry exactly the data a renderer needs to update its view and a
/// statistics counter needs to increment. Engines never reorder or batch
/// them: the trace is the single source of truth for replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TraceEvent {
    /// A search engine finalized this cell (start/end excluded).
    Visit(Pos),
    /// This cell lies on the reconstructed start-to-goal path.
    PathMark(Pos),
    /// The values at these two indices are about to be compared.
    Compare(usize, usize),
    /// The values at these two indices were swapped.
    Swap(usize, usize),
    /// This value was written at this index.
    Overwrite(usize, u32),
}

/// An ordered, finite trace of events recorded by one engine run.
///
/// Replay consumes a trace by value; a consumed trace cannot be restarted and
/// a fresh engine invocation is required per run. Clone explicitly when a
/// second pass over the same events is wanted (tests, dumps).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` when the run produced no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recorded events in production order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }
}

impl IntoIterator for Trace {
    type Item = TraceEvent;
    type IntoIter = std::vec::IntoIter<TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
