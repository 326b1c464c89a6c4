use std::cmp::Ordering;

use crate::array::model::ValueArray;
use crate::foundation::error::{StepvizError, StepvizResult};
use crate::trace::event::{Trace, TraceEvent};

/// Sort algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    /// Adjacent compare-and-swap passes.
    Bubble,
    /// Select the minimum of the unsorted region each pass.
    Selection,
    /// Shift each element into its place in the sorted prefix.
    Insertion,
    /// Last-element pivot, Lomuto partition; left partition fully first.
    Quick,
    /// Recursive halves merged through auxiliary buffers.
    Merge,
}

/// Result of one sort run.
#[derive(Clone, Debug)]
pub struct SortRun {
    /// Compare/swap/overwrite events in production order.
    pub trace: Trace,
    /// Value comparisons performed.
    pub comparisons: u64,
    /// Element accesses performed.
    pub accesses: u64,
}

/// Sort the array in place, recording a trace.
///
/// Every `Compare` is emitted immediately before the comparison it
/// announces and every `Swap`/`Overwrite` immediately after the mutation it
/// reports, so replaying the trace against a copy of the original input
/// passes through the exact intermediate states the algorithm held.
#[tracing::instrument(skip(array))]
pub fn sort(array: &mut ValueArray, algorithm: SortAlgorithm) -> StepvizResult<SortRun> {
    if array.is_empty() {
        return Err(StepvizError::sort("sort requires a non-empty array"));
    }

    array.reset_counters();
    let mut trace = Trace::new();

    match algorithm {
        SortAlgorithm::Bubble => bubble(array, &mut trace),
        SortAlgorithm::Selection => selection(array, &mut trace),
        SortAlgorithm::Insertion => insertion(array, &mut trace),
        SortAlgorithm::Quick => {
            let high = array.len() - 1;
            quick(array, &mut trace, 0, high);
        }
        SortAlgorithm::Merge => {
            let right = array.len() - 1;
            merge_sort(array, &mut trace, 0, right);
        }
    }

    tracing::debug!(
        ?algorithm,
        events = trace.len(),
        comparisons = array.comparisons(),
        "sort done"
    );
    Ok(SortRun {
        trace,
        comparisons: array.comparisons(),
        accesses: array.accesses(),
    })
}

fn bubble(a: &mut ValueArray, trace: &mut Trace) {
    let n = a.len();
    for i in 0..n {
        for j in 0..n - i - 1 {
            trace.push(TraceEvent::Compare(j, j + 1));
            if a.compare(j, j + 1) == Ordering::Greater {
                a.swap(j, j + 1);
                trace.push(TraceEvent::Swap(j, j + 1));
            }
        }
    }
}

fn selection(a: &mut ValueArray, trace: &mut Trace) {
    let n = a.len();
    for i in 0..n {
        let mut min_idx = i;
        for j in i + 1..n {
            trace.push(TraceEvent::Compare(min_idx, j));
            if a.compare(j, min_idx) == Ordering::Less {
                min_idx = j;
            }
        }
        if min_idx != i {
            a.swap(i, min_idx);
            trace.push(TraceEvent::Swap(i, min_idx));
        }
    }
}

fn insertion(a: &mut ValueArray, trace: &mut Trace) {
    let n = a.len();
    for i in 1..n {
        let key = a.read(i);
        let mut j = i;
        while j > 0 {
            trace.push(TraceEvent::Compare(j - 1, j));
            if a.compare_value(j - 1, key) != Ordering::Greater {
                break;
            }
            let shifted = a.read(j - 1);
            a.write(j, shifted);
            trace.push(TraceEvent::Overwrite(j, shifted));
            j -= 1;
        }
        a.write(j, key);
        trace.push(TraceEvent::Overwrite(j, key));
    }
}

fn quick(a: &mut ValueArray, trace: &mut Trace, low: usize, high: usize) {
    if low >= high {
        return;
    }
    let p = partition(a, trace, low, high);
    if p > low {
        quick(a, trace, low, p - 1);
    }
    quick(a, trace, p + 1, high);
}

fn partition(a: &mut ValueArray, trace: &mut Trace, low: usize, high: usize) -> usize {
    let pivot = a.read(high);
    let mut store = low;
    for j in low..high {
        trace.push(TraceEvent::Compare(j, high));
        if a.compare_value(j, pivot) == Ordering::Less {
            a.swap(store, j);
            trace.push(TraceEvent::Swap(store, j));
            store += 1;
        }
    }
    // The closing pivot swap is unconditional, even when it lands in place.
    a.swap(store, high);
    trace.push(TraceEvent::Swap(store, high));
    store
}

fn merge_sort(a: &mut ValueArray, trace: &mut Trace, left: usize, right: usize) {
    if left >= right {
        return;
    }
    let mid = left + (right - left) / 2;
    merge_sort(a, trace, left, mid);
    merge_sort(a, trace, mid + 1, right);
    merge(a, trace, left, mid, right);
}

fn merge(a: &mut ValueArray, trace: &mut Trace, left: usize, mid: usize, right: usize) {
    let left_buf = a.read_range(left..mid + 1);
    let right_buf = a.read_range(mid + 1..right + 1);

    let (mut i, mut j, mut k) = (0usize, 0usize, left);
    while i < left_buf.len() && j < right_buf.len() {
        trace.push(TraceEvent::Compare(left + i, mid + 1 + j));
        a.count_compare();
        if left_buf[i] <= right_buf[j] {
            a.write(k, left_buf[i]);
            trace.push(TraceEvent::Overwrite(k, left_buf[i]));
            i += 1;
        } else {
            a.write(k, right_buf[j]);
            trace.push(TraceEvent::Overwrite(k, right_buf[j]));
            j += 1;
        }
        k += 1;
    }

    while i < left_buf.len() {
        a.write(k, left_buf[i]);
        trace.push(TraceEvent::Overwrite(k, left_buf[i]));
        i += 1;
        k += 1;
    }
    while j < right_buf.len() {
        a.write(k, right_buf[j]);
        trace.push(TraceEvent::Overwrite(k, right_buf[j]));
        j += 1;
        k += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sort/engine.rs"]
mod tests;
