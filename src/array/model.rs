use std::cmp::Ordering;
use std::ops::Range;

use crate::foundation::error::{StepvizError, StepvizResult};
use crate::foundation::math::seeded_unit;

/// Generated values land in `[VALUE_MIN, VALUE_MIN + VALUE_SPAN)`.
const VALUE_MIN: u32 = 20;
const VALUE_SPAN: u32 = 350;

/// A mutable sequence of comparable values with instrumentation counters.
///
/// Engines mutate the sequence in place through the instrumented primitives
/// below, so comparison/access accounting follows one rule everywhere:
/// a comparison reads two element values (+2 accesses), a swap moves two
/// elements (+4 accesses), a single read or write is one access, and a
/// buffered copy costs one access per element. Length is constant for the
/// lifetime of the array.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ValueArray {
    values: Vec<u32>,
    #[serde(skip)]
    comparisons: u64,
    #[serde(skip)]
    accesses: u64,
}

impl ValueArray {
    /// Generate `len` values deterministically from a seed.
    pub fn generate(len: usize, seed: u64) -> StepvizResult<Self> {
        if len == 0 {
            return Err(StepvizError::validation("array length must be > 0"));
        }
        let values = (0..len)
            .map(|i| VALUE_MIN + (seeded_unit(seed, &[i as u64]) * f64::from(VALUE_SPAN)) as u32)
            .collect();
        Ok(Self {
            values,
            comparisons: 0,
            accesses: 0,
        })
    }

    /// Wrap explicit values.
    pub fn from_values(values: Vec<u32>) -> StepvizResult<Self> {
        if values.is_empty() {
            return Err(StepvizError::validation("array length must be > 0"));
        }
        Ok(Self {
            values,
            comparisons: 0,
            accesses: 0,
        })
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` post-construction; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current values (uninstrumented view for renderers and tests).
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Comparison count since the last reset.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Element access count since the last reset.
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Zero both counters.
    pub fn reset_counters(&mut self) {
        self.comparisons = 0;
        self.accesses = 0;
    }

    /// `true` when values are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.values.is_sorted()
    }

    /// Compare the elements at two indices.
    pub fn compare(&mut self, i: usize, j: usize) -> Ordering {
        self.comparisons += 1;
        self.accesses += 2;
        self.values[i].cmp(&self.values[j])
    }

    /// Compare the element at `i` against an already-read value.
    pub fn compare_value(&mut self, i: usize, value: u32) -> Ordering {
        self.comparisons += 1;
        self.accesses += 2;
        self.values[i].cmp(&value)
    }

    /// Record a comparison performed on buffered copies (merge step).
    pub fn count_compare(&mut self) {
        self.comparisons += 1;
        self.accesses += 2;
    }

    /// Swap two elements.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
        self.accesses += 4;
    }

    /// Read one element.
    pub fn read(&mut self, i: usize) -> u32 {
        self.accesses += 1;
        self.values[i]
    }

    /// Write one element.
    pub fn write(&mut self, i: usize, value: u32) {
        self.accesses += 1;
        self.values[i] = value;
    }

    /// Copy a range into an auxiliary buffer, one access per element.
    pub fn read_range(&mut self, range: Range<usize>) -> Vec<u32> {
        self.accesses += range.len() as u64;
        self.values[range].to_vec()
    }
}
