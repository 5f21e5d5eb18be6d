// Raw storage behind every data store: one shared time axis plus one column
// of filtered values per dimension.
//
// Columns may start late. A column created after `n` samples were recorded
// has `start == n` and never holds values for earlier slots, so for every
// column `start + values.len() == times.len()` once a push completes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Values of a single dimension, aligned to the tail of the time axis.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    /// Index into `times` of this column's first value.
    start: usize,
    values: Vec<f64>,
}

impl Column {
    fn starting_at(start: usize) -> Self {
        Self {
            start,
            values: Vec::new(),
        }
    }

    /// Time index at which this column started recording.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Value at time index `index`, or `None` if the column did not exist yet
    /// (or `index` is past the end).
    pub fn get(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(self.start)
            .and_then(|i| self.values.get(i).copied())
    }

    fn truncate_at(&mut self, index: usize) {
        if index <= self.start {
            self.values.clear();
            self.start = index;
        } else {
            self.values.truncate(index - self.start);
        }
    }

    fn drop_front(&mut self, count: usize) {
        if count <= self.start {
            self.start -= count;
        } else {
            let n = (count - self.start).min(self.values.len());
            self.values.drain(..n);
            self.start = 0;
        }
    }
}

/// Time axis plus per-dimension columns.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleBuffer {
    times: Vec<f64>,
    columns: Vec<Column>,
}

impl SampleBuffer {
    pub fn new(dims: usize) -> Self {
        Self {
            times: Vec::new(),
            columns: (0..dims).map(|_| Column::starting_at(0)).collect(),
        }
    }

    pub fn dims(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, dim: usize) -> Option<&Column> {
        self.columns.get(dim)
    }

    /// Add an empty column that starts recording with the next sample.
    pub fn add_column(&mut self) {
        let start = self.times.len();
        self.columns.push(Column::starting_at(start));
    }

    /// First index whose time is `>= t`, or `len()` if there is none.
    ///
    /// Times are strictly increasing, so this is the same position a forward
    /// scan from the oldest sample would stop at.
    pub fn index_at_or_after(&self, t: f64) -> usize {
        self.times.partition_point(|&x| x < t)
    }

    /// First index whose time is `> t`, or `len()` if there is none.
    pub fn index_after(&self, t: f64) -> usize {
        self.times.partition_point(|&x| x <= t)
    }

    /// Discard every sample at time index `index` and later.
    pub fn truncate(&mut self, index: usize) {
        if index >= self.times.len() {
            return;
        }
        self.times.truncate(index);
        for column in &mut self.columns {
            column.truncate_at(index);
        }
    }

    /// Discard the `count` oldest samples.
    pub fn drop_front(&mut self, count: usize) {
        let count = count.min(self.times.len());
        if count == 0 {
            return;
        }
        self.times.drain(..count);
        for column in &mut self.columns {
            column.drop_front(count);
        }
    }

    /// Append one already-filtered sample. `values.len()` must equal `dims()`.
    pub fn append(&mut self, time: f64, values: &[f64]) {
        debug_assert_eq!(values.len(), self.columns.len());
        for (column, &v) in self.columns.iter_mut().zip(values) {
            column.values.push(v);
        }
        self.times.push(time);
    }

    /// Drop all samples. Columns are kept and restart at index 0.
    pub fn clear(&mut self) {
        self.times.clear();
        for column in &mut self.columns {
            column.values.clear();
            column.start = 0;
        }
    }
}
