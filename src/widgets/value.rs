// Line plot of one or more decoded values over time.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{require_dims, WidgetError};
use crate::clock::WindowProvider;
use crate::store::DataStore;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LinesView {
    /// X coordinates shared by every line.
    pub times: Vec<f64>,
    /// One series per dimension, aligned with `times`.
    pub lines: Vec<Vec<f64>>,
    pub labels: Vec<String>,
    pub y_range: [f64; 2],
    pub at_end: bool,
}

#[derive(Debug, Clone)]
pub struct Value<W> {
    store: DataStore<W>,
    labels: Vec<String>,
    y_range: [f64; 2],
}

impl<W: WindowProvider> Value<W> {
    pub fn new(n_lines: usize, window: W, synapse: f64) -> Result<Self, WidgetError> {
        require_dims("value", n_lines)?;
        Ok(Self {
            store: DataStore::new(n_lines, window, synapse),
            labels: Vec::new(),
            y_range: [-1.0, 1.0],
        })
    }

    /// Legend labels; missing entries are numbered.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) {
        if min < max {
            self.y_range = [min, max];
        }
    }

    pub fn store(&self) -> &DataStore<W> {
        &self.store
    }

    pub fn push(&mut self, row: &[f64]) -> Result<(), WidgetError> {
        Ok(self.store.push(row)?)
    }

    pub fn update(&mut self) {
        self.store.update();
    }

    pub fn rewind_to(&mut self, time: f64) {
        self.store.rewind_to(time);
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn view(&mut self) -> LinesView {
        let lines = self.store.shown_data();
        let times = self.store.shown_times().to_vec();
        let labels = (0..self.store.dims())
            .map(|i| {
                self.labels
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("{}", i))
            })
            .collect();
        LinesView {
            times,
            lines,
            labels,
            y_range: self.y_range,
            at_end: self.store.is_at_end(),
        }
    }
}
