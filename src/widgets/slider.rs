// Slider bank. Shows the value the simulator last reported for each input,
// unless the user is holding a slider, in which case the user's value wins.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{require_dims, WidgetError};
use crate::clock::WindowProvider;
use crate::store::DataStore;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SliderView {
    pub values: Vec<f64>,
    /// Which sliders currently hold a user-set value.
    pub overridden: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct Slider<W> {
    store: DataStore<W>,
    start_values: Vec<f64>,
    overrides: Vec<Option<f64>>,
}

impl<W: WindowProvider> Slider<W> {
    /// `start_values` is padded with zeros (or cut) to `n_sliders`.
    pub fn new(n_sliders: usize, start_values: &[f64], window: W) -> Result<Self, WidgetError> {
        require_dims("slider", n_sliders)?;
        let mut start = start_values.to_vec();
        start.resize(n_sliders, 0.0);
        Ok(Self {
            store: DataStore::new(n_sliders, window, 0.0),
            start_values: start,
            overrides: vec![None; n_sliders],
        })
    }

    pub fn store(&self) -> &DataStore<W> {
        &self.store
    }

    pub fn n_sliders(&self) -> usize {
        self.overrides.len()
    }

    /// Hold slider `index` at `value` until released.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), WidgetError> {
        let n_sliders = self.n_sliders();
        let slot = self
            .overrides
            .get_mut(index)
            .ok_or(WidgetError::SliderOutOfRange { index, n_sliders })?;
        *slot = Some(value);
        Ok(())
    }

    /// Let slider `index` follow the simulator again.
    pub fn release(&mut self, index: usize) -> Result<(), WidgetError> {
        let n_sliders = self.n_sliders();
        let slot = self
            .overrides
            .get_mut(index)
            .ok_or(WidgetError::SliderOutOfRange { index, n_sliders })?;
        *slot = None;
        Ok(())
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

    /// Back to the start values; user overrides are dropped.
    pub fn reset(&mut self) {
        self.store.reset();
        self.overrides.fill(None);
    }

    pub fn view(&mut self) -> SliderView {
        let reported = self.store.last_data();
        let values = (0..self.n_sliders())
            .map(|i| {
                self.overrides[i]
                    .or_else(|| reported.get(i).copied())
                    .unwrap_or(self.start_values[i])
            })
            .collect();
        SliderView {
            values,
            overridden: self.overrides.iter().map(Option::is_some).collect(),
        }
    }
}
