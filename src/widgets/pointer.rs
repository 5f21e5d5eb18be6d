// Semantic-pointer similarity plot: one line per vocabulary term. Terms can
// show up while the simulation runs, so the store grows with the vocabulary.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::WidgetError;
use crate::clock::WindowProvider;
use crate::growable::GrowableDataStore;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PointerView {
    pub times: Vec<f64>,
    pub keys: Vec<String>,
    /// One series per key; `None` before the key existed.
    pub series: Vec<Vec<Option<f64>>>,
    /// Key with the highest similarity in the newest visible sample.
    pub best: Option<String>,
    pub at_end: bool,
}

#[derive(Debug, Clone)]
pub struct Pointer<W> {
    store: GrowableDataStore<W>,
    keys: Vec<String>,
}

impl<W: WindowProvider> Pointer<W> {
    pub fn new(keys: &[String], window: W) -> Result<Self, WidgetError> {
        let mut pointer = Self {
            store: GrowableDataStore::new(0, window, 0.0),
            keys: Vec::new(),
        };
        pointer.set_keys(keys)?;
        Ok(pointer)
    }

    pub fn store(&self) -> &GrowableDataStore<W> {
        &self.store
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Announce the current vocabulary. Unknown keys are appended as new
    /// dimensions; known keys keep their position.
    pub fn set_keys(&mut self, keys: &[String]) -> Result<(), WidgetError> {
        for key in keys {
            if !self.keys.contains(key) {
                self.keys.push(key.clone());
            }
        }
        self.store.set_dims(self.keys.len())?;
        Ok(())
    }

    /// `[time, similarity per key]`, in key order.
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

    pub fn view(&mut self) -> PointerView {
        let series = self.store.shown_data();
        let best = self
            .store
            .last_data()
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| self.keys[i].clone());

        PointerView {
            times: self.store.shown_times().to_vec(),
            keys: self.keys.clone(),
            series,
            best,
            at_end: self.store.is_at_end(),
        }
    }
}
