// Spike raster. The feed sends the indices of the neurons that fired at each
// timestep; they are stored as a dense 0/1 row so retention and windowing
// work exactly like every other plot.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{require_dims, WidgetError};
use crate::clock::WindowProvider;
use crate::store::DataStore;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Spike {
    pub time: f64,
    pub neuron: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RasterView {
    pub n_neurons: usize,
    /// Spikes inside the visible window, ordered by time then neuron.
    pub spikes: Vec<Spike>,
}

#[derive(Debug, Clone)]
pub struct Raster<W> {
    store: DataStore<W>,
    row: Vec<f64>,
}

impl<W: WindowProvider> Raster<W> {
    pub fn new(n_neurons: usize, window: W) -> Result<Self, WidgetError> {
        require_dims("raster", n_neurons)?;
        Ok(Self {
            store: DataStore::new(n_neurons, window, 0.0),
            row: vec![0.0; n_neurons + 1],
        })
    }

    pub fn store(&self) -> &DataStore<W> {
        &self.store
    }

    pub fn n_neurons(&self) -> usize {
        self.store.dims()
    }

    /// Record the neurons that fired at `time`. An empty list records a
    /// silent timestep.
    pub fn push_spikes(&mut self, time: f64, neurons: &[u32]) -> Result<(), WidgetError> {
        let n_neurons = self.n_neurons();
        if let Some(&neuron) = neurons.iter().find(|&&n| n as usize >= n_neurons) {
            return Err(WidgetError::NeuronOutOfRange { neuron, n_neurons });
        }

        self.row.fill(0.0);
        self.row[0] = time;
        for &n in neurons {
            self.row[n as usize + 1] = 1.0;
        }
        self.store.push(&self.row)?;
        Ok(())
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

    pub fn view(&mut self) -> RasterView {
        let shown = self.store.shown_data();
        let times = self.store.shown_times();

        let mut spikes = Vec::new();
        for (i, &time) in times.iter().enumerate() {
            for (neuron, column) in shown.iter().enumerate() {
                if column[i] > 0.5 {
                    spikes.push(Spike {
                        time,
                        neuron: neuron as u32,
                    });
                }
            }
        }

        RasterView {
            n_neurons: self.n_neurons(),
            spikes,
        }
    }
}
