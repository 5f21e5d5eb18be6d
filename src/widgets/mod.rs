//! Plot widgets.
//!
//! A widget owns exactly one store, feeds it decoded simulator samples and
//! turns the windowed data into a numeric [`View`] on every redraw. Drawing
//! the view is left to whatever front-end consumes it.

mod pointer;
mod raster;
mod slider;
mod value;
mod xy;

pub use pointer::{Pointer, PointerView};
pub use raster::{Raster, RasterView, Spike};
pub use slider::{Slider, SliderView};
pub use value::{LinesView, Value};
pub use xy::{XyValue, XyView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::WindowProvider;
use crate::error::StoreError;

/// Default synapse for line plots; the other widgets show raw values.
pub const DEFAULT_VALUE_SYNAPSE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WidgetError {
    #[error("{kind} needs at least one dimension")]
    NoDimensions { kind: &'static str },

    #[error("axis index {index} out of range for {n_lines} lines")]
    AxisOutOfRange { index: usize, n_lines: usize },

    #[error("slider {index} out of range for {n_sliders} sliders")]
    SliderOutOfRange { index: usize, n_sliders: usize },

    #[error("neuron {neuron} out of range for {n_neurons} neurons")]
    NeuronOutOfRange { neuron: u32, n_neurons: usize },

    #[error("{kind} does not accept {input}")]
    Unsupported {
        kind: &'static str,
        input: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn require_dims(kind: &'static str, dims: usize) -> Result<(), WidgetError> {
    if dims == 0 {
        return Err(WidgetError::NoDimensions { kind });
    }
    Ok(())
}

/// How to build a widget, as announced by the simulator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ComponentSpec {
    Value {
        n_lines: usize,
        #[cfg_attr(feature = "serde", serde(default = "default_value_synapse"))]
        synapse: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        labels: Vec<String>,
    },
    XyValue {
        n_lines: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        index_x: usize,
        #[cfg_attr(feature = "serde", serde(default = "default_index_y"))]
        index_y: usize,
    },
    Raster {
        n_neurons: usize,
    },
    Slider {
        n_sliders: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        start_values: Vec<f64>,
    },
    Pointer {
        #[cfg_attr(feature = "serde", serde(default))]
        keys: Vec<String>,
    },
}

#[cfg(feature = "serde")]
fn default_value_synapse() -> f64 {
    DEFAULT_VALUE_SYNAPSE
}

#[cfg(feature = "serde")]
fn default_index_y() -> usize {
    1
}

impl ComponentSpec {
    pub fn build<W: WindowProvider>(&self, window: W) -> Result<Component<W>, WidgetError> {
        Ok(match self {
            ComponentSpec::Value {
                n_lines,
                synapse,
                labels,
            } => Component::Value(
                Value::new(*n_lines, window, *synapse)?.with_labels(labels.clone()),
            ),
            ComponentSpec::XyValue {
                n_lines,
                index_x,
                index_y,
            } => Component::XyValue(XyValue::new(*n_lines, *index_x, *index_y, window)?),
            ComponentSpec::Raster { n_neurons } => {
                Component::Raster(Raster::new(*n_neurons, window)?)
            }
            ComponentSpec::Slider {
                n_sliders,
                start_values,
            } => Component::Slider(Slider::new(*n_sliders, start_values, window)?),
            ComponentSpec::Pointer { keys } => Component::Pointer(Pointer::new(keys, window)?),
        })
    }
}

/// Numeric render model produced by a widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum View {
    Value(LinesView),
    XyValue(XyView),
    Raster(RasterView),
    Slider(SliderView),
    Pointer(PointerView),
}

/// A live widget of any kind.
#[derive(Debug, Clone)]
pub enum Component<W> {
    Value(Value<W>),
    XyValue(XyValue<W>),
    Raster(Raster<W>),
    Slider(Slider<W>),
    Pointer(Pointer<W>),
}

impl<W: WindowProvider> Component<W> {
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Value(_) => "value",
            Component::XyValue(_) => "xy_value",
            Component::Raster(_) => "raster",
            Component::Slider(_) => "slider",
            Component::Pointer(_) => "pointer",
        }
    }

    /// Route a `[time, values...]` row from the feed.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), WidgetError> {
        match self {
            Component::Value(w) => w.push(row),
            Component::XyValue(w) => w.push(row),
            Component::Slider(w) => w.push(row),
            Component::Pointer(w) => w.push(row),
            Component::Raster(_) => Err(WidgetError::Unsupported {
                kind: "raster",
                input: "value rows",
            }),
        }
    }

    pub fn push_spikes(&mut self, time: f64, neurons: &[u32]) -> Result<(), WidgetError> {
        match self {
            Component::Raster(w) => w.push_spikes(time, neurons),
            other => Err(WidgetError::Unsupported {
                kind: other.kind(),
                input: "spike lists",
            }),
        }
    }

    pub fn set_keys(&mut self, keys: &[String]) -> Result<(), WidgetError> {
        match self {
            Component::Pointer(w) => w.set_keys(keys),
            other => Err(WidgetError::Unsupported {
                kind: other.kind(),
                input: "vocabulary keys",
            }),
        }
    }

    pub fn update(&mut self) {
        match self {
            Component::Value(w) => w.update(),
            Component::XyValue(w) => w.update(),
            Component::Raster(w) => w.update(),
            Component::Slider(w) => w.update(),
            Component::Pointer(w) => w.update(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Component::Value(w) => w.reset(),
            Component::XyValue(w) => w.reset(),
            Component::Raster(w) => w.reset(),
            Component::Slider(w) => w.reset(),
            Component::Pointer(w) => w.reset(),
        }
    }

    /// Drop samples newer than `time`; older history is kept.
    pub fn rewind_to(&mut self, time: f64) {
        match self {
            Component::Value(w) => w.rewind_to(time),
            Component::XyValue(w) => w.rewind_to(time),
            Component::Raster(w) => w.rewind_to(time),
            Component::Slider(w) => w.rewind_to(time),
            Component::Pointer(w) => w.rewind_to(time),
        }
    }

    pub fn view(&mut self) -> View {
        match self {
            Component::Value(w) => View::Value(w.view()),
            Component::XyValue(w) => View::XyValue(w.view()),
            Component::Raster(w) => View::Raster(w.view()),
            Component::Slider(w) => View::Slider(w.view()),
            Component::Pointer(w) => View::Pointer(w.view()),
        }
    }

    /// Number of dimensions and retained samples, plus the retained time
    /// span.
    pub fn extent(&self) -> StoreExtent {
        match self {
            Component::Value(w) => StoreExtent::of(w.store().dims(), w.store().times()),
            Component::XyValue(w) => StoreExtent::of(w.store().dims(), w.store().times()),
            Component::Raster(w) => StoreExtent::of(w.store().dims(), w.store().times()),
            Component::Slider(w) => StoreExtent::of(w.store().dims(), w.store().times()),
            Component::Pointer(w) => StoreExtent::of(w.store().dims(), w.store().times()),
        }
    }

    pub fn is_at_end(&self) -> bool {
        match self {
            Component::Value(w) => w.store().is_at_end(),
            Component::XyValue(w) => w.store().is_at_end(),
            Component::Raster(w) => w.store().is_at_end(),
            Component::Slider(w) => w.store().is_at_end(),
            Component::Pointer(w) => w.store().is_at_end(),
        }
    }
}

/// Size of a widget's store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreExtent {
    pub dims: usize,
    pub samples: usize,
    pub first_time: Option<f64>,
    pub last_time: Option<f64>,
}

impl StoreExtent {
    fn of(dims: usize, times: &[f64]) -> Self {
        Self {
            dims,
            samples: times.len(),
            first_time: times.first().copied(),
            last_time: times.last().copied(),
        }
    }
}
