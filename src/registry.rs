//! Live widgets of one client session.
//!
//! The registry is created by the session and handed to whatever needs it;
//! two sessions (two open models) keep fully separate registries and clocks.

use hashbrown::HashMap;
use thiserror::Error;

use crate::clock::WindowProvider;
use crate::widgets::{Component, ComponentSpec, View, WidgetError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no component with uid `{0}`")]
    UnknownComponent(String),

    #[error("component `{uid}`: {source}")]
    Widget {
        uid: String,
        #[source]
        source: WidgetError,
    },
}

impl RegistryError {
    fn widget(uid: &str, source: WidgetError) -> Self {
        RegistryError::Widget {
            uid: uid.to_string(),
            source,
        }
    }
}

/// Widgets keyed by uid, kept in creation order.
pub struct ComponentRegistry<W> {
    window: W,
    components: HashMap<String, Component<W>>,
    order: Vec<String>,
}

impl<W: WindowProvider + Clone> ComponentRegistry<W> {
    /// `window` is the clock every widget created through [`create`] reads.
    ///
    /// [`create`]: Self::create
    pub fn new(window: W) -> Self {
        Self {
            window,
            components: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Uids in creation order.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Build a widget from `spec` and register it. A widget already
    /// registered under `uid` is replaced.
    pub fn create(&mut self, uid: &str, spec: &ComponentSpec) -> Result<(), RegistryError> {
        let component = spec
            .build(self.window.clone())
            .map_err(|e| RegistryError::widget(uid, e))?;
        self.insert(uid, component);
        Ok(())
    }

    pub fn insert(&mut self, uid: &str, component: Component<W>) {
        tracing::debug!(uid, kind = component.kind(), "component registered");
        if self.components.insert(uid.to_string(), component).is_none() {
            self.order.push(uid.to_string());
        }
    }

    pub fn remove(&mut self, uid: &str) -> Option<Component<W>> {
        let removed = self.components.remove(uid)?;
        self.order.retain(|u| u != uid);
        tracing::debug!(uid, "component removed");
        Some(removed)
    }

    pub fn get(&self, uid: &str) -> Option<&Component<W>> {
        self.components.get(uid)
    }

    pub fn get_mut(&mut self, uid: &str) -> Option<&mut Component<W>> {
        self.components.get_mut(uid)
    }

    fn lookup(&mut self, uid: &str) -> Result<&mut Component<W>, RegistryError> {
        self.components
            .get_mut(uid)
            .ok_or_else(|| RegistryError::UnknownComponent(uid.to_string()))
    }

    pub fn route_row(&mut self, uid: &str, row: &[f64]) -> Result<(), RegistryError> {
        self.lookup(uid)?
            .push_row(row)
            .map_err(|e| RegistryError::widget(uid, e))
    }

    pub fn route_spikes(
        &mut self,
        uid: &str,
        time: f64,
        neurons: &[u32],
    ) -> Result<(), RegistryError> {
        self.lookup(uid)?
            .push_spikes(time, neurons)
            .map_err(|e| RegistryError::widget(uid, e))
    }

    pub fn set_keys(&mut self, uid: &str, keys: &[String]) -> Result<(), RegistryError> {
        self.lookup(uid)?
            .set_keys(keys)
            .map_err(|e| RegistryError::widget(uid, e))
    }

    /// Retention pass over every widget; run once per redraw tick.
    pub fn update_all(&mut self) {
        for component in self.components.values_mut() {
            component.update();
        }
    }

    /// Drop all recorded data, e.g. after the simulation was reset.
    pub fn reset_all(&mut self) {
        for component in self.components.values_mut() {
            component.reset();
        }
    }

    /// Simulation restarted at `time`: drop every sample recorded after it.
    /// Rows the new run already delivered are kept.
    pub fn rewind_all(&mut self, time: f64) {
        for component in self.components.values_mut() {
            component.rewind_to(time);
        }
    }

    /// Views of every widget, in creation order.
    pub fn views(&mut self) -> Vec<(String, View)> {
        let mut out = Vec::with_capacity(self.order.len());
        for uid in &self.order {
            if let Some(component) = self.components.get_mut(uid) {
                out.push((uid.clone(), component.view()));
            }
        }
        out
    }
}
