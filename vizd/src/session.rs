//! One connected simulator: its clock, widgets and diagram items.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use nengo_viz::clock::{SharedClock, TimeAdvance, TimeSlider};
use nengo_viz::netgraph::NetItems;
use nengo_viz::observer::{RegistryAdapter, RegistrySnapshot};
use nengo_viz::protocol::{FeedMessage, ProtocolError};
use nengo_viz::registry::{ComponentRegistry, RegistryError};
use nengo_viz::widgets::View;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("feed connection: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode views: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Rendered state of every widget at one redraw tick.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub time: f64,
    pub at_end: bool,
    pub views: Vec<NamedView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedView {
    pub uid: String,
    #[serde(flatten)]
    pub view: View,
}

pub struct Session {
    clock: SharedClock,
    registry: ComponentRegistry<SharedClock>,
    items: NetItems,
    frames: u64,
}

impl Session {
    pub fn new(kept_time: f64, shown_time: f64) -> Self {
        let clock = TimeSlider::new(kept_time, shown_time).shared();
        let registry = ComponentRegistry::new(clock.clone());
        Self {
            clock,
            registry,
            items: NetItems::new(),
            frames: 0,
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn registry(&self) -> &ComponentRegistry<SharedClock> {
        &self.registry
    }

    pub fn items(&self) -> &NetItems {
        &self.items
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Parse and apply one feed line.
    pub fn handle_line(&mut self, line: &str) -> Result<(), ClientError> {
        let msg = FeedMessage::parse(line)?;
        self.apply(msg)
    }

    pub fn apply(&mut self, msg: FeedMessage) -> Result<(), ClientError> {
        if let Some(item) = msg.net_item() {
            debug!(uid = %item.uid, kind = item.kind.label(), "net item");
            self.items.upsert(item);
            return Ok(());
        }

        match msg {
            FeedMessage::CreateComponent { uid, spec } => self.registry.create(&uid, &spec)?,
            FeedMessage::RemoveComponent { uid } => {
                if self.registry.remove(&uid).is_none() {
                    return Err(RegistryError::UnknownComponent(uid).into());
                }
            }
            FeedMessage::Data { uid, row } => self.registry.route_row(&uid, &row)?,
            FeedMessage::Spikes { uid, t, neurons } => {
                self.registry.route_spikes(&uid, t, &neurons)?
            }
            FeedMessage::Keys { uid, keys } => self.registry.set_keys(&uid, &keys)?,
            FeedMessage::Time { t } => {
                let advance = self.clock.borrow_mut().add_time(t);
                if advance == TimeAdvance::Rewound {
                    info!(t, "simulation time went backwards; dropping newer samples");
                    self.registry.rewind_all(t);
                }
            }
            FeedMessage::RemoveNetItem { uid } => {
                let removed = self.items.remove(&uid);
                debug!(uid, removed, "net item removed");
            }
            FeedMessage::Reset => {
                info!("simulator reset");
                self.clock.borrow_mut().reset();
                self.registry.reset_all();
            }
            FeedMessage::NetItem { .. } => {}
        }
        Ok(())
    }

    /// Redraw tick: trim every store, then collect the views.
    pub fn render(&mut self) -> Frame {
        self.registry.update_all();
        self.frames += 1;

        let (time, at_end) = {
            let clock = self.clock.borrow();
            (clock.last_time, clock.is_at_end())
        };
        let views = self
            .registry
            .views()
            .into_iter()
            .map(|(uid, view)| NamedView { uid, view })
            .collect();

        Frame {
            time,
            at_end,
            views,
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistryAdapter::new(&self.registry).snapshot()
    }
}
