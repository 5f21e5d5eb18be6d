//! Simulator feed messages.
//!
//! The feed is newline-delimited JSON, one message per line, tagged by
//! `type`. Sample rows carry `[time, v0, v1, ...]` exactly as widgets push
//! them into their stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::netgraph::{NetItem, NetItemKind};
use crate::widgets::ComponentSpec;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedMessage {
    /// A plot widget was added to the page.
    CreateComponent { uid: String, spec: ComponentSpec },
    RemoveComponent { uid: String },
    /// One sample row for a value-style widget.
    Data { uid: String, row: Vec<f64> },
    /// Neurons that fired at time `t`.
    Spikes { uid: String, t: f64, neurons: Vec<u32> },
    /// Current vocabulary of a semantic-pointer widget.
    Keys { uid: String, keys: Vec<String> },
    /// Simulation clock tick. Only this message moves the time slider;
    /// sample rows may lag behind it.
    Time { t: f64 },
    NetItem {
        uid: String,
        #[serde(default)]
        label: String,
        #[serde(default)]
        parent: Option<String>,
        info: NetItemKind,
    },
    RemoveNetItem { uid: String },
    /// The simulator was reset; all recorded data is stale.
    Reset,
}

impl FeedMessage {
    /// Parse one feed line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }
        Ok(serde_json::from_str(line)?)
    }

    pub fn to_line(&self) -> Result<String, ProtocolError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Build the diagram item described by a `NetItem` message.
    pub fn net_item(&self) -> Option<NetItem> {
        match self {
            FeedMessage::NetItem {
                uid,
                label,
                parent,
                info,
            } => Some(NetItem {
                uid: uid.clone(),
                label: if label.is_empty() { uid.clone() } else { label.clone() },
                kind: info.clone(),
                parent: parent.clone(),
            }),
            _ => None,
        }
    }
}
