//! Network-diagram items.
//!
//! The simulator describes each object of the model with a `type` tag. Every
//! tag maps to exactly one [`NetItemKind`]; an unknown tag fails to parse
//! instead of being drawn as a placeholder.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum NetItemKind {
    #[cfg_attr(feature = "serde", serde(rename = "net"))]
    Network {
        #[cfg_attr(feature = "serde", serde(default))]
        expanded: bool,
    },
    #[cfg_attr(feature = "serde", serde(rename = "ens"))]
    Ensemble {
        #[cfg_attr(feature = "serde", serde(default))]
        n_neurons: usize,
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        dimensions: usize,
    },
    #[cfg_attr(feature = "serde", serde(rename = "node"))]
    Node {
        #[cfg_attr(feature = "serde", serde(default = "one"))]
        dimensions: usize,
    },
    #[cfg_attr(feature = "serde", serde(rename = "passthrough"))]
    PassthroughNode,
}

#[cfg(feature = "serde")]
fn one() -> usize {
    1
}

/// Outline used to draw an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Collapsed network box.
    Rect,
    /// Expanded network: open rectangle containing its children.
    OpenRect,
    /// Cluster of circles; more circles for higher-dimensional ensembles.
    EnsembleCluster { circles: u8 },
    RoundedRect,
    Point,
}

impl NetItemKind {
    pub fn shape(&self) -> Shape {
        match self {
            NetItemKind::Network { expanded: false } => Shape::Rect,
            NetItemKind::Network { expanded: true } => Shape::OpenRect,
            NetItemKind::Ensemble { dimensions, .. } => Shape::EnsembleCluster {
                circles: if *dimensions > 1 { 3 } else { 1 },
            },
            NetItemKind::Node { .. } => Shape::RoundedRect,
            NetItemKind::PassthroughNode => Shape::Point,
        }
    }

    /// Default size as a fraction of the parent's extent.
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            NetItemKind::Network { .. } => (0.15, 0.15),
            NetItemKind::Ensemble { .. } => (0.1, 0.1),
            NetItemKind::Node { .. } => (0.1, 0.1),
            NetItemKind::PassthroughNode => (0.02, 0.02),
        }
    }

    /// Short name used in logs and minimap legends.
    pub fn label(&self) -> &'static str {
        match self {
            NetItemKind::Network { .. } => "network",
            NetItemKind::Ensemble { .. } => "ensemble",
            NetItemKind::Node { .. } => "node",
            NetItemKind::PassthroughNode => "passthrough",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetItem {
    pub uid: String,
    pub label: String,
    pub kind: NetItemKind,
    /// Uid of the enclosing network; `None` for the top level.
    pub parent: Option<String>,
}

/// Items of one diagram, keyed by uid. Owned by a session, never global.
#[derive(Debug, Clone, Default)]
pub struct NetItems {
    items: HashMap<String, NetItem>,
}

impl NetItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert or replace an item.
    pub fn upsert(&mut self, item: NetItem) {
        self.items.insert(item.uid.clone(), item);
    }

    /// Remove an item and everything nested inside it.
    pub fn remove(&mut self, uid: &str) -> usize {
        if self.items.remove(uid).is_none() {
            return 0;
        }
        let children: Vec<String> = self
            .items
            .values()
            .filter(|item| item.parent.as_deref() == Some(uid))
            .map(|item| item.uid.clone())
            .collect();
        1 + children.iter().map(|c| self.remove(c)).sum::<usize>()
    }

    pub fn get(&self, uid: &str) -> Option<&NetItem> {
        self.items.get(uid)
    }

    pub fn children_of<'a>(&'a self, uid: &'a str) -> impl Iterator<Item = &'a NetItem> + 'a {
        self.items
            .values()
            .filter(move |item| item.parent.as_deref() == Some(uid))
    }

    /// Item counts per kind label, sorted by label.
    pub fn census(&self) -> Vec<(&'static str, usize)> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for item in self.items.values() {
            *counts.entry(item.kind.label()).or_default() += 1;
        }
        let mut out: Vec<_> = counts.into_iter().collect();
        out.sort_unstable_by_key(|(label, _)| *label);
        out
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(uid: &str, kind: NetItemKind, parent: Option<&str>) -> NetItem {
        NetItem {
            uid: uid.to_string(),
            label: uid.to_string(),
            kind,
            parent: parent.map(str::to_string),
        }
    }

    #[test]
    fn every_kind_has_a_shape() {
        assert_eq!(NetItemKind::Network { expanded: false }.shape(), Shape::Rect);
        assert_eq!(NetItemKind::Network { expanded: true }.shape(), Shape::OpenRect);
        assert_eq!(
            NetItemKind::Ensemble {
                n_neurons: 50,
                dimensions: 2
            }
            .shape(),
            Shape::EnsembleCluster { circles: 3 }
        );
        assert_eq!(NetItemKind::Node { dimensions: 1 }.shape(), Shape::RoundedRect);
        assert_eq!(NetItemKind::PassthroughNode.shape(), Shape::Point);
    }

    #[test]
    fn remove_takes_nested_items() {
        let mut items = NetItems::new();
        items.upsert(item("net", NetItemKind::Network { expanded: true }, None));
        items.upsert(item("sub", NetItemKind::Network { expanded: true }, Some("net")));
        items.upsert(item("a", NetItemKind::Node { dimensions: 1 }, Some("sub")));
        items.upsert(item("b", NetItemKind::PassthroughNode, None));

        assert_eq!(items.children_of("net").count(), 1);
        assert_eq!(items.remove("net"), 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items.remove("net"), 0);
    }

    #[test]
    fn census_counts_by_kind() {
        let mut items = NetItems::new();
        items.upsert(item("a", NetItemKind::Node { dimensions: 1 }, None));
        items.upsert(item("b", NetItemKind::Node { dimensions: 2 }, None));
        items.upsert(item(
            "c",
            NetItemKind::Ensemble {
                n_neurons: 10,
                dimensions: 1,
            },
            None,
        ));
        assert_eq!(items.census(), vec![("ensemble", 1), ("node", 2)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn kinds_parse_from_type_tag() {
        let kind: NetItemKind =
            serde_json::from_str(r#"{"type":"ens","n_neurons":100,"dimensions":2}"#).unwrap();
        assert_eq!(
            kind,
            NetItemKind::Ensemble {
                n_neurons: 100,
                dimensions: 2
            }
        );
        let kind: NetItemKind = serde_json::from_str(r#"{"type":"node"}"#).unwrap();
        assert_eq!(kind, NetItemKind::Node { dimensions: 1 });
        let kind: NetItemKind = serde_json::from_str(r#"{"type":"passthrough"}"#).unwrap();
        assert_eq!(kind, NetItemKind::PassthroughNode);

        assert!(serde_json::from_str::<NetItemKind>(r#"{"type":"mystery"}"#).is_err());
    }
}
