use crate::clock::WindowProvider;
use crate::registry::ComponentRegistry;
use crate::widgets::Component;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A read-only summary of what a widget's store holds.
///
/// Design intent:
/// - Observers cannot push, trim or reset; they only read.
/// - Snapshotting is on-demand and allocates; the ingest path stays unchanged.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StoreSnapshot {
    pub uid: String,
    pub kind: &'static str,
    pub dims: usize,
    pub samples: usize,
    /// Retained history in seconds (newest minus oldest sample).
    pub span: f64,
    pub last_time: Option<f64>,
    pub at_end: bool,
}

pub struct ComponentAdapter<'a, W> {
    uid: &'a str,
    component: &'a Component<W>,
}

impl<'a, W: WindowProvider> ComponentAdapter<'a, W> {
    pub fn new(uid: &'a str, component: &'a Component<W>) -> Self {
        Self { uid, component }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let extent = self.component.extent();
        let span = match (extent.first_time, extent.last_time) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };

        StoreSnapshot {
            uid: self.uid.to_string(),
            kind: self.component.kind(),
            dims: extent.dims,
            samples: extent.samples,
            span,
            last_time: extent.last_time,
            at_end: self.component.is_at_end(),
        }
    }
}

/// Summary of a whole session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RegistrySnapshot {
    pub components: Vec<StoreSnapshot>,
    pub total_samples: usize,
}

pub struct RegistryAdapter<'a, W> {
    registry: &'a ComponentRegistry<W>,
}

impl<'a, W: WindowProvider + Clone> RegistryAdapter<'a, W> {
    pub fn new(registry: &'a ComponentRegistry<W>) -> Self {
        Self { registry }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let components: Vec<StoreSnapshot> = self
            .registry
            .uids()
            .filter_map(|uid| {
                self.registry
                    .get(uid)
                    .map(|c| ComponentAdapter::new(uid, c).snapshot())
            })
            .collect();
        let total_samples = components.iter().map(|s| s.samples).sum();

        RegistrySnapshot {
            components,
            total_samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{SharedClock, TimeSlider};
    use crate::widgets::ComponentSpec;

    fn registry() -> ComponentRegistry<SharedClock> {
        ComponentRegistry::new(TimeSlider::default().shared())
    }

    #[test]
    fn snapshot_reports_span_and_counts() {
        let mut reg = registry();
        reg.create(
            "scope",
            &ComponentSpec::Value {
                n_lines: 2,
                synapse: 0.0,
                labels: Vec::new(),
            },
        )
        .unwrap();
        reg.create("keys", &ComponentSpec::Pointer { keys: Vec::new() })
            .unwrap();
        reg.route_row("scope", &[0.5, 0.0, 0.0]).unwrap();
        reg.route_row("scope", &[1.5, 0.0, 0.0]).unwrap();

        let snap = RegistryAdapter::new(&reg).snapshot();
        assert_eq!(snap.total_samples, 2);
        assert_eq!(snap.components.len(), 2);

        let scope = &snap.components[0];
        assert_eq!(scope.uid, "scope");
        assert_eq!(scope.kind, "value");
        assert_eq!(scope.dims, 2);
        assert_eq!(scope.span, 1.0);
        assert_eq!(scope.last_time, Some(1.5));

        let keys = &snap.components[1];
        assert_eq!(keys.dims, 0);
        assert_eq!(keys.span, 0.0);
    }
}
