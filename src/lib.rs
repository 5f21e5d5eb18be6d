//! # nengo_viz
//!
//! Client-side data core for a live neural-simulation GUI.
//!
//! The simulator streams `[time, v0, v1, ...]` rows; every plot widget keeps
//! them in a [`DataStore`](store::DataStore) (or a
//! [`GrowableDataStore`](growable::GrowableDataStore) when new dimensions can
//! appear mid-run), low-pass filters them on the way in, trims them to the
//! retention window, and reads windowed views back on each redraw.
//!
//! ## Quick Start
//!
//! ```
//! use nengo_viz::prelude::*;
//!
//! let clock = TimeSlider::new(4.0, 0.5).shared();
//! let mut store = DataStore::new(2, clock.clone(), 0.0);
//!
//! store.push(&[0.1, 1.0, -1.0]).unwrap();
//! clock.borrow_mut().add_time(0.2);
//!
//! store.update();
//! let shown = store.shown_data();
//! assert_eq!(shown, vec![vec![1.0], vec![-1.0]]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization for stores, views, component specs,
//!   net items and the feed protocol
//!
//! ## Modules
//!
//! - [`store`], [`growable`]: the time-series stores
//! - [`clock`]: the time slider that defines retained and visible windows
//! - [`widgets`]: plot widgets built on the stores
//! - [`registry`]: per-session collection of live widgets
//! - [`netgraph`]: network-diagram item kinds
//! - [`protocol`]: simulator feed messages
//! - [`observer`]: read-only store summaries

#[path = "core/filter.rs"]
pub mod filter;

#[path = "core/buffer.rs"]
pub mod buffer;

#[path = "core/clock.rs"]
pub mod clock;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/store.rs"]
pub mod store;

#[path = "core/growable.rs"]
pub mod growable;

pub mod netgraph;
pub mod observer;
pub mod registry;
pub mod widgets;

#[cfg(feature = "serde")]
pub mod protocol;

/// Prelude module for convenient imports.
///
/// ```
/// use nengo_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{SharedClock, TimeAdvance, TimeSlider, WindowProvider};
    pub use crate::error::StoreError;
    pub use crate::growable::GrowableDataStore;
    pub use crate::netgraph::{NetItem, NetItemKind, NetItems, Shape};
    pub use crate::registry::{ComponentRegistry, RegistryError};
    pub use crate::store::DataStore;
    pub use crate::widgets::{Component, ComponentSpec, View, WidgetError};
}
