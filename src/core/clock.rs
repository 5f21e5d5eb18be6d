//! Simulation clock and the visible/retained time windows.
//!
//! Stores never cache these values: every `update` and query reads the
//! provider again, so moving the time slider takes effect on the next redraw.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Source of the time windows a store is trimmed and queried against.
pub trait WindowProvider {
    /// Most recent simulation time reported by the simulator.
    fn last_time(&self) -> f64;
    /// How much history (seconds) is retained behind `last_time`.
    fn kept_time(&self) -> f64;
    /// Left edge of the visible window.
    fn first_shown_time(&self) -> f64;
    /// Width of the visible window.
    fn shown_time(&self) -> f64;
}

impl<T: WindowProvider + ?Sized> WindowProvider for &T {
    fn last_time(&self) -> f64 {
        (**self).last_time()
    }
    fn kept_time(&self) -> f64 {
        (**self).kept_time()
    }
    fn first_shown_time(&self) -> f64 {
        (**self).first_shown_time()
    }
    fn shown_time(&self) -> f64 {
        (**self).shown_time()
    }
}

impl<T: WindowProvider> WindowProvider for Rc<RefCell<T>> {
    fn last_time(&self) -> f64 {
        self.borrow().last_time()
    }
    fn kept_time(&self) -> f64 {
        self.borrow().kept_time()
    }
    fn first_shown_time(&self) -> f64 {
        self.borrow().first_shown_time()
    }
    fn shown_time(&self) -> f64 {
        self.borrow().shown_time()
    }
}

pub const DEFAULT_KEPT_TIME: f64 = 4.0;
pub const DEFAULT_SHOWN_TIME: f64 = 0.5;

/// Result of feeding a new simulation time into the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAdvance {
    Advanced,
    /// Time went backwards: the simulator was reset. The slider has already
    /// reset itself; callers should reset their stores.
    Rewound,
}

/// The simulator's time slider.
///
/// Tracks the latest simulation time, how much history is kept, and which
/// part of it is currently visible. While the user is not scrubbing, the
/// visible window follows `last_time`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSlider {
    pub last_time: f64,
    pub kept_time: f64,
    pub first_shown_time: f64,
    pub shown_time: f64,
}

impl Default for TimeSlider {
    fn default() -> Self {
        Self::new(DEFAULT_KEPT_TIME, DEFAULT_SHOWN_TIME)
    }
}

impl TimeSlider {
    pub fn new(kept_time: f64, shown_time: f64) -> Self {
        let kept_time = kept_time.max(f64::EPSILON);
        let shown_time = shown_time.clamp(f64::EPSILON, kept_time);
        Self {
            last_time: 0.0,
            kept_time,
            first_shown_time: -shown_time,
            shown_time,
        }
    }

    /// Wrap in the shared handle widgets hold.
    pub fn shared(self) -> SharedClock {
        Rc::new(RefCell::new(self))
    }

    /// Record a new simulation time. The visible window moves with it.
    pub fn add_time(&mut self, time: f64) -> TimeAdvance {
        let delta = time - self.last_time;
        if delta < 0.0 {
            tracing::debug!(from = self.last_time, to = time, "simulation time rewound");
            self.reset();
            self.last_time = time.max(0.0);
            self.first_shown_time = self.last_time - self.shown_time;
            return TimeAdvance::Rewound;
        }
        self.last_time = time;
        self.first_shown_time += delta;
        TimeAdvance::Advanced
    }

    /// Scroll the visible window so it starts at `time`, staying inside the
    /// retained history.
    pub fn jump_to_time(&mut self, time: f64) {
        let lo = self.last_time - self.kept_time;
        let hi = self.last_time - self.shown_time;
        self.first_shown_time = time.clamp(lo.min(hi), hi);
    }

    pub fn jump_to_end(&mut self) {
        self.first_shown_time = self.last_time - self.shown_time;
    }

    /// Resize the visible window, keeping its right edge in place.
    pub fn set_shown_time(&mut self, shown_time: f64) {
        let right = self.first_shown_time + self.shown_time;
        self.shown_time = shown_time.clamp(f64::EPSILON, self.kept_time);
        self.first_shown_time = right - self.shown_time;
    }

    pub fn set_kept_time(&mut self, kept_time: f64) {
        self.kept_time = kept_time.max(self.shown_time);
        let lo = self.last_time - self.kept_time;
        if self.first_shown_time < lo {
            self.first_shown_time = lo;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.last_time < self.first_shown_time + self.shown_time + 1e-9
    }

    pub fn reset(&mut self) {
        self.last_time = 0.0;
        self.first_shown_time = -self.shown_time;
    }
}

impl WindowProvider for TimeSlider {
    fn last_time(&self) -> f64 {
        self.last_time
    }
    fn kept_time(&self) -> f64 {
        self.kept_time
    }
    fn first_shown_time(&self) -> f64 {
        self.first_shown_time
    }
    fn shown_time(&self) -> f64 {
        self.shown_time
    }
}

/// Clock handle shared by every widget of one client session.
pub type SharedClock = Rc<RefCell<TimeSlider>>;
