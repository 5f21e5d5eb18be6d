//! Fixed-dimension time-series store.
//!
//! Widgets push raw `[time, v0, v1, ...]` rows from the simulator feed and
//! read windowed, filtered views back on every redraw.

use std::ops::Range;

use crate::buffer::SampleBuffer;
use crate::clock::WindowProvider;
use crate::error::StoreError;
use crate::filter;

/// Slack used when comparing the shown window with the latest time.
pub const AT_END_EPSILON: f64 = 1e-9;

/// Ingestion, retention and window lookup shared by both store variants.
#[derive(Debug, Clone)]
pub(crate) struct StoreCore<W> {
    pub(crate) buffer: SampleBuffer,
    pub(crate) window: W,
    synapse: f64,
    first_shown_index: usize,
    shown: Range<usize>,
}

impl<W: WindowProvider> StoreCore<W> {
    pub(crate) fn new(dims: usize, window: W, synapse: f64) -> Self {
        Self {
            buffer: SampleBuffer::new(dims),
            window,
            synapse: synapse.max(0.0),
            first_shown_index: 0,
            shown: 0..0,
        }
    }

    pub(crate) fn synapse(&self) -> f64 {
        self.synapse
    }

    pub(crate) fn first_shown_index(&self) -> usize {
        self.first_shown_index
    }

    pub(crate) fn shown_times(&self) -> &[f64] {
        let times = self.buffer.times();
        let end = self.shown.end.min(times.len());
        let start = self.shown.start.min(end);
        &times[start..end]
    }

    fn check_row(&self, row: &[f64]) -> Result<f64, StoreError> {
        let expected = self.buffer.dims() + 1;
        if row.len() != expected {
            return Err(StoreError::RowLength {
                expected,
                got: row.len(),
            });
        }
        let time = row[0];
        if !time.is_finite() {
            return Err(StoreError::NonFiniteTime(time));
        }
        Ok(time)
    }

    pub(crate) fn push(&mut self, row: &[f64]) -> Result<(), StoreError> {
        let time = self.check_row(row)?;

        // A sample at or before the newest one means the simulation was
        // rewound: everything from the insertion point on is stale.
        if let Some(last) = self.buffer.last_time() {
            if time <= last {
                let index = self.buffer.index_at_or_after(time);
                tracing::trace!(
                    time,
                    last,
                    dropped = self.buffer.len() - index,
                    "rewind in data store"
                );
                self.truncate(index);
            }
        }

        let dt = self.buffer.last_time().map_or(0.0, |last| time - last);
        let filtered: Vec<f64> = self
            .buffer
            .columns()
            .iter()
            .zip(&row[1..])
            .map(|(column, &v)| filter::filter(column.last(), v, dt, self.synapse))
            .collect();

        self.buffer.append(time, &filtered);
        Ok(())
    }

    pub(crate) fn update(&mut self) {
        let floor = self.window.last_time() - self.window.kept_time();
        let extra = self.buffer.index_at_or_after(floor);
        if extra > 0 {
            self.buffer.drop_front(extra);
            // Keep the last shown range pointing at the same samples.
            let start = self.shown.start.saturating_sub(extra);
            let end = self.shown.end.saturating_sub(extra);
            self.shown = start..end;
            self.first_shown_index = self.first_shown_index.saturating_sub(extra);
        }
    }

    /// Drop every sample newer than `time`. Samples at `time` survive.
    pub(crate) fn rewind_to(&mut self, time: f64) {
        let index = self.buffer.index_after(time);
        self.truncate(index);
    }

    fn truncate(&mut self, index: usize) {
        self.buffer.truncate(index);
        let end = self.shown.end.min(index);
        self.shown = self.shown.start.min(end)..end;
    }

    pub(crate) fn reset(&mut self) {
        self.buffer.clear();
        self.first_shown_index = 0;
        self.shown = 0..0;
    }

    /// Index range of the samples inside the visible window.
    pub(crate) fn shown_range(&mut self) -> Range<usize> {
        let t1 = self.window.first_shown_time();
        let t2 = t1 + self.window.shown_time();

        let start = self.buffer.index_at_or_after(t1);
        let end = self.buffer.index_at_or_after(t2).max(start);

        self.first_shown_index = start;
        self.shown = start..end;
        start..end
    }

    /// Index of the newest sample before the right edge of the visible
    /// window, or `None` for an empty store.
    pub(crate) fn last_index(&self) -> Option<usize> {
        if self.buffer.is_empty() {
            return None;
        }
        let t2 = self.window.first_shown_time() + self.window.shown_time();
        let end = self.buffer.index_at_or_after(t2);
        Some(end.saturating_sub(1))
    }

    pub(crate) fn is_at_end(&self) -> bool {
        let t2 = self.window.first_shown_time() + self.window.shown_time();
        self.window.last_time() < t2 + AT_END_EPSILON
    }
}

/// Time series with a fixed number of dimensions.
///
/// Every retained sample has a value in every dimension, so `times()` and
/// each column of `data()` always have the same length.
#[derive(Debug, Clone)]
pub struct DataStore<W> {
    core: StoreCore<W>,
}

impl<W: WindowProvider> DataStore<W> {
    /// `synapse` is the filter time constant in seconds; `0.0` stores raw
    /// values.
    pub fn new(dims: usize, window: W, synapse: f64) -> Self {
        Self {
            core: StoreCore::new(dims, window, synapse),
        }
    }

    pub fn dims(&self) -> usize {
        self.core.buffer.dims()
    }

    pub fn synapse(&self) -> f64 {
        self.core.synapse()
    }

    pub fn len(&self) -> usize {
        self.core.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.buffer.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        self.core.buffer.times()
    }

    /// Filtered history, one `Vec` per dimension.
    pub fn data(&self) -> Vec<&[f64]> {
        self.core
            .buffer
            .columns()
            .iter()
            .map(|c| c.values())
            .collect()
    }

    /// Filtered history of a single dimension.
    pub fn column(&self, dim: usize) -> Option<&[f64]> {
        self.core.buffer.column(dim).map(|c| c.values())
    }

    /// Index of the first sample of the most recent `shown_data()` window.
    pub fn first_shown_index(&self) -> usize {
        self.core.first_shown_index()
    }

    /// Times of the samples returned by the most recent `shown_data()`.
    pub fn shown_times(&self) -> &[f64] {
        self.core.shown_times()
    }

    pub fn window(&self) -> &W {
        &self.core.window
    }

    /// Ingest a raw `[time, v0, .., v(dims-1)]` row.
    pub fn push(&mut self, row: &[f64]) -> Result<(), StoreError> {
        self.core.push(row)
    }

    /// Drop samples that fell out of the retention window.
    pub fn update(&mut self) {
        self.core.update();
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Forget samples recorded after `time`, e.g. once the simulator
    /// restarted from an earlier point.
    pub fn rewind_to(&mut self, time: f64) {
        self.core.rewind_to(time);
    }

    /// Per-dimension values inside the visible window.
    pub fn shown_data(&mut self) -> Vec<Vec<f64>> {
        let range = self.core.shown_range();
        self.core
            .buffer
            .columns()
            .iter()
            .map(|c| c.values()[range.clone()].to_vec())
            .collect()
    }

    /// One value per dimension: the newest sample before the right edge of
    /// the visible window. Empty if nothing was recorded.
    pub fn last_data(&self) -> Vec<f64> {
        match self.core.last_index() {
            Some(index) => self
                .core
                .buffer
                .columns()
                .iter()
                .map(|c| c.values()[index])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether the visible window already reaches the newest simulation
    /// time.
    pub fn is_at_end(&self) -> bool {
        self.core.is_at_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{SharedClock, TimeSlider};

    fn clock() -> SharedClock {
        TimeSlider::default().shared()
    }

    fn ceil_all(data: Vec<&[f64]>) -> Vec<Vec<f64>> {
        data.iter()
            .map(|col| col.iter().map(|v| v.ceil()).collect())
            .collect()
    }

    #[test]
    fn push_stores_raw_values_without_synapse() {
        let mut store = DataStore::new(2, clock(), 0.0);
        store.push(&[0.0, 1.1, 1.2]).unwrap();
        assert_eq!(store.data(), vec![&[1.1][..], &[1.2][..]]);
        assert_eq!(store.times(), &[0.0]);
    }

    #[test]
    fn rewind_discards_later_samples() {
        let mut store = DataStore::new(2, clock(), 0.0);
        store.push(&[0.0, 1.1, 1.2]).unwrap();
        store.push(&[1.0, 3.1, 3.2]).unwrap();
        store.push(&[0.5, 2.1, 2.2]).unwrap();
        // The 0.0 sample predates the rewind point and survives.
        assert_eq!(store.times(), &[0.0, 0.5]);
        assert_eq!(store.column(0), Some(&[1.1, 2.1][..]));
        assert_eq!(store.column(1), Some(&[1.2, 2.2][..]));
    }

    #[test]
    fn rewind_before_everything_leaves_single_sample() {
        let mut store = DataStore::new(1, clock(), 0.05);
        store.push(&[1.0, 9.0]).unwrap();
        store.push(&[0.5, 2.0]).unwrap();
        assert_eq!(store.times(), &[0.5]);
        // No residual from the discarded sample: first value is unfiltered.
        assert_eq!(store.column(0), Some(&[2.0][..]));
    }

    #[test]
    fn rewind_scenario_from_reset_simulation() {
        let mut store = DataStore::new(2, clock(), 0.0);
        store.push(&[1.0, 3.1, 3.2]).unwrap();
        store.push(&[0.5, 2.1, 2.2]).unwrap();
        assert_eq!(store.data(), vec![&[2.1][..], &[2.2][..]]);
    }

    #[test]
    fn duplicate_time_replaces_sample() {
        let mut store = DataStore::new(1, clock(), 0.0);
        store.push(&[0.1, 1.0]).unwrap();
        store.push(&[0.2, 2.0]).unwrap();
        store.push(&[0.2, 5.0]).unwrap();
        assert_eq!(store.times(), &[0.1, 0.2]);
        assert_eq!(store.column(0), Some(&[1.0, 5.0][..]));
    }

    #[test]
    fn synapse_smooths_downward_jump() {
        let mut store = DataStore::new(2, clock(), 0.1);
        store.push(&[0.1, 2.1, 2.2]).unwrap();
        store.push(&[0.2, 3.1, 3.2]).unwrap();
        store.push(&[0.3, 1.1, 1.2]).unwrap();
        assert_eq!(
            ceil_all(store.data()),
            vec![vec![3.0, 3.0, 2.0], vec![3.0, 3.0, 2.0]]
        );
    }

    #[test]
    fn update_trims_to_retention_window() {
        let clock = clock();
        let mut store = DataStore::new(1, clock.clone(), 0.0);
        store.push(&[0.5, 1.0]).unwrap();
        store.push(&[1.0, 2.0]).unwrap();
        store.push(&[1.5, 3.0]).unwrap();

        {
            let mut c = clock.borrow_mut();
            c.last_time = 3.0;
            c.kept_time = 2.0;
        }
        store.update();
        assert_eq!(store.times(), &[1.0, 1.5]);
        assert_eq!(store.column(0), Some(&[2.0, 3.0][..]));

        let before = (store.times().to_vec(), store.column(0).map(<[f64]>::to_vec));
        store.update();
        let after = (store.times().to_vec(), store.column(0).map(<[f64]>::to_vec));
        assert_eq!(before, after);
    }

    #[test]
    fn update_can_empty_the_store() {
        let clock = clock();
        let mut store = DataStore::new(2, clock.clone(), 0.0);
        store.push(&[0.1, 1.0, 1.0]).unwrap();
        clock.borrow_mut().last_time = 100.0;
        store.update();
        assert!(store.is_empty());
        assert!(store.data().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn reset_clears_everything_but_dims() {
        let mut store = DataStore::new(3, clock(), 0.01);
        store.push(&[0.1, 1.0, 2.0, 3.0]).unwrap();
        store.reset();
        assert!(store.times().is_empty());
        assert_eq!(store.data(), vec![&[][..] as &[f64]; 3]);
        assert_eq!(store.dims(), 3);
    }

    #[test]
    fn bad_rows_are_rejected_without_mutation() {
        let mut store = DataStore::new(2, clock(), 0.0);
        store.push(&[0.0, 1.0, 2.0]).unwrap();

        assert_eq!(
            store.push(&[0.1, 1.0]),
            Err(StoreError::RowLength {
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            store.push(&[]),
            Err(StoreError::RowLength {
                expected: 3,
                got: 0
            })
        );
        assert!(matches!(
            store.push(&[f64::NAN, 1.0, 2.0]),
            Err(StoreError::NonFiniteTime(_))
        ));
        assert_eq!(store.times(), &[0.0]);
    }

    #[test]
    fn shown_data_slices_visible_window() {
        let clock = clock();
        let mut store = DataStore::new(1, clock.clone(), 0.0);
        for i in 0..10 {
            let t = i as f64 * 0.1;
            store.push(&[t, i as f64]).unwrap();
        }
        {
            let mut c = clock.borrow_mut();
            c.last_time = 0.9;
            c.first_shown_time = 0.25;
            c.shown_time = 0.4;
        }
        // window [0.25, 0.65): samples at 0.3, 0.4, 0.5, 0.6
        let shown = store.shown_data();
        assert_eq!(shown, vec![vec![3.0, 4.0, 5.0, 6.0]]);
        assert_eq!(store.first_shown_index(), 3);
        assert_eq!(store.shown_times().len(), 4);
        assert!((store.shown_times()[0] - 0.3).abs() < 1e-12);
        assert!(!store.is_at_end());
    }

    #[test]
    fn shown_data_on_empty_store() {
        let mut store = DataStore::new(2, clock(), 0.0);
        assert_eq!(store.shown_data(), vec![Vec::<f64>::new(), Vec::new()]);
        assert!(store.last_data().is_empty());
        assert!(store.shown_times().is_empty());
    }

    #[test]
    fn last_data_picks_newest_visible_sample() {
        let clock = clock();
        let mut store = DataStore::new(2, clock.clone(), 0.0);
        store.push(&[0.1, 1.0, -1.0]).unwrap();
        store.push(&[0.2, 2.0, -2.0]).unwrap();
        store.push(&[0.3, 3.0, -3.0]).unwrap();

        {
            let mut c = clock.borrow_mut();
            c.first_shown_time = 0.0;
            c.shown_time = 0.25;
        }
        assert_eq!(store.last_data(), vec![2.0, -2.0]);

        // Window reaches past the newest sample: final index.
        clock.borrow_mut().shown_time = 1.0;
        assert_eq!(store.last_data(), vec![3.0, -3.0]);

        // Window entirely before the data: oldest sample.
        {
            let mut c = clock.borrow_mut();
            c.first_shown_time = -1.0;
            c.shown_time = 0.5;
        }
        assert_eq!(store.last_data(), vec![1.0, -1.0]);
    }

    #[test]
    fn at_end_tracks_clock() {
        let clock = clock();
        let store = DataStore::new(1, clock.clone(), 0.0);
        clock.borrow_mut().add_time(2.0);
        assert!(store.is_at_end());
        clock.borrow_mut().jump_to_time(0.0);
        assert!(!store.is_at_end());
    }

    #[test]
    fn at_end_allows_tiny_overshoot() {
        let clock = clock();
        let store = DataStore::new(1, clock.clone(), 0.0);
        {
            let mut c = clock.borrow_mut();
            c.first_shown_time = 0.5;
            c.shown_time = 0.5;
            c.last_time = 1.0;
        }
        assert!(store.is_at_end());

        clock.borrow_mut().last_time = 1.0 + 0.5 * AT_END_EPSILON;
        assert!(store.is_at_end());

        clock.borrow_mut().last_time = 1.0 + 2.0 * AT_END_EPSILON;
        assert!(!store.is_at_end());
    }

    #[test]
    fn rewind_to_keeps_samples_at_or_before_time() {
        let mut store = DataStore::new(1, clock(), 0.0);
        for t in [0.1, 0.2, 0.3, 0.4] {
            store.push(&[t, t * 10.0]).unwrap();
        }
        store.rewind_to(0.2);
        assert_eq!(store.times(), &[0.1, 0.2]);
        assert_eq!(store.column(0), Some(&[1.0, 2.0][..]));

        store.rewind_to(5.0);
        assert_eq!(store.len(), 2);
        store.rewind_to(0.0);
        assert!(store.is_empty());
    }

    #[test]
    fn shown_times_follow_samples_through_update() {
        let clock = clock();
        let mut store = DataStore::new(1, clock.clone(), 0.0);
        for i in 0..8 {
            store.push(&[i as f64 * 0.5, i as f64]).unwrap();
        }
        {
            let mut c = clock.borrow_mut();
            c.last_time = 3.5;
            c.kept_time = 4.0;
            c.first_shown_time = 2.0;
            c.shown_time = 1.0;
        }
        store.shown_data();
        assert_eq!(store.shown_times(), &[2.0, 2.5]);
        assert_eq!(store.first_shown_index(), 4);

        clock.borrow_mut().kept_time = 2.0;
        store.update();
        assert_eq!(store.times()[0], 1.5);
        assert_eq!(store.shown_times(), &[2.0, 2.5]);
        assert_eq!(store.first_shown_index(), 1);

        // A rewind into the shown range clips it.
        store.push(&[2.5, -1.0]).unwrap();
        assert_eq!(store.shown_times(), &[2.0]);
    }

    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }
    }

    #[test]
    fn invariants_hold_over_random_sequences() {
        for seed in 1..=64u64 {
            let mut rng = XorShift(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let clock = TimeSlider::new(2.0, 0.5).shared();
            let mut store = DataStore::new(3, clock.clone(), 0.02);
            let mut t = 0.0_f64;

            for _ in 0..200 {
                match rng.next() % 4 {
                    0 | 1 => {
                        // Mostly forward, sometimes back, sometimes a repeat.
                        let step = ((rng.next() % 12) as f64 - 3.0) * 0.125;
                        t = (t + step).max(0.0);
                        let v = (rng.next() % 100) as f64 / 10.0;
                        store.push(&[t, v, -v, 0.5 * v]).unwrap();
                        assert_eq!(store.times().last(), Some(&t));
                    }
                    2 => {
                        clock.borrow_mut().add_time(t);
                        store.update();
                        let floor = {
                            let c = clock.borrow();
                            c.last_time - c.kept_time
                        };
                        assert!(store.times().iter().all(|&x| x >= floor));
                    }
                    _ => {
                        let shown = store.shown_data();
                        assert_eq!(shown.len(), 3);
                        assert!(shown.iter().all(|c| c.len() == store.shown_times().len()));
                        assert_eq!(store.last_data().len(), if store.is_empty() { 0 } else { 3 });
                    }
                }

                let times = store.times();
                assert!(times.windows(2).all(|w| w[0] < w[1]));
                assert!(store.data().iter().all(|c| c.len() == times.len()));
            }
        }
    }
}
