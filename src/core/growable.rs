//! Store whose dimensionality can grow while data is streaming in.
//!
//! Semantic-pointer plots discover new vocabulary terms mid-run. Each new
//! term becomes a new dimension that only has history from the moment it
//! appeared; earlier slots are reported as `None`.

use crate::clock::WindowProvider;
use crate::error::StoreError;
use crate::store::StoreCore;

#[derive(Debug, Clone)]
pub struct GrowableDataStore<W> {
    core: StoreCore<W>,
}

impl<W: WindowProvider> GrowableDataStore<W> {
    pub fn new(dims: usize, window: W, synapse: f64) -> Self {
        Self {
            core: StoreCore::new(dims, window, synapse),
        }
    }

    pub fn dims(&self) -> usize {
        self.core.buffer.dims()
    }

    /// Grow to `dims` dimensions. New dimensions start recording with the
    /// next `push`; shrinking is rejected.
    pub fn set_dims(&mut self, dims: usize) -> Result<(), StoreError> {
        let current = self.dims();
        if dims < current {
            return Err(StoreError::ShrinkDims {
                current,
                requested: dims,
            });
        }
        for _ in current..dims {
            self.core.buffer.add_column();
        }
        if dims > current {
            tracing::debug!(from = current, to = dims, "data store grew");
        }
        Ok(())
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

    /// Recorded values per dimension. Late dimensions are shorter than
    /// `times()`; see [`creation_index`](Self::creation_index).
    pub fn data(&self) -> Vec<&[f64]> {
        self.core
            .buffer
            .columns()
            .iter()
            .map(|c| c.values())
            .collect()
    }

    /// Index into `times()` of the first value recorded for `dim`.
    pub fn creation_index(&self, dim: usize) -> Option<usize> {
        self.core.buffer.column(dim).map(|c| c.start())
    }

    pub fn first_shown_index(&self) -> usize {
        self.core.first_shown_index()
    }

    pub fn shown_times(&self) -> &[f64] {
        self.core.shown_times()
    }

    pub fn window(&self) -> &W {
        &self.core.window
    }

    /// Ingest a raw `[time, v0, .., v(dims-1)]` row for the current dims.
    pub fn push(&mut self, row: &[f64]) -> Result<(), StoreError> {
        self.core.push(row)
    }

    pub fn update(&mut self) {
        self.core.update();
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Forget samples recorded after `time`.
    pub fn rewind_to(&mut self, time: f64) {
        self.core.rewind_to(time);
    }

    /// Per-dimension values inside the visible window, `None` where a
    /// dimension did not exist yet.
    pub fn shown_data(&mut self) -> Vec<Vec<Option<f64>>> {
        let range = self.core.shown_range();
        self.core
            .buffer
            .columns()
            .iter()
            .map(|c| range.clone().map(|i| c.get(i)).collect())
            .collect()
    }

    /// Newest value before the right edge of the visible window, `None` for
    /// dimensions that had not appeared yet at that time.
    pub fn last_data(&self) -> Vec<Option<f64>> {
        match self.core.last_index() {
            Some(index) => self
                .core
                .buffer
                .columns()
                .iter()
                .map(|c| c.get(index))
                .collect(),
            None => Vec::new(),
        }
    }

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

    #[test]
    fn new_dimension_has_no_backfill() {
        let mut store = GrowableDataStore::new(2, clock(), 0.0);
        store.push(&[0.0, 1.1, 1.2]).unwrap();
        store.set_dims(3).unwrap();
        store.push(&[0.1, 2.1, 2.2, 2.3]).unwrap();

        assert_eq!(
            store.data(),
            vec![&[1.1, 2.1][..], &[1.2, 2.2][..], &[2.3][..]]
        );
        assert_eq!(store.creation_index(2), Some(1));
    }

    #[test]
    fn push_uses_current_dims() {
        let mut store = GrowableDataStore::new(1, clock(), 0.0);
        store.push(&[0.0, 1.0]).unwrap();
        assert_eq!(
            store.push(&[0.1, 1.0, 2.0]),
            Err(StoreError::RowLength {
                expected: 2,
                got: 3
            })
        );
        store.set_dims(2).unwrap();
        store.push(&[0.1, 1.0, 2.0]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn shrinking_is_rejected() {
        let mut store = GrowableDataStore::new(3, clock(), 0.0);
        assert_eq!(
            store.set_dims(2),
            Err(StoreError::ShrinkDims {
                current: 3,
                requested: 2
            })
        );
        store.set_dims(3).unwrap();
        assert_eq!(store.dims(), 3);
    }

    #[test]
    fn shown_data_marks_missing_positions() {
        let clock = clock();
        let mut store = GrowableDataStore::new(1, clock.clone(), 0.0);
        store.push(&[0.0, 1.0]).unwrap();
        store.push(&[0.1, 2.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.2, 3.0, 30.0]).unwrap();
        store.push(&[0.3, 4.0, 40.0]).unwrap();

        {
            let mut c = clock.borrow_mut();
            c.last_time = 0.3;
            c.first_shown_time = 0.05;
            c.shown_time = 1.0;
        }
        let shown = store.shown_data();
        assert_eq!(
            shown,
            vec![
                vec![Some(2.0), Some(3.0), Some(4.0)],
                vec![None, Some(30.0), Some(40.0)],
            ]
        );
        assert_eq!(store.first_shown_index(), 1);
    }

    #[test]
    fn last_data_marks_missing_dimension() {
        let clock = clock();
        let mut store = GrowableDataStore::new(1, clock.clone(), 0.0);
        store.push(&[0.0, 1.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.5, 2.0, 20.0]).unwrap();

        {
            let mut c = clock.borrow_mut();
            c.first_shown_time = 0.0;
            c.shown_time = 0.25;
        }
        assert_eq!(store.last_data(), vec![Some(1.0), None]);

        clock.borrow_mut().shown_time = 1.0;
        assert_eq!(store.last_data(), vec![Some(2.0), Some(20.0)]);
    }

    #[test]
    fn rewind_clips_late_dimensions() {
        let mut store = GrowableDataStore::new(1, clock(), 0.0);
        store.push(&[0.0, 1.0]).unwrap();
        store.push(&[0.1, 2.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.2, 3.0, 30.0]).unwrap();

        // Rewind to before the second dimension existed.
        store.push(&[0.05, 9.0, 90.0]).unwrap();
        assert_eq!(store.times(), &[0.0, 0.05]);
        assert_eq!(store.data(), vec![&[1.0, 9.0][..], &[90.0][..]]);
        assert_eq!(store.creation_index(1), Some(1));
    }

    #[test]
    fn first_value_of_new_dimension_is_unfiltered() {
        let mut store = GrowableDataStore::new(1, clock(), 0.1);
        store.push(&[0.0, 1.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.1, 1.0, 5.0]).unwrap();
        assert_eq!(store.data()[1], &[5.0]);
    }

    #[test]
    fn update_keeps_columns_aligned() {
        let clock = clock();
        let mut store = GrowableDataStore::new(1, clock.clone(), 0.0);
        for i in 0..4 {
            store.push(&[i as f64, i as f64]).unwrap();
        }
        store.set_dims(2).unwrap();
        store.push(&[4.0, 4.0, 40.0]).unwrap();

        {
            let mut c = clock.borrow_mut();
            c.last_time = 4.0;
            c.kept_time = 1.5;
        }
        store.update();
        assert_eq!(store.times(), &[3.0, 4.0]);
        assert_eq!(store.creation_index(1), Some(1));

        clock.borrow_mut().kept_time = 0.5;
        store.update();
        assert_eq!(store.times(), &[4.0]);
        assert_eq!(store.creation_index(1), Some(0));
        assert_eq!(store.data(), vec![&[4.0][..], &[40.0][..]]);
    }

    #[test]
    fn reset_then_query_is_empty() {
        let mut store = GrowableDataStore::new(1, clock(), 0.0);
        store.push(&[0.0, 1.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.1, 1.0, 2.0]).unwrap();
        store.reset();
        assert!(store.times().is_empty());
        assert!(store.data().iter().all(|c| c.is_empty()));
        assert!(store.last_data().is_empty());
        assert_eq!(store.shown_data(), vec![Vec::new(), Vec::new()]);
    }

    #[test]
    fn rewind_to_clips_late_dimension() {
        let mut store = GrowableDataStore::new(1, clock(), 0.0);
        store.push(&[0.1, 1.0]).unwrap();
        store.set_dims(2).unwrap();
        store.push(&[0.2, 2.0, 20.0]).unwrap();
        store.rewind_to(0.15);
        assert_eq!(store.times(), &[0.1]);
        assert_eq!(store.creation_index(1), Some(1));
        assert_eq!(store.data(), vec![&[1.0][..], &[][..] as &[f64]]);
        assert_eq!(store.last_data(), vec![Some(1.0), None]);
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
    fn columns_stay_aligned_over_random_sequences() {
        for seed in 1..=64u64 {
            let mut rng = XorShift(seed.wrapping_mul(0x2545_F491_4F6C_DD1D));
            let clock = TimeSlider::new(2.0, 0.5).shared();
            let mut store = GrowableDataStore::new(1, clock.clone(), 0.0);
            let mut t = 0.0_f64;

            for _ in 0..200 {
                match rng.next() % 5 {
                    0 | 1 => {
                        let step = ((rng.next() % 12) as f64 - 3.0) * 0.125;
                        t = (t + step).max(0.0);
                        let mut row = vec![t];
                        row.extend((0..store.dims()).map(|d| d as f64));
                        store.push(&row).unwrap();
                    }
                    2 => {
                        if store.dims() < 8 {
                            store.set_dims(store.dims() + 1).unwrap();
                        }
                    }
                    3 => {
                        clock.borrow_mut().add_time(t);
                        store.update();
                    }
                    _ => {
                        let shown = store.shown_data();
                        let n = store.shown_times().len();
                        assert!(shown.iter().all(|c| c.len() == n));
                    }
                }

                let len = store.times().len();
                assert!(store.times().windows(2).all(|w| w[0] < w[1]));
                for (dim, values) in store.data().iter().enumerate() {
                    let start = store.creation_index(dim).unwrap();
                    assert_eq!(start + values.len(), len);
                }
            }
        }
    }
}
