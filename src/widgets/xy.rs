// Phase plot: two chosen dimensions of a signal plotted against each other.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{require_dims, WidgetError};
use crate::clock::WindowProvider;
use crate::store::DataStore;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct XyView {
    /// `(x, y)` trail over the visible window, oldest first.
    pub points: Vec<[f64; 2]>,
    /// Newest point of the trail, drawn as the marker.
    pub latest: Option<[f64; 2]>,
    pub axes: [usize; 2],
}

#[derive(Debug, Clone)]
pub struct XyValue<W> {
    store: DataStore<W>,
    index_x: usize,
    index_y: usize,
}

impl<W: WindowProvider> XyValue<W> {
    pub fn new(
        n_lines: usize,
        index_x: usize,
        index_y: usize,
        window: W,
    ) -> Result<Self, WidgetError> {
        require_dims("xy_value", n_lines)?;
        check_axis(index_x, n_lines)?;
        check_axis(index_y, n_lines)?;
        Ok(Self {
            store: DataStore::new(n_lines, window, 0.0),
            index_x,
            index_y,
        })
    }

    pub fn store(&self) -> &DataStore<W> {
        &self.store
    }

    /// Choose which dimensions go on the x and y axes.
    pub fn set_axes(&mut self, index_x: usize, index_y: usize) -> Result<(), WidgetError> {
        let n_lines = self.store.dims();
        check_axis(index_x, n_lines)?;
        check_axis(index_y, n_lines)?;
        self.index_x = index_x;
        self.index_y = index_y;
        Ok(())
    }

    pub fn push(&mut self, row: &[f64]) -> Result<(), WidgetError> {
        Ok(self.store.push(row)?)
    }

    pub fn update(&mut self) {
        self.store.update();
    }

    pub fn rewind_to(&mut self, time: f64) {
        self.store.rewind_to(time);
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn view(&mut self) -> XyView {
        let shown = self.store.shown_data();
        let points: Vec<[f64; 2]> = shown[self.index_x]
            .iter()
            .zip(&shown[self.index_y])
            .map(|(&x, &y)| [x, y])
            .collect();
        XyView {
            latest: points.last().copied(),
            points,
            axes: [self.index_x, self.index_y],
        }
    }
}

fn check_axis(index: usize, n_lines: usize) -> Result<(), WidgetError> {
    if index >= n_lines {
        return Err(WidgetError::AxisOutOfRange { index, n_lines });
    }
    Ok(())
}
