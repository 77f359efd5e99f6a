use num_traits::Zero;

use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickyIterator};
use crate::Histogram;

/// An iterator that will yield only bins with at least one sample.
pub struct Iter<'a, T: 'a + Counter> {
    hist: &'a Histogram<T>,
    visited: Option<usize>,
}

impl<'a, T: 'a + Counter> Iter<'a, T> {
    /// Construct a new recorded-values iterator. See `Histogram::iter_recorded` for details.
    pub fn new(hist: &'a Histogram<T>) -> HistogramIterator<'a, T, Iter<'a, T>> {
        HistogramIterator::new(hist, Iter { hist, visited: None })
    }
}

impl<'a, T: 'a + Counter> PickyIterator<T> for Iter<'a, T> {
    fn pick(&mut self, index: usize, _running_total: u64) -> bool {
        let count = self
            .hist
            .count_at_index(index)
            .expect("index must be valid by PickyIterator contract");
        if count != T::zero() && self.visited != Some(index) {
            self.visited = Some(index);
            return true;
        }
        false
    }

    fn more(&mut self, _index: usize) -> bool {
        false
    }
}
