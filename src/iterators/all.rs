use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickyIterator};
use crate::Histogram;

/// An iterator that will yield every bin, recorded or not.
pub struct Iter(Option<usize>);

impl Iter {
    /// Construct a new full iterator. See `Histogram::iter_all` for details.
    pub fn new<T: Counter>(hist: &Histogram<T>) -> HistogramIterator<'_, T, Iter> {
        HistogramIterator::new(hist, Iter(None))
    }
}

impl<T: Counter> PickyIterator<T> for Iter {
    fn pick(&mut self, index: usize, _running_total: u64) -> bool {
        if self.0 != Some(index) {
            self.0 = Some(index);
            true
        } else {
            false
        }
    }

    fn more(&mut self, _index: usize) -> bool {
        true
    }
}
