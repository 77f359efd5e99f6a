use num_traits::Zero;

use crate::core::counter::Counter;
use crate::Histogram;

/// An iterator that iterates linearly over histogram values.
pub mod linear;

/// An iterator that iterates logarithmically over histogram values.
pub mod log;

/// An iterator that iterates over recorded histogram values.
pub mod recorded;

/// An iterator that iterates over every value the histogram can represent.
pub mod all;

/// An iterator that iterates over quantile-spaced histogram values.
pub mod quantile;

/// A trait for designing a subset iterator over values in a `Histogram`.
pub trait PickyIterator<T: Counter> {
    /// Should an item be yielded for the given index? `running_total` is the total count of all
    /// samples recorded at or below `index` seen so far.
    fn pick(&mut self, index: usize, running_total: u64) -> bool;
    /// Should we keep iterating even though all future indices hold zero counts?
    fn more(&mut self, index: usize) -> bool;
}

/// A snapshot of the state of a `HistogramIterator` at one step of the iteration.
///
/// Value and count fields express the iterated-to bin's [`value_iterated_from`, `value_iterated_to`]
/// range (inclusive), along with running totals through that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationValue<T: Counter> {
    value_iterated_to: u64,
    value_iterated_from: u64,
    count_at_value: T,
    count_since_last_iteration: u64,
    total_count_to_this_value: u64,
    total_value_to_this_value: u64,
    percentile: f64,
    percentile_iterated_to: f64,
}

impl<T: Counter> IterationValue<T> {
    /// The highest value equivalent to the value this step iterated to.
    pub fn value_iterated_to(&self) -> u64 {
        self.value_iterated_to
    }

    /// The lowest value equivalent to the value this step iterated to.
    pub fn value_iterated_from(&self) -> u64 {
        self.value_iterated_from
    }

    /// The count recorded at `value_iterated_to`'s bucket.
    pub fn count_at_value(&self) -> T {
        self.count_at_value
    }

    /// The number of samples recorded since the previous step of this iteration.
    pub fn count_since_last_iteration(&self) -> u64 {
        self.count_since_last_iteration
    }

    /// The total count of samples at or below `value_iterated_to`.
    pub fn total_count_to_this_value(&self) -> u64 {
        self.total_count_to_this_value
    }

    /// The running sum of `value * count` for every sample at or below `value_iterated_to`.
    pub fn total_value_to_this_value(&self) -> u64 {
        self.total_value_to_this_value
    }

    /// The percentile (in `[0, 100]`) of samples at or below `value_iterated_to`.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// The percentile this iteration step was aiming for, which may differ slightly from
    /// `percentile()` for iterators that step by fixed percentile/quantile increments.
    pub fn percentile_iterated_to(&self) -> f64 {
        self.percentile_iterated_to
    }
}

/// `HistogramIterator` provides a base iterator for a `Histogram`.
///
/// It will iterate over all discrete values until there are no more recorded values (i.e., *not*
/// necessarily until all bins have been exhausted). To facilitate the development of more
/// sophisticated iterators, a *picker* is also provided, which is allowed to only select some bins
/// that should be yielded. The picker may also extend the iteration to include a suffix of empty
/// bins.
///
/// One peculiarity of this iterator is that, if the picker does choose to yield a particular bin,
/// that bin *is re-visited* before moving on to later bins. This is the reason why iterators such
/// as `all` and `recorded` need to keep track of which indices they have already visited.
pub struct HistogramIterator<'a, T: 'a + Counter, P: PickyIterator<T>> {
    hist: &'a Histogram<T>,
    total_count_to_index: u64,
    prev_total_count: u64,
    total_value_to_index: u64,
    current_index: usize,
    fresh: bool,
    ended: bool,
    picker: P,
}

impl<'a, T: Counter, P: PickyIterator<T>> HistogramIterator<'a, T, P> {
    fn new(h: &'a Histogram<T>, picker: P) -> HistogramIterator<'a, T, P> {
        HistogramIterator {
            hist: h,
            total_count_to_index: 0,
            prev_total_count: 0,
            total_value_to_index: 0,
            current_index: 0,
            picker,
            fresh: true,
            ended: false,
        }
    }

    fn current(&self) -> IterationValue<T> {
        let value = self.hist.value_for(self.current_index);
        let count_at_value = self
            .hist
            .count_at_index(self.current_index)
            .expect("current_index must be valid");
        let percentile = 100.0 * self.total_count_to_index as f64 / self.hist.len() as f64;

        IterationValue {
            value_iterated_to: self.hist.highest_equivalent(value),
            value_iterated_from: self.hist.lowest_equivalent(value),
            count_at_value,
            count_since_last_iteration: self.total_count_to_index - self.prev_total_count,
            total_count_to_this_value: self.total_count_to_index,
            total_value_to_this_value: self.total_value_to_index,
            percentile,
            percentile_iterated_to: percentile,
        }
    }
}

impl<'a, T: 'a, P> Iterator for HistogramIterator<'a, T, P>
where
    T: Counter,
    P: PickyIterator<T>,
{
    type Item = IterationValue<T>;

    fn next(&mut self) -> Option<Self::Item> {
        // here's the deal: we are iterating over all the indices in the histogram's .counts array.
        // however, most of those values (especially towards the end) will be zeros, which the
        // original HdrHistogram implementation doesn't yield (probably with good reason -- there
        // could be a lot of them!). so, what we do instead is iterate over indices until we reach
        // the total *count*. After that, we iterate only until .more() returns false, at which
        // point we stop completely.

        // rust doesn't support tail call optimization, so we'd run out of stack if we simply
        // called self.next() again at the bottom. instead, we loop when we would have yielded None
        // unless we have ended.
        while !self.ended {
            if self.current_index == self.hist.distinct_values() {
                self.ended = true;
                return None;
            }

            let total = self.hist.len();
            if self.prev_total_count == total {
                if !self.picker.more(self.current_index) {
                    self.ended = true;
                    return None;
                }
            } else {
                assert!(self.current_index < self.hist.distinct_values());
                assert!(self.prev_total_count < total);

                if self.fresh {
                    let count = self
                        .hist
                        .count_at_index(self.current_index)
                        .expect("current_index must be valid");

                    if self.total_count_to_index == total {
                        assert!(count == T::zero());
                    }

                    self.total_count_to_index = self.total_count_to_index.saturating_add(count.as_u64());

                    let value = self.hist.median_equivalent(self.hist.value_for(self.current_index));
                    self.total_value_to_index = self
                        .total_value_to_index
                        .saturating_add(value.saturating_mul(count.as_u64()));

                    self.fresh = false;
                }
            }

            if self.picker.pick(self.current_index, self.total_count_to_index) {
                let val = self.current();

                // note that we *don't* increment self.current_index here. the picker will be
                // exposed to the same value again after yielding.
                self.prev_total_count = self.total_count_to_index;
                return Some(val);
            }

            self.current_index += 1;
            self.fresh = true;
        }
        None
    }
}
