use num_traits::Zero;

use crate::core::counter::Counter;
use crate::iterators::{HistogramIterator, PickyIterator};
use crate::Histogram;

/// An iterator that will yield at quantile steps through the histogram's value range.
pub struct Iter<'a, T: 'a + Counter> {
    hist: &'a Histogram<T>,

    ticks_per_half_distance: u32,
    quantile_to_iterate_to: f64,
    reached_last_recorded_value: bool,
}

impl<'a, T: 'a + Counter> Iter<'a, T> {
    /// Construct a new iterator. See `Histogram::iter_quantiles` for details.
    pub fn new(hist: &'a Histogram<T>, ticks_per_half_distance: u32) -> HistogramIterator<'a, T, Iter<'a, T>> {
        assert!(ticks_per_half_distance > 0, "Ticks per half distance must be > 0");

        HistogramIterator::new(
            hist,
            Iter {
                hist,
                ticks_per_half_distance,
                quantile_to_iterate_to: 0.0,
                reached_last_recorded_value: false,
            },
        )
    }
}

impl<'a, T: 'a + Counter> PickyIterator<T> for Iter<'a, T> {
    fn pick(&mut self, index: usize, running_total: u64) -> bool {
        let count = self
            .hist
            .count_at_index(index)
            .expect("index must be valid by PickyIterator contract");
        if count == T::zero() {
            return false;
        }

        // This calculation, combined with the `quantile * count` in `value_at_quantile`, tends
        // to produce a count_at_quantile that is 1 ulp wrong. That's just the way IEEE754 works.
        let current_quantile = running_total as f64 / self.hist.len() as f64;
        if current_quantile < self.quantile_to_iterate_to {
            return false;
        }

        // The choice to maintain fixed-sized "ticks" in each half-distance to 100% [starting from
        // 0%], as opposed to a "tick" size that varies with each interval, was made to make the
        // steps easily comprehensible and readable to humans. The resulting quantile steps are
        // much easier to browse through in a quantile distribution output, for example.
        //
        // Calculate the number of times we've halved the distance to 100%. This is 1 at 50%, 2 at
        // 75%, 3 at 87.5%, etc. 2 ^ num_halvings is the number of slices that will fit into 100%.
        // Minimum of 0 (1.0/1.0 = 1, log 2 of which is 0) so unsigned cast is safe.
        let num_halvings = (1.0 / (1.0 - self.quantile_to_iterate_to)).log2() as u32;
        // Calculate the total number of ticks in 0-1 given that half of each slice is tick'd.
        // Use u64 math so that there's less risk of overflow with large numbers of ticks and data
        // that ends up needing large numbers of halvings.
        let total_ticks = (self.ticks_per_half_distance as u64)
            .checked_mul(1_u64.checked_shl(num_halvings + 1).expect("too many halvings"))
            .expect("too many total ticks");
        let increment_size = 1.0 / total_ticks as f64;
        self.quantile_to_iterate_to += increment_size;
        true
    }

    fn more(&mut self, _index: usize) -> bool {
        // We want one additional last step to 100%
        if !self.reached_last_recorded_value && self.hist.len() != 0 {
            self.quantile_to_iterate_to = 1.0;
            self.reached_last_recorded_value = true;
            true
        } else {
            false
        }
    }
}
