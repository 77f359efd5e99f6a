//! A lock-free, multi-writer histogram backed by relaxed atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::index::{Layout, ORIGINAL_MAX, ORIGINAL_MIN};
use crate::errors::{CreationError, RecordError};
use crate::Histogram;

/// A histogram whose counts are stored in a `Box<[AtomicU64]>`, so that `record`/`record_n` can
/// be called from multiple threads through a shared `&AtomicHistogram` without any locking.
///
/// Reads (e.g. `value_at_quantile`, `snapshot`) are not synchronized with concurrent writers:
/// a reader may observe a mix of counts from before and after a concurrent `record` call. Callers
/// that need a consistent point-in-time view across all bins should use [`crate::SyncHistogram`]
/// instead.
#[derive(Debug)]
pub struct AtomicHistogram {
    layout: Layout,
    counts: Box<[AtomicU64]>,
    max_value: AtomicU64,
    min_non_zero_value: AtomicU64,
    total_count: AtomicU64,
}

impl AtomicHistogram {
    /// Construct an `AtomicHistogram` given a known maximum value to be tracked, and a number of
    /// significant decimal digits. Implicitly tracks values as low as 1. See
    /// [`Histogram::new_with_max`] for details on the parameters.
    pub fn new_with_max(high: u64, sigfig: u8) -> Result<AtomicHistogram, CreationError> {
        Self::new_with_bounds(1, high, sigfig)
    }

    /// Construct an `AtomicHistogram` with known upper and lower bounds for recorded sample
    /// values. See [`Histogram::new_with_bounds`] for details on the parameters.
    pub fn new_with_bounds(low: u64, high: u64, sigfig: u8) -> Result<AtomicHistogram, CreationError> {
        let (layout, len) = Layout::new(low, high, sigfig)?;

        let mut counts = Vec::with_capacity(len);
        counts.resize_with(len, || AtomicU64::new(0));

        Ok(AtomicHistogram {
            layout,
            counts: counts.into_boxed_slice(),
            max_value: AtomicU64::new(ORIGINAL_MAX),
            min_non_zero_value: AtomicU64::new(ORIGINAL_MIN),
            total_count: AtomicU64::new(0),
        })
    }

    /// Record `value` in the histogram.
    ///
    /// Returns an error if `value` is outside this histogram's fixed range.
    pub fn record(&self, value: u64) -> Result<(), RecordError> {
        self.record_n(value, 1)
    }

    /// Record multiple samples for a value in the histogram, adding to the value's current count.
    pub fn record_n(&self, value: u64, count: u64) -> Result<(), RecordError> {
        let index = self
            .layout
            .index_for(value)
            .filter(|&i| i < self.counts.len())
            .ok_or(RecordError::ValueOutOfRange)?;

        // direct indexing is safe: `index` was just bounds-checked against `self.counts.len()`.
        self.counts[index].fetch_add(count, Ordering::Relaxed);
        self.total_count.fetch_add(count, Ordering::Relaxed);
        self.update_max(value);
        self.update_min(value);
        Ok(())
    }

    /// Get the total number of samples recorded.
    pub fn len(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Returns true if this histogram has no recorded values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the count of recorded values at a specific value (to within the histogram resolution).
    pub fn count_at(&self, value: u64) -> u64 {
        let index = self
            .layout
            .index_for(value)
            .map_or(self.counts.len() - 1, |i| i.min(self.counts.len() - 1));
        self.counts[index].load(Ordering::Relaxed)
    }

    /// Get the highest recorded value level in the histogram. Returns 0 if empty.
    pub fn max(&self) -> u64 {
        let max_value = self.max_value.load(Ordering::Relaxed);
        if max_value == ORIGINAL_MAX {
            ORIGINAL_MAX
        } else {
            self.layout.highest_equivalent(max_value)
        }
    }

    /// Get the lowest recorded non-zero value level in the histogram. Returns `u64::max_value()`
    /// if empty.
    pub fn min_nz(&self) -> u64 {
        let min_value = self.min_non_zero_value.load(Ordering::Relaxed);
        if min_value == ORIGINAL_MIN {
            ORIGINAL_MIN
        } else {
            self.layout.lowest_equivalent(min_value)
        }
    }

    /// Take a point-in-time, non-atomic snapshot of this histogram's counts.
    ///
    /// Because the individual bin loads are not synchronized with each other, the resulting
    /// `Histogram` may not correspond to any single instant in the writer's history if writers are
    /// concurrently recording; its `.len()` may not equal the sum of its bins either. It is,
    /// however, exact for a histogram with no concurrent writers.
    pub fn snapshot(&self) -> Histogram<u64> {
        let mut h = Histogram::new_with_bounds(
            self.layout.lowest_discernible_value,
            self.layout.highest_trackable_value,
            self.layout.significant_value_digits,
        )
        .expect("same parameters that built this AtomicHistogram");

        for (index, count) in self.counts.iter().enumerate() {
            let count = count.load(Ordering::Relaxed);
            if count != 0 {
                let value = self.layout.value_for(index);
                h.record_n(value, count)
                    .expect("value representable by an identically configured Histogram");
            }
        }

        h
    }

    fn update_max(&self, value: u64) {
        let candidate = value | self.layout.unit_magnitude_mask;
        let mut current = self.max_value.load(Ordering::Relaxed);
        while candidate > current {
            match self.max_value.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    fn update_min(&self, value: u64) {
        if value <= self.layout.unit_magnitude_mask {
            return; // unit-equivalent to 0
        }

        let candidate = value & !self.layout.unit_magnitude_mask;
        let mut current = self.min_non_zero_value.load(Ordering::Relaxed);
        while candidate < current {
            match self.min_non_zero_value.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }
}
