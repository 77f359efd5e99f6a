//! Bucket/sub-bucket indexing math shared by every counts-store implementation.
//!
//! `Layout` carries the dimensions derived from `(lowest, highest, significant_digits)` at
//! construction time. `Histogram<T>` and `AtomicHistogram` both hold one and delegate all
//! value-to-index and index-to-value computations to it, so the two counts stores can never
//! disagree about what index a value maps to.
use num_traits::ToPrimitive;

use crate::errors::CreationError;

/// Min value of a new histogram. Equivalent to `u64::max_value()`.
pub const ORIGINAL_MIN: u64 = (-1_i64 >> 63) as u64;
/// Max value of a new histogram.
pub const ORIGINAL_MAX: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    // >= 2 * lowest_discernible_value
    pub highest_trackable_value: u64,
    // >= 1
    pub lowest_discernible_value: u64,
    // in [0, 5]
    pub significant_value_digits: u8,

    // in [1, 64]
    pub bucket_count: u8,
    // 2^(sub_bucket_half_count_magnitude + 1) = [2, 2^18]
    pub sub_bucket_count: u32,
    // sub_bucket_count / 2 = [1, 2^17]
    pub sub_bucket_half_count: u32,
    // In [0, 17]
    pub sub_bucket_half_count_magnitude: u8,
    // The bottom sub bucket's bits set, shifted by unit magnitude.
    pub sub_bucket_mask: u64,

    // Number of leading zeros that would be used by the largest value in bucket 0.
    pub leading_zero_count_base: u8,

    // Largest exponent of 2 that's smaller than the lowest discernible value. In [0, 62].
    pub unit_magnitude: u8,
    // low unit_magnitude bits set
    pub unit_magnitude_mask: u64,
}

impl Layout {
    /// Validate `(low, high, sigfig)` and compute the bucket layout plus the number of counts
    /// entries needed to cover `high`. Mirrors the original HdrHistogram sizing algorithm.
    pub fn new(low: u64, high: u64, sigfig: u8) -> Result<(Layout, usize), CreationError> {
        if low < 1 {
            return Err(CreationError::LowIsZero);
        }
        if low > u64::max_value() / 2 {
            // avoid overflow in 2 * low
            return Err(CreationError::LowExceedsMax);
        }
        if high < 2 * low {
            return Err(CreationError::HighLessThanTwiceLow);
        }
        if sigfig > 5 {
            return Err(CreationError::SigFigExceedsMax);
        }

        // largest value with single unit resolution, in [2, 200_000].
        let largest = 2 * 10_u32.pow(u32::from(sigfig));

        let unit_magnitude = (low as f64).log2().floor() as u8;
        let unit_magnitude_mask = (1 << unit_magnitude) - 1;

        // In [1, 18]. 2^18 > 2 * 10^5 (the largest possible largest_value_with_single_unit_resolution)
        let sub_bucket_count_magnitude = (f64::from(largest)).log2().ceil() as u8;
        let sub_bucket_half_count_magnitude = sub_bucket_count_magnitude - 1;
        let sub_bucket_count = 1_u32 << u32::from(sub_bucket_count_magnitude);

        if unit_magnitude + sub_bucket_count_magnitude > 63 {
            return Err(CreationError::CannotRepresentSigFigBeyondLow);
        }

        let sub_bucket_half_count = sub_bucket_count / 2;
        let sub_bucket_mask = (u64::from(sub_bucket_count) - 1) << unit_magnitude;

        let mut layout = Layout {
            highest_trackable_value: high,
            lowest_discernible_value: low,
            significant_value_digits: sigfig,

            bucket_count: 0,
            sub_bucket_count,

            leading_zero_count_base: 64 - unit_magnitude - sub_bucket_count_magnitude,
            sub_bucket_half_count_magnitude,

            unit_magnitude,
            sub_bucket_half_count,

            sub_bucket_mask,

            unit_magnitude_mask,
        };

        // Already checked that high >= 2*low
        let buckets_needed = layout.buckets_to_cover(high);
        let len = layout
            .num_bins(buckets_needed)
            .to_usize()
            .ok_or(CreationError::UsizeTypeTooSmall)?;
        layout.bucket_count = buckets_needed;

        Ok((layout, len))
    }

    /// Find the number of buckets needed such that `value` is representable.
    pub fn buckets_to_cover(&self, value: u64) -> u8 {
        let mut smallest_untrackable_value = u64::from(self.sub_bucket_count) << self.unit_magnitude;

        let mut buckets_needed = 1;
        while smallest_untrackable_value <= value {
            if smallest_untrackable_value > u64::max_value() / 2 {
                return buckets_needed + 1;
            }
            smallest_untrackable_value <<= 1;
            buckets_needed += 1;
        }
        buckets_needed
    }

    /// Compute the actual number of bins to use for the given bucket count.
    pub fn num_bins(&self, number_of_buckets: u8) -> u32 {
        (u32::from(number_of_buckets) + 1) * self.sub_bucket_half_count
    }

    /// Find the bucket the given value should be placed in.
    /// Returns `None` if the corresponding index cannot be represented in `usize`.
    pub fn index_for(&self, value: u64) -> Option<usize> {
        let bucket_index = self.bucket_for(value);
        let sub_bucket_index = self.sub_bucket_for(value, bucket_index);

        debug_assert!(sub_bucket_index < self.sub_bucket_count);
        debug_assert!(bucket_index == 0 || (sub_bucket_index >= self.sub_bucket_half_count));

        let bucket_base_index = (i32::from(bucket_index) + 1) << self.sub_bucket_half_count_magnitude;
        let offset_in_bucket = sub_bucket_index as i32 - self.sub_bucket_half_count as i32;

        let index = bucket_base_index + offset_in_bucket;
        debug_assert!(index >= 0);
        index.to_usize()
    }

    /// Like `index_for`, but clamps to `last_index` if the index can't be represented, or the
    /// value is out of range.
    pub fn index_for_or_last(&self, value: u64, last_index: usize) -> usize {
        self.index_for(value)
            .map_or(last_index, |i| std::cmp::min(i, last_index))
    }

    /// Computes the matching histogram value for the given histogram bin.
    pub fn value_for(&self, index: usize) -> u64 {
        let mut bucket_index = (index >> self.sub_bucket_half_count_magnitude) as isize - 1;

        let mut sub_bucket_index = ((index.to_u32().expect("index must fit in u32"))
            & (self.sub_bucket_half_count - 1))
            + self.sub_bucket_half_count;
        if bucket_index < 0 {
            sub_bucket_index -= self.sub_bucket_half_count;
            bucket_index = 0;
        }
        self.value_from_loc(bucket_index as u8, sub_bucket_index)
    }

    /// Compute the lowest (and therefore highest precision) bucket index whose sub-buckets can
    /// represent the value.
    #[inline]
    pub fn bucket_for(&self, value: u64) -> u8 {
        self.leading_zero_count_base - (value | self.sub_bucket_mask).leading_zeros() as u8
    }

    /// Compute the position inside a bucket at which the given value should be recorded.
    #[inline]
    pub fn sub_bucket_for(&self, value: u64, bucket_index: u8) -> u32 {
        (value >> (bucket_index + self.unit_magnitude)) as u32
    }

    /// Compute the value corresponding to the provided bucket and sub bucket indices.
    #[inline]
    pub fn value_from_loc(&self, bucket_index: u8, sub_bucket_index: u32) -> u64 {
        u64::from(sub_bucket_index) << (bucket_index + self.unit_magnitude)
    }

    /// Get the lowest value that is equivalent to the given value within this resolution.
    pub fn lowest_equivalent(&self, value: u64) -> u64 {
        let bucket_index = self.bucket_for(value);
        let sub_bucket_index = self.sub_bucket_for(value, bucket_index);
        self.value_from_loc(bucket_index, sub_bucket_index)
    }

    /// Get the highest value that is equivalent to the given value within this resolution.
    pub fn highest_equivalent(&self, value: u64) -> u64 {
        if value == u64::max_value() {
            u64::max_value()
        } else {
            self.next_non_equivalent(value) - 1
        }
    }

    /// Get a value in the middle (rounded up) of the range of values equivalent to `value`.
    pub fn median_equivalent(&self, value: u64) -> u64 {
        self.lowest_equivalent(value)
            .checked_add(self.equivalent_range(value) >> 1)
            .expect("median equivalent should not overflow")
    }

    /// Get the next value that is *not* equivalent to the given value.
    pub fn next_non_equivalent(&self, value: u64) -> u64 {
        self.lowest_equivalent(value)
            .saturating_add(self.equivalent_range(value))
    }

    /// Get the size (in value units) of the range of values equivalent to `value`.
    pub fn equivalent_range(&self, value: u64) -> u64 {
        let bucket_index = self.bucket_for(value);
        1_u64 << (self.unit_magnitude + bucket_index)
    }
}
