//! Synchronized types that allow access to a [`Histogram`] from multiple threads.

use std::sync::Mutex;

use crate::errors::{AdditionError, CreationError, RecordError, SubtractionError};
use crate::{Counter, Histogram};

mod atomic;
pub use self::atomic::AtomicHistogram;

/// A `Mutex`-guarded [`Histogram`], for callers who need an exact, point-in-time consistent view
/// and can tolerate lock contention between writers and readers.
///
/// Every `SyncHistogram` carries the same `identity` as the [`Histogram`] it wraps. When two
/// `SyncHistogram`s are composed (e.g. via [`SyncHistogram::merge_from`]), their locks are always
/// acquired in identity order, so that two threads racing to merge `a` into `b` and `b` into `a`
/// at the same time can never deadlock.
#[derive(Debug)]
pub struct SyncHistogram<T: Counter> {
    identity: u64,
    inner: Mutex<Histogram<T>>,
}

impl<T: Counter> SyncHistogram<T> {
    /// Construct a `SyncHistogram` given a known maximum value to be tracked, and a number of
    /// significant decimal digits. See [`Histogram::new_with_max`] for details.
    pub fn new_with_max(high: u64, sigfig: u8) -> Result<SyncHistogram<T>, CreationError> {
        Ok(Histogram::new_with_max(high, sigfig)?.into())
    }

    /// Construct a `SyncHistogram` with known upper and lower bounds for recorded sample values.
    /// See [`Histogram::new_with_bounds`] for details.
    pub fn new_with_bounds(low: u64, high: u64, sigfig: u8) -> Result<SyncHistogram<T>, CreationError> {
        Ok(Histogram::new_with_bounds(low, high, sigfig)?.into())
    }

    /// The process-wide unique identity of the histogram this `SyncHistogram` wraps.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Record `value` in the histogram.
    pub fn record(&self, value: u64) -> Result<(), RecordError> {
        self.lock().record(value)
    }

    /// Record multiple samples for a value in the histogram.
    pub fn record_n(&self, value: u64, count: T) -> Result<(), RecordError> {
        self.lock().record_n(value, count)
    }

    /// Get the total number of samples recorded.
    pub fn len(&self) -> u64 {
        self.lock().len()
    }

    /// Returns true if this histogram has no recorded values.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take a snapshot of the current state of the histogram.
    pub fn snapshot(&self) -> Histogram<T> {
        self.lock().clone()
    }

    /// Merge the contents of `other` into this histogram.
    ///
    /// Locks are acquired in a fixed order (by histogram `identity`) regardless of which of
    /// `self`/`other` is larger, so concurrent merges in opposite directions cannot deadlock.
    /// Merging a `SyncHistogram` with itself is detected and handled by locking once.
    pub fn merge_from(&self, other: &SyncHistogram<T>) -> Result<(), AdditionError> {
        if std::ptr::eq(self, other) {
            let mut g = self.lock();
            let doubled = g.clone();
            return g.add(&doubled);
        }

        if self.identity < other.identity {
            let mut a = self.lock();
            let b = other.lock();
            a.add(&*b)
        } else {
            let b = other.lock();
            let mut a = self.lock();
            a.add(&*b)
        }
    }

    /// Subtract the contents of `other` from this histogram.
    ///
    /// Uses the same identity-ordered locking discipline as [`SyncHistogram::merge_from`].
    pub fn subtract(&self, other: &SyncHistogram<T>) -> Result<(), SubtractionError> {
        if std::ptr::eq(self, other) {
            let mut g = self.lock();
            let snapshot = g.clone();
            return g.subtract(&snapshot);
        }

        if self.identity < other.identity {
            let mut a = self.lock();
            let b = other.lock();
            a.subtract(&*b)
        } else {
            let b = other.lock();
            let mut a = self.lock();
            a.subtract(&*b)
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Histogram<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Counter> From<Histogram<T>> for SyncHistogram<T> {
    fn from(h: Histogram<T>) -> Self {
        SyncHistogram {
            identity: h.identity(),
            inner: Mutex::new(h),
        }
    }
}
