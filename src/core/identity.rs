use std::sync::atomic::{AtomicU64, Ordering};

/// A process-wide monotonically increasing counter, used to give every histogram a unique
/// `identity`. `SyncHistogram` uses identity order to decide the order in which to acquire locks
/// when composing two histograms, so that two threads racing to add `a` to `b` and `b` to `a`
/// can't deadlock.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(0);

/// Allocate the next identity in process-wide order. Relaxed ordering is sufficient: callers only
/// care that the values handed out are distinct and totally ordered, not that this provides any
/// synchronization with other memory accesses.
pub fn next() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}
