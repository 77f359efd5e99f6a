//! core components and types used throughout this library

/// Counter type defining operations required by the histogram and impls for primitives.
pub mod counter;

/// Process-wide histogram identity allocation, used to order lock acquisition in `SyncHistogram`.
pub mod identity;

/// Bucket/sub-bucket indexing math shared by every counts-store implementation.
pub mod index;
