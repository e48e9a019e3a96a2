//! Error types for cache construction.

use thiserror::Error;

/// Result type alias for fallible `memolru` operations.
///
/// Only construction can fail; every other cache operation succeeds
/// deterministically.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by [`LruCache`](crate::LruCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested capacity cannot hold a single entry.
    ///
    /// Returned by [`LruCache::new`](crate::LruCache::new) when the supplied
    /// capacity is `0`; a cache must be able to hold at least one entry.
    #[error("invalid capacity {0}: an LRU cache must hold at least one entry")]
    InvalidCapacity(usize),
}
