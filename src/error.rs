//! Error types for the cache access layer.
//!
//! Every failure the engine reports through a sentinel value (null handle,
//! null buffer) is converted into one of these variants at the boundary.
//! Sentinels never escape into calling code, and a zero-length read is a
//! successful outcome, never an error.

use crate::address::CacheAddress;
use thiserror::Error;

/// Error taxonomy for cache access operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The engine could not open a cache store at the given path
    #[error("engine failed to open cache store at {path:?}")]
    OpenFailed { path: String },

    /// Key material was supplied but was not exactly four 32-bit words.
    /// Detected locally, before any engine call is made.
    #[error("XTEA key must be exactly 4 words, got {len}")]
    InvalidKey { len: usize },

    /// The engine signalled failure for this address, or reported a
    /// negative length that cannot be trusted
    #[error("engine failed to read {address}")]
    ReadFailed { address: CacheAddress },

    /// A read was attempted on a handle that has already been closed
    #[error("cache handle is closed")]
    UseAfterClose,

    /// The local copy of the engine's buffer could not be allocated.
    /// Distinct from `ReadFailed`: the engine succeeded, this layer did not.
    #[error("failed to allocate {len} bytes for materialized content")]
    AllocationFailed { len: usize },
}
