//! Error types for the `bucketmap_rs` crate

use std::collections::TryReserveError;

/// Errors returned by the containers in this crate.
///
/// Lookups that simply miss are not errors: they return `None` or `false`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A requested capacity was rejected.
    ///
    /// Hash maps need a positive power of two, the other containers
    /// need at least one slot.
    #[error("invalid capacity {0}")]
    InvalidCapacity(usize),

    /// A load factor outside `(0, 1]` was requested.
    #[error("invalid load factor {0}, expected a value in (0, 1]")]
    InvalidLoadFactor(f64),

    /// Doubling the bucket array would overflow `usize`.
    ///
    /// The map keeps its current capacity and stays usable.
    #[error("capacity overflow while doubling {0} buckets")]
    CapacityOverflow(usize),

    /// The allocator could not provide room for the requested number of slots.
    #[error("failed to allocate {0} slots")]
    Alloc(usize),

    /// The radix map has no free slot left. One slot is always held back.
    #[error("radix map is full (max {max}, one slot reserved)")]
    Full {
        /// Allocated size of the map.
        max: usize,
    },

    /// An index was outside of the addressable range.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The length it was checked against.
        len: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reserve exactly `additional` more slots in `buf`, mapping failure to [`Error::Alloc`].
pub(crate) fn try_reserve<T>(buf: &mut Vec<T>, additional: usize) -> Result<()> {
    buf.try_reserve_exact(additional)
        .map_err(|err: TryReserveError| {
            tracing::error!(additional, %err, "slot reservation failed");
            Error::Alloc(additional)
        })
}
