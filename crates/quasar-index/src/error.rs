//! Spatial index error types.

/// Errors that can occur when building the spatial index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The index was asked to cover zero chunks. Caller misuse; the table
    /// size equals the key count, so an empty table is meaningless.
    #[error("cannot build a spatial index over zero chunks")]
    EmptyInput,

    /// No displacement value below the search bound placed every member of
    /// some bucket. Deterministic for a given key set, so it is surfaced
    /// rather than retried; the caller may resize or re-key, not this crate.
    #[error("displacement search exhausted for a bucket of {bucket_len} keys")]
    DisplacementExhausted {
        /// Number of keys in the bucket that could not be placed.
        bucket_len: usize,
    },
}
