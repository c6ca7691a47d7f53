use thiserror::Error;

/// Errors produced by configuration validation, ingestion, and seeding.
///
/// Degenerate clusters and budget exhaustion are deliberately *not* errors:
/// both leave the caller with a usable result and are reported through
/// [`KMeansFit`](crate::engine::KMeansFit) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A point failed validation at ingestion.
    #[error("invalid point: {0}")]
    InvalidPoint(&'static str),

    /// Points (or a query point) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension fixed by the store.
        expected: usize,
        /// Dimension of the offending vector.
        found: usize,
    },

    /// Seeding needs k distinct point locations and the dataset has fewer.
    #[error("seeding requires {requested} distinct point locations, found {distinct}")]
    InsufficientDistinctPoints {
        /// Number of centroids requested.
        requested: usize,
        /// Distinct locations present in the dataset.
        distinct: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
