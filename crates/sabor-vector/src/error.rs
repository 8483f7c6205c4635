//! Error types for sabor-vector.

use thiserror::Error;

/// Result type for sabor-vector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sabor-vector operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Collection already exists.
    #[error("Collection '{0}' already exists")]
    CollectionExists(String),

    /// Collection not found.
    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    /// Dimension mismatch between vector and collection.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// Invalid vector (e.g., empty, contains NaN).
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    /// Stored data violates a collection invariant.
    #[error("Corrupt collection '{name}': {reason}")]
    Corrupt {
        /// Collection name.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Persistence error (serialization, layout).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
