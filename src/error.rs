//! Error types for filebacked
//!
//! Provides a unified error type for all collection operations.

use thiserror::Error;

/// Result type alias using CollectionError
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Unified error type for file-backed collection operations
#[derive(Debug, Error)]
pub enum CollectionError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The scratch file could not be provisioned. Mutations keep failing with
    /// this error until provisioning succeeds.
    #[error("Scratch file initialization failed: {0}")]
    Initialization(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Index out of bounds: {index} (len {len})")]
    OutOfBounds { index: usize, len: usize },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Integrity Errors
    // -------------------------------------------------------------------------
    #[error("Checksum mismatch at offset {position}: expected {expected:#010x}, got {actual:#010x}")]
    Corruption {
        position: u64,
        expected: u32,
        actual: u32,
    },
}
