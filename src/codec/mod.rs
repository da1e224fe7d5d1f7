//! Codec Module
//!
//! Turns element values into bytes and back.
//!
//! ## Responsibilities
//! - Lossless value ⇄ bytes round trip
//! - Explicit, versioned on-disk representation
//! - Report unsupported values as Encoding/Decoding errors
//!
//! ## Record Format (V1)
//! ```text
//! ┌─────────────┬───────────────────────────────────┐
//! │ Version (1) │ bincode 1.x payload of the value  │
//! └─────────────┴───────────────────────────────────┘
//! ```
//!
//! Absent values (`None`) never reach a codec: collections store them as
//! zero-size entries without touching the file.

mod binary;

pub use binary::{BincodeCodec, FORMAT_VERSION};

use crate::error::Result;

/// Converts values of type `T` to bytes and back
///
/// Implementations must be deterministic enough that `decode(encode(v)) == v`
/// for every value they accept.
pub trait Codec<T> {
    /// Encode a value to bytes
    fn encode(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode a value previously produced by `encode`
    fn decode(&self, bytes: &[u8]) -> Result<T>;
}
