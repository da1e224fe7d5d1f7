//! Index entry definitions
//!
//! Defines the in-memory record that locates one stored value.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Location and identity of one stored value
///
/// `size == 0` marks an absent value: nothing was written and reads do no IO.
/// `value_hash` is taken once, when the value is written, and is never
/// recomputed.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry {
    /// Byte offset of the ciphered value in the scratch file
    position: u64,

    /// Length of the ciphered value in bytes
    size: u32,

    /// Hash of the value at insertion time
    value_hash: i32,

    /// Keystream seed used to cipher this value
    seed: u64,

    /// CRC32 of the plaintext encoded bytes
    checksum: u32,
}

impl IndexEntry {
    pub(crate) fn new(position: u64, size: u32, value_hash: i32, seed: u64, checksum: u32) -> Self {
        Self {
            position,
            size,
            value_hash,
            seed,
            checksum,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn value_hash(&self) -> i32 {
        self.value_hash
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// True for an entry holding an absent value
    pub fn is_absent(&self) -> bool {
        self.size == 0
    }

    /// End of this entry's byte range (exclusive)
    pub fn end(&self) -> u64 {
        self.position + u64::from(self.size)
    }
}

/// Entries are equal when position, size and value hash match.
/// Seed and checksum do not take part.
impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.size == other.size
            && self.value_hash == other.value_hash
    }
}

impl Eq for IndexEntry {}

/// Hash of a possibly-absent value, folded to 32 bits
///
/// Absent values hash to 0. Stable for the lifetime of the process, which is
/// all a scratch file ever needs.
pub fn value_hash<T: Hash + ?Sized>(value: Option<&T>) -> i32 {
    match value {
        None => 0,
        Some(v) => {
            let mut hasher = DefaultHasher::new();
            v.hash(&mut hasher);
            let h = hasher.finish();
            (h ^ (h >> 32)) as u32 as i32
        }
    }
}
