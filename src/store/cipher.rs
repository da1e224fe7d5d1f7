//! Keystream obfuscation
//!
//! XORs stored bytes with a seed-derived pseudorandom stream so the scratch
//! file does not reveal its contents to casual inspection. This is masking,
//! not encryption: every entry has its own seed, but the generator is not
//! meant to resist analysis.
//!
//! All functions are pure. `apply` is its own inverse.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Deterministic pseudorandom byte sequence of exactly `len` bytes
pub fn keystream(seed: u64, len: usize) -> Vec<u8> {
    let mut stream = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut stream);
    stream
}

/// XOR `data` in place with the keystream for `seed`
///
/// Calling it twice with the same seed restores the original bytes.
pub fn apply(data: &mut [u8], seed: u64) {
    let stream = keystream(seed, data.len());
    for (byte, key) in data.iter_mut().zip(stream) {
        *byte ^= key;
    }
}

/// Copying form of [`apply`]
pub fn cipher(data: &[u8], seed: u64) -> Vec<u8> {
    let mut out = data.to_vec();
    apply(&mut out, seed);
    out
}

/// Draw a seed for a new entry
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}
