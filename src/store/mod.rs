//! Store Module
//!
//! File-backed list storage: the core every collection type builds on.
//!
//! ## Responsibilities
//! - Keep a compact positional index in memory
//! - Append obfuscated value bytes to a private scratch file
//! - Read values back by seeking to their recorded offset
//! - Rebuild the file on demand to drop orphaned bytes
//!
//! ## File Format
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┐
//! │ Value 0      │ Value 1      │ Value 0'     │ ... │
//! │ (ciphered)   │ (ciphered)   │ (after set)  │     │
//! └──────────────┴──────────────┴──────────────┴─────┘
//! ```
//! The file holds no headers, lengths or offsets. Only the in-memory index
//! can interpret it, so it cannot be reopened once its owner is gone.
//!
//! ## Index Entry
//! ```text
//! ┌──────────────┬──────────┬────────────────┬───────────┬──────────────┐
//! │ Position (8) │ Size (4) │ ValueHash (4)  │ Seed (8)  │ Checksum (4) │
//! └──────────────┴──────────┴────────────────┴───────────┴──────────────┘
//! ```
//! `Size = 0` marks an absent value; nothing is written for it.

pub mod cipher;
mod entry;
mod iterator;
mod list;
mod scratch;

pub use entry::{value_hash, IndexEntry};
pub use iterator::Iter;
pub use list::FileBackedList;
pub use scratch::ScratchFile;
