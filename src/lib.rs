//! # filebacked
//!
//! List, set and map collections whose contents may exceed memory:
//! - Only a compact index is kept in RAM
//! - Values are appended, obfuscated, to a private scratch file
//! - Compaction rewrites the file to drop bytes of replaced/removed values
//! - The scratch file is deleted when its collection is closed or dropped
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │    FileBackedMap     │   │    FileBackedSet     │
//! │ (key → slot, None    │   │ (unique on insert)   │
//! │  key cell)           │   │                      │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │                          │
//!            └────────────┬─────────────┘
//!                         ▼
//!              ┌──────────────────────┐
//!              │    FileBackedList    │
//!              │  (Vec<IndexEntry>)   │
//!              └──────────┬───────────┘
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼              ▼              ▼
//!   ┌────────────┐ ┌────────────┐ ┌─────────────┐
//!   │   Codec    │ │   Cipher   │ │ ScratchFile │
//!   │ (bincode)  │ │ (keystream)│ │  (append)   │
//!   └────────────┘ └────────────┘ └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use filebacked::FileBackedList;
//!
//! let mut list: FileBackedList<String> = FileBackedList::new();
//! list.push("hello".to_string())?;
//! list.push(None)?;
//! assert_eq!(list.get(0)?, Some("hello".to_string()));
//! assert_eq!(list.get(1)?, None);
//! list.close()?;
//! # Ok::<(), filebacked::CollectionError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod store;
pub mod collection;
pub mod set;
pub mod map;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CollectionError, Result};
pub use config::Config;
pub use codec::{BincodeCodec, Codec};
pub use collection::{Collection, KeyedCollection};
pub use store::FileBackedList;
pub use set::FileBackedSet;
pub use map::FileBackedMap;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of filebacked
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
