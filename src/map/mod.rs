//! Map Module
//!
//! Key → value map whose values live in one FileBackedList.
//!
//! ## Responsibilities
//! - Keep the key → slot mapping in memory
//! - Store values through the list (updates overwrite the same slot)
//! - Hold the value of the `None` key in a dedicated in-memory cell
//! - Reclaim slots of removed keys on `compact()`
//!
//! ## Layout
//! ```text
//!   keys (memory)              FileBackedList (scratch file)
//! ┌──────────┬──────┐        ┌──────┬──────┬──────┬──────┐
//! │ "alpha"  │  0 ──┼───────▶│ v0   │ v1   │ v2   │ v3   │
//! │ "beta"   │  2 ──┼──┐     └──────┴──────┴──────┴──────┘
//! └──────────┴──────┘  └──────────────────▲
//!                                   slot 1 and 3: removed keys (orphaned)
//! ```

mod iterator;
mod table;

pub use iterator::Entries;
pub use table::FileBackedMap;
