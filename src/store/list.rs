//! File-backed list
//!
//! Ordered collection whose values live in a scratch file while only the
//! index stays in memory.

use std::hash::Hash;
use std::marker::PhantomData;
use std::path::Path;

use crate::codec::{BincodeCodec, Codec};
use crate::config::Config;
use crate::error::{CollectionError, Result};

use super::cipher;
use super::entry::{value_hash, IndexEntry};
use super::iterator::Iter;
use super::scratch::ScratchFile;

/// List whose elements are stored, obfuscated, in an append-only file
///
/// ## Storage Model
/// - `index`: one `IndexEntry` per logical slot, in list order
/// - `file`: created lazily on the first mutation, replaced wholesale by
///   `clear()` and `compact()`
/// - `set()` and `remove()` never reclaim bytes; the old bytes stay in the
///   file as orphans until `compact()`
///
/// ## Concurrency:
/// Mutations take `&mut self`, so the borrow checker serializes them and
/// keeps iterators from observing a structural change. Reads take `&self`
/// and may run from several threads; the file lock makes each seek + read
/// atomic.
pub struct FileBackedList<T, C = BincodeCodec> {
    /// Scratch file configuration
    config: Config,

    /// Value ⇄ bytes conversion
    codec: C,

    /// In-memory index, one entry per slot
    index: Vec<IndexEntry>,

    /// Backing file; `None` until first mutation and after `clear()`
    file: Option<ScratchFile>,

    _marker: PhantomData<fn() -> T>,
}

impl<T> FileBackedList<T, BincodeCodec> {
    /// Create an empty list using the default config and codec
    ///
    /// No file is created until the first mutation.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty list with the given config and the default codec
    pub fn with_config(config: Config) -> Self {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<T> Default for FileBackedList<T, BincodeCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> FileBackedList<T, C> {
    /// Create an empty list with an explicit codec
    pub fn with_codec(config: Config, codec: C) -> Self {
        Self {
            config,
            codec,
            index: Vec::new(),
            file: None,
            _marker: PhantomData,
        }
    }

    /// Number of slots, absent values included
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current scratch file length in bytes, orphans included
    pub fn file_size(&self) -> Result<u64> {
        match &self.file {
            Some(file) => file.len(),
            None => Ok(0),
        }
    }

    /// Bytes referenced by live index entries
    pub fn live_bytes(&self) -> u64 {
        self.index.iter().map(|e| u64::from(e.size())).sum()
    }

    /// Bytes in the file that no live entry references
    pub fn orphan_bytes(&self) -> Result<u64> {
        Ok(self.file_size()?.saturating_sub(self.live_bytes()))
    }

    /// Index metadata, in list order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Path of the current scratch file, if one has been provisioned
    pub fn scratch_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.path())
    }

    /// Ordered fold over the stored value hashes
    ///
    /// Reflects the hashes taken at write time, not the current values.
    pub fn content_hash(&self) -> i32 {
        self.index
            .iter()
            .fold(1i32, |h, e| h.wrapping_mul(31).wrapping_add(e.value_hash()))
    }

    /// Structural comparison of index metadata
    ///
    /// True when both lists have the same length and content hash and every
    /// slot has the same position, size and value hash. Two lists holding
    /// equal values written through different histories compare unequal;
    /// use [`content_eq`](Self::content_eq) to compare values.
    pub fn same_layout<U, D>(&self, other: &FileBackedList<U, D>) -> bool {
        self.len() == other.len()
            && self.content_hash() == other.content_hash()
            && self.index.iter().zip(other.index.iter()).all(|(a, b)| a == b)
    }

    /// Drop every element and delete the scratch file
    ///
    /// A fresh file is provisioned on the next mutation.
    pub fn clear(&mut self) -> Result<()> {
        let dropped = self.index.len();
        self.index.clear();
        if let Some(file) = self.file.take() {
            file.close()?;
        }
        tracing::debug!("Cleared list ({} entries dropped)", dropped);
        Ok(())
    }

    /// Release the list, deleting its scratch file
    ///
    /// Dropping the list also deletes the file; `close` reports the error.
    pub fn close(mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_index(&self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(CollectionError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Provision the scratch file if there is none
    fn ensure_file(&mut self) -> Result<&ScratchFile> {
        if self.file.is_none() {
            self.file = Some(ScratchFile::create(&self.config)?);
        }
        self.file.as_ref().ok_or_else(|| {
            CollectionError::Initialization(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "scratch file missing after provisioning",
            ))
        })
    }
}

impl<T, C> FileBackedList<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    /// Read the value at `index`
    ///
    /// Absent values are returned without touching the file.
    pub fn get(&self, index: usize) -> Result<Option<T>> {
        self.check_index(index, self.len())?;
        self.read_entry(&self.index[index])
    }

    /// Append a value at the end of the list
    pub fn push(&mut self, value: impl Into<Option<T>>) -> Result<()> {
        let len = self.len();
        self.insert(len, value)
    }

    /// Insert a value at `index`, shifting later slots up by one
    ///
    /// `index` may equal `len()`.
    pub fn insert(&mut self, index: usize, value: impl Into<Option<T>>) -> Result<()> {
        self.check_index(index, self.len() + 1)?;
        let value = value.into();
        let entry = self.write_value(value.as_ref())?;
        self.index.insert(index, entry);
        Ok(())
    }

    /// Replace the value at `index`, returning the previous one
    ///
    /// The new bytes are appended; the old bytes become orphans.
    pub fn set(&mut self, index: usize, value: impl Into<Option<T>>) -> Result<Option<T>> {
        self.check_index(index, self.len())?;
        let previous = self.get(index)?;
        let value = value.into();
        let entry = self.write_value(value.as_ref())?;
        self.index[index] = entry;
        Ok(previous)
    }

    /// Remove the slot at `index`, returning its value
    ///
    /// Later slots shift down by one. The bytes stay in the file.
    pub fn remove(&mut self, index: usize) -> Result<Option<T>> {
        self.check_index(index, self.len())?;
        let value = self.get(index)?;
        self.index.remove(index);
        Ok(value)
    }

    /// Remove the first slot equal to `value`
    ///
    /// Returns whether a slot was removed.
    pub fn remove_value<'a>(&mut self, value: impl Into<Option<&'a T>>) -> Result<bool>
    where
        T: 'a,
    {
        match self.index_of(value)? {
            Some(index) => {
                self.index.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// First slot holding a value equal to `value`
    ///
    /// Compares stored hashes first and only decodes on a hash match.
    pub fn index_of<'a>(&self, value: impl Into<Option<&'a T>>) -> Result<Option<usize>>
    where
        T: 'a,
    {
        let value = value.into();
        let hash = value_hash(value);
        for (i, entry) in self.index.iter().enumerate() {
            if self.entry_matches(entry, value, hash)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    pub fn contains<'a>(&self, value: impl Into<Option<&'a T>>) -> Result<bool>
    where
        T: 'a,
    {
        Ok(self.index_of(value)?.is_some())
    }

    /// True if every value in `values` is present
    pub fn contains_all<'a, I>(&self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for value in values {
            if !self.contains(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Append every value; returns whether the list changed
    pub fn push_all<I, V>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<T>>,
    {
        let mut changed = false;
        for value in values {
            self.push(value)?;
            changed = true;
        }
        Ok(changed)
    }

    /// Remove one occurrence of each value; returns whether the list changed
    pub fn remove_all<'a, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut changed = false;
        for value in values {
            changed |= self.remove_value(value)?;
        }
        Ok(changed)
    }

    /// Keep only the slots for which `keep` returns true
    ///
    /// Every value is decoded once. Returns whether the list changed.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<bool>
    where
        F: FnMut(Option<&T>) -> bool,
    {
        let mut changed = false;
        let mut i = 0;
        while i < self.index.len() {
            let value = self.read_entry(&self.index[i])?;
            if keep(value.as_ref()) {
                i += 1;
            } else {
                self.index.remove(i);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Compare decoded values slot by slot
    pub fn content_eq<D>(&self, other: &FileBackedList<T, D>) -> Result<bool>
    where
        D: Codec<T>,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        for (a, b) in self.iter().zip(other.iter()) {
            if a? != b? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Lazy iterator over all slots in order
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(self)
    }

    /// Test the slot at `index` against `value` without a full scan
    pub(crate) fn slot_matches(&self, index: usize, value: Option<&T>) -> Result<bool> {
        self.check_index(index, self.len())?;
        self.entry_matches(&self.index[index], value, value_hash(value))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn entry_matches(&self, entry: &IndexEntry, value: Option<&T>, hash: i32) -> Result<bool> {
        if entry.value_hash() != hash {
            return Ok(false);
        }
        match value {
            None => Ok(entry.is_absent()),
            Some(_) if entry.is_absent() => Ok(false),
            Some(v) => Ok(self.read_entry(entry)?.as_ref() == Some(v)),
        }
    }

    /// Read, decipher, verify and decode one entry
    fn read_entry(&self, entry: &IndexEntry) -> Result<Option<T>> {
        if entry.is_absent() {
            return Ok(None);
        }
        let file = self.file.as_ref().ok_or_else(|| {
            CollectionError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "entry references a scratch file that does not exist",
            ))
        })?;

        let mut bytes = file.read_at(entry.position(), entry.size() as usize)?;
        cipher::apply(&mut bytes, entry.seed());

        let actual = crc32fast::hash(&bytes);
        if actual != entry.checksum() {
            return Err(CollectionError::Corruption {
                position: entry.position(),
                expected: entry.checksum(),
                actual,
            });
        }

        self.codec.decode(&bytes).map(Some)
    }

    /// Encode, cipher and append a value, returning its new index entry
    ///
    /// Always provisions the file, so a failed provisioning blocks every
    /// mutation, absent values included.
    fn write_value(&mut self, value: Option<&T>) -> Result<IndexEntry> {
        let encoded = match value {
            Some(v) => Some(self.codec.encode(v)?),
            None => None,
        };
        let hash = value_hash(value);
        let seed = cipher::fresh_seed();
        let file = self.ensure_file()?;

        match encoded {
            Some(mut bytes) if !bytes.is_empty() => {
                let size = u32::try_from(bytes.len()).map_err(|_| {
                    CollectionError::Encoding(format!(
                        "Encoded value too large: {} bytes (max {})",
                        bytes.len(),
                        u32::MAX
                    ))
                })?;
                let checksum = crc32fast::hash(&bytes);
                cipher::apply(&mut bytes, seed);
                let position = file.append(&bytes)?;
                Ok(IndexEntry::new(position, size, hash, seed, checksum))
            }
            _ => Ok(IndexEntry::new(file.len()?, 0, hash, seed, 0)),
        }
    }
}

impl<T, C> FileBackedList<T, C>
where
    T: Hash + Eq,
    C: Codec<T> + Clone,
{
    /// Rewrite the list into a fresh scratch file, dropping orphan bytes
    ///
    /// Order and values are preserved; every value gets a new seed. The old
    /// file is deleted once the new one is complete. Once the swap is made
    /// the call succeeds; failing to delete the old file is only logged.
    pub fn compact(&mut self) -> Result<()> {
        let before = self.file_size()?;
        let mut rebuilt = FileBackedList::with_codec(self.config.clone(), self.codec.clone());
        for value in self.iter() {
            rebuilt.push(value?)?;
        }

        let after = rebuilt.file_size()?;

        let old_file = std::mem::replace(&mut self.file, rebuilt.file.take());
        self.index = std::mem::take(&mut rebuilt.index);
        if let Some(file) = old_file {
            if let Err(e) = file.close() {
                tracing::warn!("Failed to delete replaced scratch file: {}", e);
            }
        }

        tracing::debug!(
            "Compacted list: {} entries, {} -> {} bytes",
            self.len(),
            before,
            after
        );
        Ok(())
    }
}

impl<'a, T, C> IntoIterator for &'a FileBackedList<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    type Item = Result<Option<T>>;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> std::fmt::Debug for FileBackedList<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedList")
            .field("len", &self.index.len())
            .field("file", &self.file)
            .finish()
    }
}
