//! File-backed set
//!
//! A FileBackedList that refuses to add a value equal to one it already
//! holds. Everything else is the list's behavior, orphan bytes included.

use std::hash::Hash;
use std::path::Path;

use crate::codec::{BincodeCodec, Codec};
use crate::collection::Collection;
use crate::config::Config;
use crate::error::Result;
use crate::store::{FileBackedList, Iter};

/// Set of unique values stored in a scratch file
///
/// Uniqueness is enforced on insertion only. `set()` replaces a slot without
/// checking, so it can introduce a duplicate.
pub struct FileBackedSet<T, C = BincodeCodec> {
    list: FileBackedList<T, C>,
}

impl<T> FileBackedSet<T, BincodeCodec> {
    /// Create an empty set using the default config and codec
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<T> Default for FileBackedSet<T, BincodeCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> FileBackedSet<T, C> {
    pub fn with_codec(config: Config, codec: C) -> Self {
        Self {
            list: FileBackedList::with_codec(config, codec),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn file_size(&self) -> Result<u64> {
        self.list.file_size()
    }

    pub fn content_hash(&self) -> i32 {
        self.list.content_hash()
    }

    /// See [`FileBackedList::same_layout`]
    pub fn same_layout<U, D>(&self, other: &FileBackedSet<U, D>) -> bool {
        self.list.same_layout(&other.list)
    }

    pub fn scratch_path(&self) -> Option<&Path> {
        self.list.scratch_path()
    }

    /// The underlying list, in insertion order
    pub fn as_list(&self) -> &FileBackedList<T, C> {
        &self.list
    }

    pub fn clear(&mut self) -> Result<()> {
        self.list.clear()
    }

    pub fn close(self) -> Result<()> {
        self.list.close()
    }
}

impl<T, C> FileBackedSet<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    /// Add `value` unless an equal value is present
    ///
    /// Returns true if the value was added.
    pub fn insert(&mut self, value: impl Into<Option<T>>) -> Result<bool> {
        let value = value.into();
        if self.list.contains(value.as_ref())? {
            return Ok(false);
        }
        self.list.push(value)?;
        Ok(true)
    }

    /// Insert every value; returns whether the set changed
    pub fn insert_all<I, V>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<T>>,
    {
        let mut changed = false;
        for value in values {
            changed |= self.insert(value)?;
        }
        Ok(changed)
    }

    pub fn contains<'a>(&self, value: impl Into<Option<&'a T>>) -> Result<bool>
    where
        T: 'a,
    {
        self.list.contains(value)
    }

    pub fn contains_all<'a, I>(&self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.list.contains_all(values)
    }

    pub fn index_of<'a>(&self, value: impl Into<Option<&'a T>>) -> Result<Option<usize>>
    where
        T: 'a,
    {
        self.list.index_of(value)
    }

    pub fn get(&self, index: usize) -> Result<Option<T>> {
        self.list.get(index)
    }

    /// Replace the value at `index` without a uniqueness check
    pub fn set(&mut self, index: usize, value: impl Into<Option<T>>) -> Result<Option<T>> {
        self.list.set(index, value)
    }

    /// Remove `value`; returns whether it was present
    pub fn remove<'a>(&mut self, value: impl Into<Option<&'a T>>) -> Result<bool>
    where
        T: 'a,
    {
        self.list.remove_value(value)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Option<T>> {
        self.list.remove(index)
    }

    pub fn remove_all<'a, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.list.remove_all(values)
    }

    pub fn retain<F>(&mut self, keep: F) -> Result<bool>
    where
        F: FnMut(Option<&T>) -> bool,
    {
        self.list.retain(keep)
    }

    /// Values in insertion order
    pub fn iter(&self) -> Iter<'_, T, C> {
        self.list.iter()
    }
}

impl<T, C> FileBackedSet<T, C>
where
    T: Hash + Eq,
    C: Codec<T> + Clone,
{
    /// See [`FileBackedList::compact`]
    pub fn compact(&mut self) -> Result<()> {
        self.list.compact()
    }
}

impl<'a, T, C> IntoIterator for &'a FileBackedSet<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    type Item = Result<Option<T>>;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<T, C> std::fmt::Debug for FileBackedSet<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedSet").field("list", &self.list).finish()
    }
}

// =============================================================================
// Collection Implementation
// =============================================================================

impl<T, C> Collection<T> for FileBackedSet<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    fn len(&self) -> usize {
        FileBackedSet::len(self)
    }

    fn is_empty(&self) -> bool {
        FileBackedSet::is_empty(self)
    }

    fn add(&mut self, value: Option<T>) -> Result<bool> {
        self.insert(value)
    }

    fn get(&self, index: usize) -> Result<Option<T>> {
        FileBackedSet::get(self, index)
    }

    fn set(&mut self, index: usize, value: Option<T>) -> Result<Option<T>> {
        FileBackedSet::set(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<Option<T>> {
        self.remove_at(index)
    }

    fn contains(&self, value: Option<&T>) -> Result<bool> {
        FileBackedSet::contains(self, value)
    }

    fn clear(&mut self) -> Result<()> {
        FileBackedSet::clear(self)
    }

    fn file_size(&self) -> Result<u64> {
        FileBackedSet::file_size(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Result<Option<T>>> + '_> {
        Box::new(FileBackedSet::iter(self))
    }
}
