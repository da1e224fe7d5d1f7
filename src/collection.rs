//! Collection capabilities
//!
//! `Collection` is the operation set shared by the positional collection
//! types; `KeyedCollection` is its counterpart for maps. Each type implements
//! every operation itself; there are no default bodies.

use std::hash::Hash;

use crate::codec::Codec;
use crate::error::Result;
use crate::store::FileBackedList;

/// Positional, file-backed collection of possibly-absent values
pub trait Collection<T> {
    /// Number of slots
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    /// Add a value at the end. Returns false if the collection refused it.
    fn add(&mut self, value: Option<T>) -> Result<bool>;

    /// Value at `index`; fails with `OutOfBounds` outside `0..len()`
    fn get(&self, index: usize) -> Result<Option<T>>;

    /// Replace the value at `index`, returning the previous value
    fn set(&mut self, index: usize, value: Option<T>) -> Result<Option<T>>;

    /// Remove the slot at `index`, returning its value
    fn remove(&mut self, index: usize) -> Result<Option<T>>;

    fn contains(&self, value: Option<&T>) -> Result<bool>;

    /// Drop all values and the backing file
    fn clear(&mut self) -> Result<()>;

    /// Backing file length in bytes
    fn file_size(&self) -> Result<u64>;

    /// Values in slot order
    fn iter(&self) -> Box<dyn Iterator<Item = Result<Option<T>>> + '_>;
}

/// Key → value collection of possibly-absent keys and values
///
/// Slots are an internal detail of a map, so none of the positional
/// `Collection` operations apply. The `None` key is a regular key here.
pub trait KeyedCollection<K, V> {
    /// Number of mapped keys, the `None` key included
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;

    /// Map `key` to `value`, returning the previous value
    fn insert(&mut self, key: Option<K>, value: Option<V>) -> Result<Option<V>>;

    /// Value for `key`; `None` when the key is not mapped
    fn get(&self, key: Option<&K>) -> Result<Option<V>>;

    fn contains_key(&self, key: Option<&K>) -> bool;

    /// Whether any mapped key holds `value`
    fn contains_value(&self, value: Option<&V>) -> Result<bool>;

    /// Unmap `key`, returning its value
    fn remove(&mut self, key: Option<&K>) -> Result<Option<V>>;

    /// Drop all keys and the backing file
    fn clear(&mut self) -> Result<()>;

    /// Backing file length in bytes
    fn file_size(&self) -> Result<u64>;
}

impl<T, C> Collection<T> for FileBackedList<T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    fn len(&self) -> usize {
        FileBackedList::len(self)
    }

    fn is_empty(&self) -> bool {
        FileBackedList::is_empty(self)
    }

    fn add(&mut self, value: Option<T>) -> Result<bool> {
        self.push(value)?;
        Ok(true)
    }

    fn get(&self, index: usize) -> Result<Option<T>> {
        FileBackedList::get(self, index)
    }

    fn set(&mut self, index: usize, value: Option<T>) -> Result<Option<T>> {
        FileBackedList::set(self, index, value)
    }

    fn remove(&mut self, index: usize) -> Result<Option<T>> {
        FileBackedList::remove(self, index)
    }

    fn contains(&self, value: Option<&T>) -> Result<bool> {
        FileBackedList::contains(self, value)
    }

    fn clear(&mut self) -> Result<()> {
        FileBackedList::clear(self)
    }

    fn file_size(&self) -> Result<u64> {
        FileBackedList::file_size(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Result<Option<T>>> + '_> {
        Box::new(FileBackedList::iter(self))
    }
}
