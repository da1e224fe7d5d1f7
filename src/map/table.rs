//! File-backed map implementation
//!
//! HashMap of keys to list slots, with the values in a FileBackedList.

use std::collections::hash_map::Keys;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use crate::codec::{BincodeCodec, Codec};
use crate::collection::KeyedCollection;
use crate::config::Config;
use crate::error::Result;
use crate::set::FileBackedSet;
use crate::store::FileBackedList;

use super::iterator::Entries;

/// Map whose values are stored in a scratch file
///
/// ## Slots
/// - A new key appends its value to the list and records the slot
/// - Updating a key overwrites the same slot (old bytes become orphans)
/// - Removing a key drops only the mapping; its slot stays in the list until
///   `compact()` rebuilds the list from reachable slots
///
/// ## The `None` key
/// Lives in an in-memory cell outside the list. At most one value is held
/// for it; writing again replaces that value.
pub struct FileBackedMap<K, V, C = BincodeCodec> {
    /// Key → slot in `storage`
    index: HashMap<K, usize>,

    /// Values, addressed by slot
    storage: FileBackedList<V, C>,

    /// Value of the `None` key; outer `None` = never set (or removed)
    null_value: Option<Option<V>>,
}

impl<K, V> FileBackedMap<K, V, BincodeCodec> {
    /// Create an empty map using the default config and codec
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<K, V> Default for FileBackedMap<K, V, BincodeCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> FileBackedMap<K, V, C> {
    pub fn with_codec(config: Config, codec: C) -> Self {
        Self {
            index: HashMap::new(),
            storage: FileBackedList::with_codec(config, codec),
            null_value: None,
        }
    }

    /// Number of live keys, the `None` key included when set
    pub fn len(&self) -> usize {
        self.index.len() + usize::from(self.null_value.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live non-`None` keys
    ///
    /// Borrowed view of the current key set.
    pub fn keys(&self) -> Keys<'_, K, usize> {
        self.index.keys()
    }

    /// Scratch file length in bytes, orphans included
    pub fn file_size(&self) -> Result<u64> {
        self.storage.file_size()
    }

    /// List slots no key refers to any more
    pub fn orphaned_slots(&self) -> usize {
        self.storage.len() - self.index.len()
    }

    pub fn scratch_path(&self) -> Option<&Path> {
        self.storage.scratch_path()
    }

    /// Remove every key, the `None` key included, and delete the file
    pub fn clear(&mut self) -> Result<()> {
        self.index.clear();
        self.null_value = None;
        self.storage.clear()
    }

    pub fn close(self) -> Result<()> {
        self.storage.close()
    }

    pub(super) fn storage(&self) -> &FileBackedList<V, C> {
        &self.storage
    }

    pub(super) fn null_cell(&self) -> Option<&Option<V>> {
        self.null_value.as_ref()
    }

    pub(super) fn slots(&self) -> std::collections::hash_map::Iter<'_, K, usize> {
        self.index.iter()
    }

    /// Reachable slots in ascending order
    fn live_slots(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self.index.values().copied().collect();
        slots.sort_unstable();
        slots
    }
}

impl<K, V, C> FileBackedMap<K, V, C>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
    C: Codec<V>,
{
    /// Map `key` to `value`, returning the previous value
    ///
    /// An existing key reuses its slot; a new key appends a slot.
    pub fn insert(
        &mut self,
        key: impl Into<Option<K>>,
        value: impl Into<Option<V>>,
    ) -> Result<Option<V>> {
        let value = value.into();
        let key = match key.into() {
            Some(key) => key,
            None => return Ok(self.null_value.replace(value).flatten()),
        };

        if let Some(&slot) = self.index.get(&key) {
            return self.storage.set(slot, value);
        }

        let slot = self.storage.len();
        self.storage.push(value)?;
        self.index.insert(key, slot);
        Ok(None)
    }

    /// Insert every pair; later pairs win
    pub fn insert_all<I, Q, W>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (Q, W)>,
        Q: Into<Option<K>>,
        W: Into<Option<V>>,
    {
        for (key, value) in pairs {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Value for `key`, or `None` if the key is not mapped
    pub fn get<'a>(&self, key: impl Into<Option<&'a K>>) -> Result<Option<V>>
    where
        K: 'a,
    {
        match key.into() {
            None => Ok(self.null_value.clone().flatten()),
            Some(key) => match self.index.get(key) {
                Some(&slot) => self.storage.get(slot),
                None => Ok(None),
            },
        }
    }

    /// Whether `key` is mapped
    ///
    /// For the `None` key this is the cell's presence flag.
    pub fn contains_key<'a>(&self, key: impl Into<Option<&'a K>>) -> bool
    where
        K: 'a,
    {
        match key.into() {
            None => self.null_value.is_some(),
            Some(key) => self.index.contains_key(key),
        }
    }

    /// Whether any live key maps to `value`, the `None` key included
    ///
    /// Slots of removed keys are not considered.
    pub fn contains_value<'a>(&self, value: impl Into<Option<&'a V>>) -> Result<bool>
    where
        V: 'a,
    {
        let value = value.into();
        if let Some(cell) = &self.null_value {
            if cell.as_ref() == value {
                return Ok(true);
            }
        }
        for &slot in self.index.values() {
            if self.storage.slot_matches(slot, value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Unmap `key`, returning its value
    ///
    /// The slot and its bytes stay in the list until `compact()`.
    pub fn remove<'a>(&mut self, key: impl Into<Option<&'a K>>) -> Result<Option<V>>
    where
        K: 'a,
    {
        match key.into() {
            None => Ok(self.null_value.take().flatten()),
            Some(key) => {
                let value = self.get(key)?;
                self.index.remove(key);
                Ok(value)
            }
        }
    }

    /// Lazy `(key, value)` sequence; the `None` key comes first when set
    pub fn iter(&self) -> Entries<'_, K, V, C> {
        Entries::new(self)
    }
}

impl<K, V, C> FileBackedMap<K, V, C>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
    C: Codec<V> + Clone,
{
    /// Snapshot of the live values in a new FileBackedSet
    ///
    /// Values are written to the set's own scratch file, in slot order, with
    /// the `None` key's value first. Later map changes are not reflected.
    pub fn values(&self) -> Result<FileBackedSet<V, C>> {
        let mut values =
            FileBackedSet::with_codec(self.storage.config().clone(), self.storage.codec().clone());
        if let Some(cell) = &self.null_value {
            values.insert(cell.clone())?;
        }
        for slot in self.live_slots() {
            values.insert(self.storage.get(slot)?)?;
        }
        Ok(values)
    }

    /// Rebuild the list from reachable slots only
    ///
    /// Drops the slots of removed keys and all orphan bytes, then remaps
    /// every key to its new slot.
    pub fn compact(&mut self) -> Result<()> {
        let before = self.storage.file_size()?;
        let reclaimed = self.orphaned_slots();

        let mut rebuilt =
            FileBackedList::with_codec(self.storage.config().clone(), self.storage.codec().clone());
        let mut remap = HashMap::with_capacity(self.index.len());
        for old_slot in self.live_slots() {
            remap.insert(old_slot, rebuilt.len());
            rebuilt.push(self.storage.get(old_slot)?)?;
        }

        let after = rebuilt.file_size()?;

        for slot in self.index.values_mut() {
            if let Some(&new_slot) = remap.get(&*slot) {
                *slot = new_slot;
            }
        }
        let old = std::mem::replace(&mut self.storage, rebuilt);
        if let Err(e) = old.close() {
            tracing::warn!("Failed to delete replaced scratch file: {}", e);
        }

        tracing::debug!(
            "Compacted map: {} keys, {} slots reclaimed, {} -> {} bytes",
            self.index.len(),
            reclaimed,
            before,
            after
        );
        Ok(())
    }
}

impl<K, V, C> std::fmt::Debug for FileBackedMap<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackedMap")
            .field("keys", &self.index.len())
            .field("null_key", &self.null_value.is_some())
            .field("storage", &self.storage)
            .finish()
    }
}

// =============================================================================
// KeyedCollection Implementation
// =============================================================================

impl<K, V, C> KeyedCollection<K, V> for FileBackedMap<K, V, C>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
    C: Codec<V>,
{
    fn len(&self) -> usize {
        FileBackedMap::len(self)
    }

    fn is_empty(&self) -> bool {
        FileBackedMap::is_empty(self)
    }

    fn insert(&mut self, key: Option<K>, value: Option<V>) -> Result<Option<V>> {
        FileBackedMap::insert(self, key, value)
    }

    fn get(&self, key: Option<&K>) -> Result<Option<V>> {
        FileBackedMap::get(self, key)
    }

    fn contains_key(&self, key: Option<&K>) -> bool {
        FileBackedMap::contains_key(self, key)
    }

    fn contains_value(&self, value: Option<&V>) -> Result<bool> {
        FileBackedMap::contains_value(self, value)
    }

    fn remove(&mut self, key: Option<&K>) -> Result<Option<V>> {
        FileBackedMap::remove(self, key)
    }

    fn clear(&mut self) -> Result<()> {
        FileBackedMap::clear(self)
    }

    fn file_size(&self) -> Result<u64> {
        FileBackedMap::file_size(self)
    }
}
