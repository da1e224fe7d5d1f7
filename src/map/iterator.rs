//! Map entry iterator
//!
//! Lazy `(key, value)` sequence over a FileBackedMap.

use std::collections::hash_map;
use std::hash::Hash;

use crate::codec::Codec;
use crate::error::Result;

use super::table::FileBackedMap;

/// Iterator over map entries
///
/// Values are read from the scratch file one step at a time, so iterating a
/// large map never holds more than one value in memory. The `None` key, when
/// set, is yielded first. Key order is otherwise unspecified.
pub struct Entries<'a, K, V, C> {
    map: &'a FileBackedMap<K, V, C>,
    null_pending: bool,
    slots: hash_map::Iter<'a, K, usize>,
}

impl<'a, K, V, C> Entries<'a, K, V, C> {
    pub(super) fn new(map: &'a FileBackedMap<K, V, C>) -> Self {
        Self {
            map,
            null_pending: map.null_cell().is_some(),
            slots: map.slots(),
        }
    }
}

impl<'a, K, V, C> Iterator for Entries<'a, K, V, C>
where
    K: Hash + Eq,
    V: Hash + Eq + Clone,
    C: Codec<V>,
{
    type Item = Result<(Option<&'a K>, Option<V>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.null_pending {
            self.null_pending = false;
            let value = self.map.null_cell().cloned().flatten();
            return Some(Ok((None, value)));
        }

        let (key, &slot) = self.slots.next()?;
        Some(self.map.storage().get(slot).map(|value| (Some(key), value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.slots.len() + usize::from(self.null_pending);
        (remaining, Some(remaining))
    }
}
