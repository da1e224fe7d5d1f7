//! List Iterator
//!
//! Sequential iteration over all slots of a FileBackedList.

use std::hash::Hash;

use crate::codec::Codec;
use crate::error::Result;

use super::list::FileBackedList;

/// Iterator over list values in slot order
///
/// Each step reads one value from the scratch file. The iterator borrows the
/// list, so the list cannot change while it is alive.
pub struct Iter<'a, T, C> {
    list: &'a FileBackedList<T, C>,
    /// Next slot to yield from the front
    front: usize,
    /// One past the next slot to yield from the back
    back: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(super) fn new(list: &'a FileBackedList<T, C>) -> Self {
        Self {
            list,
            front: 0,
            back: list.len(),
        }
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    /// None value = absent element
    type Item = Result<Option<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.list.get(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.list.get(self.back))
    }
}

impl<'a, T, C> ExactSizeIterator for Iter<'a, T, C>
where
    T: Hash + Eq,
    C: Codec<T>,
{
}
