use core::{borrow::Borrow, fmt};

use alloc::vec::Vec;

use crate::{Cursor, IntoIter, Keys, Redwood, RedwoodOptions, Result, TreeBacked};

/// An ordered set of unique keys.
///
/// Uses a Redwood red-black tree with unit values.
#[derive(Clone, PartialEq, Eq)]
pub struct RedwoodSet<K> {
    tree: Redwood<K>,
}

impl<K> RedwoodSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Redwood::new(),
        }
    }

    #[must_use]
    pub fn with_options(options: RedwoodOptions) -> Self {
        Self {
            tree: Redwood::with_options(options),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.tree.begin()
    }

    #[must_use]
    pub fn end(&self) -> Cursor {
        self.tree.end()
    }

    /// Key under `cursor`.
    pub fn get(&self, cursor: Cursor) -> Result<&K> {
        cursor.key(self)
    }

    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|(key, _)| key)
    }

    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|(key, _)| key)
    }

    /// Removes the key under `cursor`. See [`Redwood::erase`] for what happens to other cursors.
    pub fn erase(&mut self, cursor: Cursor) -> Result<K> {
        self.tree.erase(cursor).map(|(key, ())| key)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    pub fn iter(&self) -> Keys<'_, K, ()> {
        Keys {
            inner: self.tree.iter(),
        }
    }
}

impl<K: Ord> RedwoodSet<K> {
    /// Inserts `key` unless an equal key is already present.
    ///
    /// Returns a cursor to the element holding the key and whether it was inserted.
    pub fn insert(&mut self, key: K) -> Result<(Cursor, bool)> {
        let existing = self.tree.find_node(&key);
        if !existing.is_nil() {
            return Ok((self.tree.cursor_at(existing), false));
        }

        self.tree.insert(key, ()).map(|cursor| (cursor, true))
    }

    /// Inserts every key in turn, stopping at the first error. Keys inserted before the error stay.
    pub fn emplace<I: IntoIterator<Item = K>>(&mut self, keys: I) -> Result<Vec<(Cursor, bool)>> {
        keys.into_iter().map(|key| self.insert(key)).collect()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.tree.find_node(key);
        self.tree.unlink(node).map(|(_, (key, ()))| key)
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.lower_bound(key)
    }

    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.upper_bound(key)
    }

    /// Moves every key of `other` missing from `self`; keys both sets hold stay in `other`.
    pub fn merge(&mut self, other: &mut Self) -> Result<()> {
        self.tree.merge_unique(&mut other.tree)
    }
}

impl<K> TreeBacked for RedwoodSet<K> {
    type Key = K;
    type Value = ();

    fn tree(&self) -> &Redwood<K> {
        &self.tree
    }
}

impl<K> Default for RedwoodSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RedwoodSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RedwoodSet<K> {
    /// # Panics
    ///
    /// Panics if the set would grow past its maximum size.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Ord> Extend<K> for RedwoodSet<K> {
    /// # Panics
    ///
    /// Panics if the set would grow past its maximum size.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            if let Err(error) = self.insert(key) {
                panic!("cannot extend set: {error}");
            }
        }
    }
}

impl<'a, K> IntoIterator for &'a RedwoodSet<K> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for RedwoodSet<K> {
    type Item = K;
    type IntoIter = core::iter::Map<IntoIter<K, ()>, fn((K, ())) -> K>;

    fn into_iter(self) -> Self::IntoIter {
        let key_of: fn((K, ())) -> K = |(key, ())| key;
        self.tree.into_iter().map(key_of)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, RedwoodOptions};

    use super::RedwoodSet;

    #[test]
    pub fn set_rejects_duplicates() {
        let mut set = RedwoodSet::new();

        let (first, inserted) = set.insert(7).unwrap();
        assert!(inserted);

        let (again, inserted) = set.insert(7).unwrap();
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(set.len(), 1);
    }

    #[test]
    pub fn set_merge_leaves_duplicates_behind() {
        let mut left: RedwoodSet<i32> = [1, 2, 3].into_iter().collect();
        let mut right: RedwoodSet<i32> = [2, 3, 4].into_iter().collect();

        left.merge(&mut right).unwrap();

        assert_eq!(left.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(right.iter().copied().collect::<Vec<_>>(), [2, 3]);
        assert_eq!(left, [4, 3, 2, 1].into_iter().collect::<RedwoodSet<_>>());
    }

    #[test]
    pub fn set_emplace_reports_each_key() {
        let mut set = RedwoodSet::new();
        set.insert(2).unwrap();

        let results = set.emplace([1, 2, 3]).unwrap();
        let inserted: Vec<_> = results.iter().map(|(_, inserted)| *inserted).collect();

        assert_eq!(inserted, [true, false, true]);
        assert_eq!(set.get(results[1].0), Ok(&2));
    }

    #[test]
    pub fn set_emplace_stops_on_overflow() {
        let mut set = RedwoodSet::with_options(RedwoodOptions::default().with_max_size(2));

        assert_eq!(set.emplace([1, 1, 2, 3, 4]), Err(Error::Overflow { max_size: 2 }));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2]);

        // A duplicate is still reported as present when the set is full.
        assert!(matches!(set.insert(2), Ok((_, false))));
    }

    #[test]
    pub fn set_erase_and_remove() {
        let mut set: RedwoodSet<String> = ["pear", "apple", "fig"].into_iter().map(String::from).collect();

        let begin = set.begin();
        assert_eq!(set.erase(begin), Ok("apple".to_string()));
        assert_eq!(set.remove("fig"), Some("fig".to_string()));
        assert_eq!(set.remove("fig"), None);

        assert!(set.contains("pear"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.erase(set.end()), Err(Error::InvalidCursor));
    }

    #[test]
    pub fn set_cursor_walk() {
        let set: RedwoodSet<i32> = [30, 10, 20].into_iter().collect();

        let mut cursor = set.find(&20);
        cursor.advance(&set).unwrap();
        assert_eq!(set.get(cursor), Ok(&30));

        cursor.advance(&set).unwrap();
        assert_eq!(cursor, set.end());
        assert_eq!(set.get(cursor), Err(Error::OutOfRange));

        assert_eq!(set.find(&25), set.end());
        assert_eq!(set.get(set.lower_bound(&25)), Ok(&30));
        assert_eq!(set.get(set.upper_bound(&10)), Ok(&20));
    }

    #[test]
    pub fn set_clear_swap_and_debug() {
        let mut left: RedwoodSet<u8> = [3, 1, 2].into_iter().collect();
        let mut right = RedwoodSet::default();

        left.swap(&mut right);
        assert!(left.is_empty());
        assert_eq!(format!("{right:?}"), "{1, 2, 3}");
        assert_eq!(right.first(), Some(&1));
        assert_eq!(right.last(), Some(&3));

        let copy = right.clone();
        right.clear();
        assert!(right.is_empty());
        assert_eq!(copy.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
    }
}
