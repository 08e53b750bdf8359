use core::{borrow::Borrow, fmt};

use alloc::vec::Vec;

use crate::{Cursor, IntoIter, Keys, Redwood, RedwoodOptions, Result, TreeBacked};

/// An ordered collection of keys that may repeat.
///
/// Equal keys are kept in the order they were inserted.
#[derive(Clone, PartialEq, Eq)]
pub struct RedwoodMultiset<K> {
    tree: Redwood<K>,
}

impl<K> RedwoodMultiset<K> {
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

    pub fn get(&self, cursor: Cursor) -> Result<&K> {
        cursor.key(self)
    }

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

impl<K: Ord> RedwoodMultiset<K> {
    /// Inserts `key` after every key equal to it.
    pub fn insert(&mut self, key: K) -> Result<Cursor> {
        self.tree.insert(key, ())
    }

    pub fn emplace<I: IntoIterator<Item = K>>(&mut self, keys: I) -> Result<Vec<Cursor>> {
        keys.into_iter().map(|key| self.insert(key)).collect()
    }

    /// Removes the earliest inserted instance of `key`.
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

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.count(key)
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

    /// Cursors delimiting the keys equal to `key`: the first of them and the one past the last.
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        (self.tree.lower_bound(key), self.tree.upper_bound(key))
    }

    /// Moves every key of `other` into `self`.
    pub fn merge(&mut self, other: &mut Self) -> Result<()> {
        self.tree.merge_all(&mut other.tree)
    }
}

impl<K> TreeBacked for RedwoodMultiset<K> {
    type Key = K;
    type Value = ();

    fn tree(&self) -> &Redwood<K> {
        &self.tree
    }
}

impl<K> Default for RedwoodMultiset<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RedwoodMultiset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RedwoodMultiset<K> {
    /// # Panics
    ///
    /// Panics if the multiset would grow past its maximum size.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<K: Ord> Extend<K> for RedwoodMultiset<K> {
    /// # Panics
    ///
    /// Panics if the multiset would grow past its maximum size.
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            if let Err(error) = self.insert(key) {
                panic!("cannot extend multiset: {error}");
            }
        }
    }
}

impl<'a, K> IntoIterator for &'a RedwoodMultiset<K> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> IntoIterator for RedwoodMultiset<K> {
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

    use super::RedwoodMultiset;

    #[test]
    pub fn multiset_counts_and_erases_one() {
        let mut multiset = RedwoodMultiset::new();
        for _ in 0..3 {
            multiset.insert(10).unwrap();
        }

        assert_eq!(multiset.count(&10), 3);

        let cursor = multiset.find(&10);
        assert_eq!(multiset.erase(cursor), Ok(10));
        assert_eq!(multiset.count(&10), 2);
        assert_eq!(multiset.len(), 2);
    }

    #[test]
    pub fn multiset_equal_range_spans_duplicates() {
        let multiset: RedwoodMultiset<i32> = [4, 1, 4, 9, 4, 2].into_iter().collect();

        let (mut first, last) = multiset.equal_range(&4);
        let mut seen = 0;
        while first != last {
            assert_eq!(multiset.get(first), Ok(&4));
            first.advance(&multiset).unwrap();
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert_eq!(multiset.get(last), Ok(&9));

        let (first, last) = multiset.equal_range(&5);
        assert_eq!(first, last);

        let (first, last) = multiset.equal_range(&9);
        assert_eq!(multiset.get(first), Ok(&9));
        assert_eq!(last, multiset.end());
    }

    #[derive(Debug, Clone, Copy)]
    struct Tagged(u8, char);

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> core::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    #[test]
    pub fn multiset_remove_takes_earliest_instance() {
        let mut multiset: RedwoodMultiset<Tagged> =
            [Tagged(1, 'a'), Tagged(2, 'b'), Tagged(1, 'c'), Tagged(1, 'd')].into_iter().collect();

        let removed = multiset.remove(&Tagged(1, '?')).unwrap();
        assert_eq!(removed.1, 'a');

        let tags: Vec<_> = multiset.iter().map(|tagged| tagged.1).collect();
        assert_eq!(tags, ['c', 'd', 'b']);
    }

    #[test]
    pub fn multiset_merge_moves_everything() {
        let mut left: RedwoodMultiset<i32> = [1, 2, 3].into_iter().collect();
        let mut right: RedwoodMultiset<i32> = [2, 3, 4].into_iter().collect();

        left.merge(&mut right).unwrap();

        assert_eq!(left.into_iter().collect::<Vec<_>>(), [1, 2, 2, 3, 3, 4]);
        assert!(right.is_empty());
    }

    #[test]
    pub fn multiset_emplace_and_overflow() {
        let mut multiset = RedwoodMultiset::with_options(RedwoodOptions::default().with_max_size(3));

        let cursors = multiset.emplace([7, 7, 7]).unwrap();
        assert_eq!(cursors.len(), 3);
        assert_eq!(multiset.insert(7), Err(Error::Overflow { max_size: 3 }));
        assert_eq!(format!("{multiset:?}"), "[7, 7, 7]");
    }
}
