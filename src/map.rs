use core::{borrow::Borrow, fmt, ops::Index};

use alloc::vec::Vec;

use crate::{
    Cursor, Error, IntoIter, Iter, IterMut, Keys, Redwood, RedwoodOptions, Result, TreeBacked, Values,
    ValuesMut,
};

/// An associative array, storing key-value pairs.
///
/// Uses a Redwood red-black tree keyed on `K`, so at most one value is stored per key.
#[derive(Clone, PartialEq, Eq)]
pub struct RedwoodMap<K, V> {
    tree: Redwood<K, V>,
}

impl<K, V> RedwoodMap<K, V> {
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
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
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

    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V)> {
        self.tree.entry_at(cursor)
    }

    pub fn value_at_mut(&mut self, cursor: Cursor) -> Result<&mut V> {
        self.tree.value_at_mut(cursor)
    }

    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> {
        self.tree.erase(cursor)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.tree.iter(),
        }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.tree.iter(),
        }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.tree.iter_mut(),
        }
    }
}

impl<K: Ord, V> RedwoodMap<K, V> {
    /// Inserts `value` under `key` unless the key is already mapped, in which case the stored value is
    /// kept and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        let existing = self.tree.find_node(&key);
        if !existing.is_nil() {
            return Ok((self.tree.cursor_at(existing), false));
        }

        self.tree.insert(key, value).map(|cursor| (cursor, true))
    }

    /// Inserts `value` under `key`, overwriting the stored value if there is one.
    ///
    /// The returned flag is `true` when a new entry was created.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        let existing = self.tree.find_node(&key);
        match self.tree.value_mut(existing) {
            Some(slot) => {
                *slot = value;
                Ok((self.tree.cursor_at(existing), false))
            }
            None => self.tree.insert(key, value).map(|cursor| (cursor, true)),
        }
    }

    /// Inserts every pair in turn with [`RedwoodMap::insert`], stopping at the first error.
    pub fn emplace<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) -> Result<Vec<(Cursor, bool)>> {
        entries
            .into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Value mapped to `key`, or [`Error::KeyNotFound`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Value mapped to `key`, inserting `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> Result<&mut V>
    where
        V: Default,
    {
        let cursor = match self.tree.find_node(&key) {
            node if node.is_nil() => self.tree.insert(key, V::default())?,
            node => self.tree.cursor_at(node),
        };

        self.tree.value_at_mut(cursor)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
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

    /// Removes `key` and returns the value it mapped to.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.tree.find_node(key);
        self.tree.unlink(node).map(|(_, (_, value))| value)
    }

    /// Moves the entries of `other` whose keys are not mapped in `self`. The rest stay in `other`.
    pub fn merge(&mut self, other: &mut Self) -> Result<()> {
        self.tree.merge_unique(&mut other.tree)
    }
}

impl<K, V> TreeBacked for RedwoodMap<K, V> {
    type Key = K;
    type Value = V;

    fn tree(&self) -> &Redwood<K, V> {
        &self.tree
    }
}

impl<K, V> Default for RedwoodMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedwoodMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<K, Q, V> Index<&Q> for RedwoodMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not mapped.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("{}", Error::KeyNotFound),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RedwoodMap<K, V> {
    /// Later pairs with an already mapped key are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the map would grow past its maximum size.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for RedwoodMap<K, V> {
    /// # Panics
    ///
    /// Panics if the map would grow past its maximum size.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(error) = self.insert(key, value) {
                panic!("cannot extend map: {error}");
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RedwoodMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RedwoodMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RedwoodMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, RedwoodOptions};

    use super::RedwoodMap;

    #[test]
    pub fn map_entry_multi_insertion() {
        let mut map = RedwoodMap::<usize, usize>::new();

        map.insert(3, 17).unwrap();
        map.insert(2, 12).unwrap();
        map.insert(1, 7).unwrap();

        assert!(map.contains_key(&2));
        assert!(map.contains_key(&1));
        assert!(map.contains_key(&3));

        let (cursor, inserted) = map.insert(3, 19).unwrap();
        assert!(!inserted);
        assert_eq!(map.entry_at(cursor), Ok((&3, &17)));
        assert_eq!(*map.get(&3).unwrap(), 17);
    }

    #[test]
    pub fn map_update_entry() {
        let mut map = RedwoodMap::<usize, usize>::new();

        map.insert(3, 17).unwrap();
        *map.get_mut(&3).unwrap() = 5;

        assert_eq!(*map.get(&3).unwrap(), 5);
    }

    #[test]
    pub fn map_insert_or_assign_overwrites() {
        let mut map = RedwoodMap::new();

        map.insert("a", 1).unwrap();
        let (_, inserted) = map.insert_or_assign("a", 2).unwrap();

        assert!(!inserted);
        assert_eq!(map.at("a"), Ok(&2));
        assert_eq!(map.len(), 1);

        let (cursor, inserted) = map.insert_or_assign("b", 3).unwrap();
        assert!(inserted);
        assert_eq!(cursor.value(&map), Ok(&3));
    }

    #[test]
    pub fn map_at_reports_missing_keys() {
        let mut map: RedwoodMap<String, u32> = [("one".to_string(), 1)].into_iter().collect();

        assert_eq!(map.at("two"), Err(Error::KeyNotFound));
        assert_eq!(map.at_mut("two"), Err(Error::KeyNotFound));

        *map.at_mut("one").unwrap() += 10;
        assert_eq!(map["one"], 11);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    pub fn map_index_panics_on_missing_key() {
        let map: RedwoodMap<u8, u8> = RedwoodMap::new();
        let _value: u8 = map[&0];
    }

    #[test]
    pub fn map_get_or_insert_default() {
        let mut counts: RedwoodMap<&str, u32> = RedwoodMap::new();

        for word in ["red", "black", "red", "red"] {
            *counts.get_or_insert_default(word).unwrap() += 1;
        }

        assert_eq!(counts.iter().collect::<Vec<_>>(), [(&"black", &1), (&"red", &3)]);
    }

    #[test]
    pub fn map_erase_and_remove() {
        let mut map: RedwoodMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();

        let cursor = map.find(&2);
        assert_eq!(map.erase(cursor), Ok((2, 'b')));
        assert_eq!(map.remove(&3), Some('c'));
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1]);
    }

    #[test]
    pub fn map_merge_moves_absent_keys_only() {
        let mut left: RedwoodMap<i32, &str> = [(1, "left"), (2, "left")].into_iter().collect();
        let mut right: RedwoodMap<i32, &str> = [(2, "right"), (3, "right")].into_iter().collect();

        left.merge(&mut right).unwrap();

        assert_eq!(left.values().copied().collect::<Vec<_>>(), ["left", "left", "right"]);
        assert_eq!(right.into_iter().collect::<Vec<_>>(), [(2, "right")]);
    }

    #[test]
    pub fn map_values_mut_and_iter_mut() {
        let mut map: RedwoodMap<u8, u32> = (0..5).map(|key| (key, u32::from(key))).collect();

        for value in map.values_mut() {
            *value *= 10;
        }
        for (key, value) in &mut map {
            if *key == 4 {
                *value = 0;
            }
        }

        assert_eq!(map.values().copied().collect::<Vec<_>>(), [0, 10, 20, 30, 0]);
        assert_eq!(format!("{:?}", map), "{0: 0, 1: 10, 2: 20, 3: 30, 4: 0}");
    }

    #[test]
    pub fn map_emplace_respects_max_size() {
        let mut map = RedwoodMap::with_options(RedwoodOptions::default().with_max_size(2));

        let results = map.emplace([(1, 'x'), (1, 'y'), (2, 'z')]).unwrap();
        assert_eq!(results.iter().filter(|(_, inserted)| *inserted).count(), 2);
        assert_eq!(map.get(&1), Some(&'x'));

        assert_eq!(map.insert(3, 'w'), Err(Error::Overflow { max_size: 2 }));
        assert!(matches!(map.insert_or_assign(2, 'v'), Ok((_, false))));
        assert_eq!(map[&2], 'v');
    }

    #[test]
    pub fn map_cursor_walk_reads_pairs() {
        let map: RedwoodMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();

        let mut cursor = map.begin();
        assert_eq!(cursor.entry(&map), Ok((&1, &"one")));

        cursor.advance(&map).unwrap();
        assert_eq!(cursor.entry(&map), Ok((&2, &"two")));

        cursor.advance(&map).unwrap();
        assert_eq!(cursor, map.end());
        assert_eq!(map.entry_at(cursor), Err(Error::OutOfRange));
    }
}
