use core::fmt;

use crate::{Redwood, Result, node::NodeIndex};

/// Anything whose elements live in a [`Redwood`] and can therefore be walked with a [`Cursor`].
pub trait TreeBacked {
    type Key;
    type Value;

    fn tree(&self) -> &Redwood<Self::Key, Self::Value>;
}

impl<K, V> TreeBacked for Redwood<K, V> {
    type Key = K;
    type Value = V;

    fn tree(&self) -> &Redwood<K, V> {
        self
    }
}

/// A position inside a tree-backed container.
///
/// A cursor is either on an element, on the `end()` position one past the largest key, or null (the
/// `begin()`/`end()` of an empty container, or [`Cursor::default`]). It does not borrow the container:
/// every operation takes the container it came from. Two cursors are equal when they point at the same
/// node.
///
/// Stepping wraps around the `end()` position: advancing from `end()` stays there, retreating from
/// `end()` lands on the largest key, and retreating from `begin()` lands on `end()`.
///
/// ```
/// use redwood::RedwoodSet;
///
/// let set: RedwoodSet<_> = [42, 241, 86, 43, 90, 66, 34].into_iter().collect();
///
/// let mut cursor = set.begin();
/// cursor.retreat(&set).unwrap();
/// assert_eq!(cursor, set.end());
///
/// cursor.retreat(&set).unwrap();
/// assert_eq!(cursor.key(&set), Ok(&241));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    node: NodeIndex,
    generation: u32,
}

impl Cursor {
    pub(crate) const fn null() -> Self {
        Self {
            node: NodeIndex::NIL,
            generation: 0,
        }
    }

    pub(crate) fn new(node: NodeIndex, generation: u32) -> Self {
        Self { node, generation }
    }

    #[inline]
    pub(crate) fn node(&self) -> NodeIndex {
        self.node
    }

    #[inline]
    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.node.is_nil()
    }

    /// Whether the cursor sits one past the largest key of `container`.
    pub fn is_end<T: TreeBacked + ?Sized>(&self, container: &T) -> bool {
        !self.is_null() && self.node == container.tree().sentinel
    }

    /// Moves to the next larger key, or to `end()` after the largest one.
    pub fn advance<T: TreeBacked + ?Sized>(&mut self, container: &T) -> Result<()> {
        let tree = container.tree();
        let node = tree.resolve(*self)?;

        let next = match tree.next_node(node) {
            next if next.is_nil() => tree.find_sentinel_from(node),
            next => next,
        };

        *self = tree.cursor_at(next);
        Ok(())
    }

    /// Moves to the next smaller key; from `begin()` this wraps to `end()`.
    pub fn retreat<T: TreeBacked + ?Sized>(&mut self, container: &T) -> Result<()> {
        let tree = container.tree();
        let node = tree.resolve(*self)?;

        let prev = match tree.prev_node(node) {
            prev if prev.is_nil() => tree.find_sentinel_from(node),
            prev => prev,
        };

        *self = tree.cursor_at(prev);
        Ok(())
    }

    pub fn key<'a, T: TreeBacked + ?Sized>(&self, container: &'a T) -> Result<&'a T::Key> {
        container.tree().entry_at(*self).map(|(key, _)| key)
    }

    pub fn value<'a, T: TreeBacked + ?Sized>(&self, container: &'a T) -> Result<&'a T::Value> {
        container.tree().entry_at(*self).map(|(_, value)| value)
    }

    pub fn entry<'a, T: TreeBacked + ?Sized>(
        &self,
        container: &'a T,
    ) -> Result<(&'a T::Key, &'a T::Value)> {
        container.tree().entry_at(*self)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Cursor(null)")
        } else {
            f.debug_tuple("Cursor")
                .field(&self.node.0)
                .field(&self.generation)
                .finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cursor, Error, Redwood};

    fn tree_of(keys: &[i32]) -> Redwood<i32> {
        keys.iter().map(|&key| (key, ())).collect()
    }

    #[test]
    pub fn forward_walk_reaches_end() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let mut keys = Vec::new();

        let mut cursor = tree.begin();
        while cursor != tree.end() {
            keys.push(*cursor.key(&tree).unwrap());
            cursor.advance(&tree).unwrap();
        }

        assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
        assert!(cursor.is_end(&tree));
    }

    #[test]
    pub fn backward_walk_from_end() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let mut keys = Vec::new();

        let mut cursor = tree.end();
        loop {
            cursor.retreat(&tree).unwrap();
            if cursor.is_end(&tree) {
                break;
            }
            keys.push(*cursor.key(&tree).unwrap());
        }

        assert_eq!(keys, [9, 8, 7, 5, 4, 3, 1]);
    }

    #[test]
    pub fn advancing_past_end_stays_at_end() {
        let tree = tree_of(&[1, 2, 3]);

        let mut cursor = tree.end();
        cursor.advance(&tree).unwrap();
        assert_eq!(cursor, tree.end());

        cursor.advance(&tree).unwrap();
        assert_eq!(cursor, tree.end());
    }

    #[test]
    pub fn retreating_past_begin_wraps_to_end() {
        let tree = tree_of(&[42, 241, 86, 43, 90, 66, 34]);

        let mut cursor = tree.begin();
        cursor.retreat(&tree).unwrap();
        assert!(cursor.is_end(&tree));

        let mut keys = Vec::new();
        for _ in 0..7 {
            cursor.retreat(&tree).unwrap();
            keys.push(*cursor.key(&tree).unwrap());
        }
        assert_eq!(keys, [241, 90, 86, 66, 43, 42, 34]);

        cursor.retreat(&tree).unwrap();
        cursor.retreat(&tree).unwrap();
        assert_eq!(cursor.key(&tree), Ok(&241));
    }

    #[test]
    pub fn single_element_ring() {
        let tree = tree_of(&[2]);

        let mut cursor = tree.end();
        cursor.retreat(&tree).unwrap();
        assert_eq!(cursor.key(&tree), Ok(&2));
        assert_eq!(cursor, tree.begin());

        cursor.advance(&tree).unwrap();
        assert!(cursor.is_end(&tree));
    }

    #[test]
    pub fn dereferencing_end_or_null_fails() {
        let tree = tree_of(&[1]);

        assert_eq!(tree.end().key(&tree), Err(Error::OutOfRange));
        assert_eq!(Cursor::default().key(&tree), Err(Error::OutOfRange));
        assert_eq!(Cursor::default().advance(&tree), Err(Error::OutOfRange));
        assert_eq!(Cursor::default().retreat(&tree), Err(Error::OutOfRange));
    }

    #[test]
    pub fn empty_tree_cursors_are_null() {
        let tree = tree_of(&[]);

        assert!(tree.begin().is_null());
        assert!(!tree.end().is_end(&tree));
        assert_eq!(tree.begin().value(&tree), Err(Error::OutOfRange));
    }

    #[test]
    pub fn stale_cursor_cannot_move() {
        let mut tree = tree_of(&[1, 2, 3]);
        let mut cursor = tree.find(&1);

        tree.erase(cursor).unwrap();

        assert_eq!(cursor.advance(&tree), Err(Error::InvalidCursor));
        assert_eq!(cursor.retreat(&tree), Err(Error::InvalidCursor));
        assert_eq!(format!("{:?}", Cursor::default()), "Cursor(null)");
    }

    #[test]
    pub fn entry_reads_key_and_value() {
        let tree: Redwood<&str, u32> = [("b", 2), ("a", 1)].into_iter().collect();

        let cursor = tree.begin();
        assert_eq!(cursor.entry(&tree), Ok((&"a", &1)));
        assert_eq!(cursor.value(&tree), Ok(&1));
    }
}
