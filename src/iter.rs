use core::iter::FusedIterator;

use alloc::vec::{self, Vec};

use crate::{
    Redwood,
    node::{NodeIndex, Payload},
};

/// In-order iterator over the entries of a [`Redwood`].
pub struct Iter<'a, K, V> {
    pub(crate) tree: &'a Redwood<K, V>,
    pub(crate) head: NodeIndex,
    pub(crate) tail: NodeIndex,
    pub(crate) remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a Redwood<K, V>) -> Self {
        Self {
            tree,
            head: tree.first_node(),
            tail: tree.last_node(),
            remaining: tree.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let entry = self.tree.entry(self.head)?;
        self.head = self.tree.next_node(self.head);
        self.remaining -= 1;

        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let entry = self.tree.entry(self.tail)?;
        self.tail = self.tree.prev_node(self.tail);
        self.remaining -= 1;

        Some(entry)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// In-order iterator handing out mutable values. Keys stay shared, since changing them would break the
/// ordering.
pub struct IterMut<'a, K, V> {
    slots: Vec<Option<(&'a K, &'a mut V)>>,
    order: vec::IntoIter<usize>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(tree: &'a mut Redwood<K, V>) -> Self {
        let order = tree.in_order_slots().into_iter();
        let slots = tree
            .storage
            .iter_mut()
            .map(|node| match &mut node.payload {
                Payload::Data(key, value) => Some((key as &K, value)),
                Payload::Sentinel | Payload::Vacant => None,
            })
            .collect();

        Self { slots, order }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.order.next()?;
        self.slots[slot].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot = self.order.next_back()?;
        self.slots[slot].take()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning in-order iterator.
pub struct IntoIter<K, V> {
    slots: Vec<Option<(K, V)>>,
    order: vec::IntoIter<usize>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(tree: Redwood<K, V>) -> Self {
        let order = tree.in_order_slots().into_iter();
        let slots = tree
            .storage
            .into_iter()
            .map(|node| match node.payload {
                Payload::Data(key, value) => Some((key, value)),
                Payload::Sentinel | Payload::Vacant => None,
            })
            .collect();

        Self { slots, order }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.order.next()?;
        self.slots[slot].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot = self.order.next_back()?;
        self.slots[slot].take()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Keys of a tree-backed container, in order.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Values of a map, in key order.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

#[cfg(test)]
mod tests {
    use crate::Redwood;

    fn sample() -> Redwood<i32, &'static str> {
        [(100, "c"), (50, "a"), (75, "b"), (150, "d")].into_iter().collect()
    }

    #[test]
    pub fn iter() {
        let tree = sample();
        let mut iter = tree.iter();

        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some((&50, &"a")));
        assert_eq!(iter.next(), Some((&75, &"b")));
        assert_eq!(iter.next(), Some((&100, &"c")));
        assert_eq!(iter.next(), Some((&150, &"d")));
        assert_eq!(iter.next(), None);
    }

    #[test]
    pub fn iter_reverse() {
        let tree = sample();
        let keys: Vec<_> = tree.iter().rev().map(|(key, _)| *key).collect();

        assert_eq!(keys, [150, 100, 75, 50]);
    }

    #[test]
    pub fn iter_from_both_ends_meets_once() {
        let tree = sample();
        let mut iter = tree.iter();

        assert_eq!(iter.next().map(|(key, _)| *key), Some(50));
        assert_eq!(iter.next_back().map(|(key, _)| *key), Some(150));
        assert_eq!(iter.next_back().map(|(key, _)| *key), Some(100));
        assert_eq!(iter.next().map(|(key, _)| *key), Some(75));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    pub fn iter_mut_updates_values() {
        let mut tree = sample();

        for (key, value) in tree.iter_mut() {
            if *key > 60 {
                *value = "big";
            }
        }

        let values: Vec<_> = tree.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, ["a", "big", "big", "big"]);
    }

    #[test]
    pub fn into_iter() {
        let mut iter = sample().into_iter();

        assert_eq!(iter.next(), Some((50, "a")));
        assert_eq!(iter.next_back(), Some((150, "d")));
        assert_eq!(iter.next(), Some((75, "b")));
        assert_eq!(iter.next(), Some((100, "c")));
        assert_eq!(iter.next(), None);
    }

    #[test]
    pub fn into_iter_for_loop_no_crash() {
        struct User {
            _name: String,
            _age: u8,
        }

        let mut tree = Redwood::new();
        tree.insert(
            "id1",
            User {
                _name: "John Doe".to_string(),
                _age: 123,
            },
        )
        .unwrap();
        tree.insert(
            "id2",
            User {
                _name: "Jane Roe".to_string(),
                _age: 24,
            },
        )
        .unwrap();

        let _ = tree.iter().next();
        for (_, _) in tree {}
    }

    #[test]
    pub fn iteration_skips_released_slots() {
        let mut tree: Redwood<i32> = (0..10).map(|key| (key, ())).collect();
        for key in [2, 5, 7] {
            tree.erase(tree.find(&key)).unwrap();
        }

        let keys: Vec<_> = tree.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, [0, 1, 3, 4, 6, 8, 9]);

        let owned: Vec<_> = tree.into_iter().map(|(key, _)| key).collect();
        assert_eq!(owned, [0, 1, 3, 4, 6, 8, 9]);
    }
}
