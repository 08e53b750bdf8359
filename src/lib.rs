//! Red-Black Tree based ordered containers.
//!
//! [`Redwood`] is the tree engine. [`RedwoodSet`], [`RedwoodMultiset`] and [`RedwoodMap`] wrap it with
//! set, multiset and map semantics. Positions are expressed with [`Cursor`]s, which step forward and
//! backward through the keys and can walk one past the maximum to the `end()` position.
//!
//! ```
//! use redwood::RedwoodSet;
//!
//! let mut set = RedwoodSet::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     set.insert(key).unwrap();
//! }
//!
//! let mut cursor = set.end();
//! cursor.retreat(&set).unwrap();
//! assert_eq!(cursor.key(&set), Ok(&9));
//! ```

extern crate alloc;

mod cursor;
mod debug;
mod error;
mod iter;
mod map;
mod multiset;
mod node;
mod options;
mod set;

pub use cursor::{Cursor, TreeBacked};
pub use error::{Error, InvariantViolation, Result};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use map::RedwoodMap;
pub use multiset::RedwoodMultiset;
pub use options::RedwoodOptions;
pub use set::RedwoodSet;

use core::{borrow::Borrow, cmp::Ordering, fmt, mem};

use alloc::vec::Vec;
use log::{debug, trace};

use node::{NodeColor, NodeIndex, Payload, RedwoodNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertCase {
    Root,
    BlackParent,
    RedUncle,
    InnerGrandchild,
    OuterGrandchild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteCase {
    Root,
    RedSibling,
    BlackFamily,
    RedParent,
    NearNephewRed,
    FarNephewRed,
}

/// An ordered collection of key/value pairs stored in a red-black tree.
///
/// Equal keys are allowed and kept in insertion order: a new key is placed after every key it compares
/// equal to. Whether duplicates make sense is up to the wrapping container.
///
/// Nodes live in a single arena. Released slots are recycled, and every slot carries a generation counter
/// so that a [`Cursor`] into a removed node is reported as [`Error::InvalidCursor`] instead of silently
/// reading whatever was stored there afterwards.
#[derive(Clone)]
pub struct Redwood<K, V = ()> {
    storage: Vec<RedwoodNode<K, V>>,
    root: NodeIndex,
    sentinel: NodeIndex,
    free_head: NodeIndex,
    len: usize,
    max_size: usize,
}

impl<K, V> Redwood<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RedwoodOptions::default())
    }

    #[must_use]
    pub fn with_options(options: RedwoodOptions) -> Self {
        let limit = Self::addressable_limit();

        Self {
            storage: Vec::with_capacity(options.capacity()),
            root: NodeIndex::NIL,
            sentinel: NodeIndex::NIL,
            free_head: NodeIndex::NIL,
            len: 0,
            max_size: options.max_size().map_or(limit, |max_size| max_size.min(limit)),
        }
    }

    fn addressable_limit() -> usize {
        usize::MAX / mem::size_of::<RedwoodNode<K, V>>().max(1) / 2
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    /// Largest number of elements the tree accepts before [`Error::Overflow`].
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Reserves arena room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    /// Cursor to the smallest key, or the null cursor when the tree is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.cursor_or_end(self.first_node())
    }

    /// Cursor one past the largest key, or the null cursor when the tree is empty.
    #[must_use]
    pub fn end(&self) -> Cursor {
        if self.sentinel.is_nil() {
            Cursor::null()
        } else {
            self.cursor_at(self.sentinel)
        }
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry(self.first_node())
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entry(self.last_node())
    }

    /// Key and value under `cursor`.
    ///
    /// Fails with [`Error::OutOfRange`] for the null cursor and for `end()`, and with
    /// [`Error::InvalidCursor`] when the element was removed.
    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V)> {
        let node = self.resolve(cursor)?;
        self.entry(node).ok_or(Error::OutOfRange)
    }

    pub fn value_at_mut(&mut self, cursor: Cursor) -> Result<&mut V> {
        let node = self.resolve(cursor)?;
        self.value_mut(node).ok_or(Error::OutOfRange)
    }

    /// Removes the element under `cursor` and returns it.
    ///
    /// When the element has two children its in-order successor is moved into its node, so `cursor`
    /// stays valid and now reads the successor, while cursors to the successor go stale.
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> {
        let node = self.resolve(cursor).map_err(|_| Error::InvalidCursor)?;

        match self.unlink(node) {
            Some((_, entry)) => Ok(entry),
            None => {
                debug!("refusing to erase through a cursor to the end position");
                Err(Error::InvalidCursor)
            }
        }
    }

    /// Drops every element, children before their parents.
    pub fn clear(&mut self) {
        if self.root.is_nil() {
            return;
        }

        debug!("clearing tree of {} elements", self.len);

        let mut pending = alloc::vec![self.root];
        let mut visited = Vec::with_capacity(self.len + 1);
        while let Some(idx) = pending.pop() {
            visited.push(idx);

            let node = self.node(idx);
            for child in [node.left_child(), node.right_child()] {
                if !child.is_nil() {
                    pending.push(child);
                }
            }
        }

        for idx in visited.into_iter().rev() {
            drop(self.release(idx));
        }

        self.root = NodeIndex::NIL;
        self.sentinel = NodeIndex::NIL;
        self.len = 0;
    }

    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    pub(crate) fn cursor_at(&self, idx: NodeIndex) -> Cursor {
        Cursor::new(idx, self.node(idx).generation)
    }

    fn cursor_or_end(&self, idx: NodeIndex) -> Cursor {
        if idx.is_nil() {
            self.end()
        } else {
            self.cursor_at(idx)
        }
    }

    /// Maps a cursor back onto its slot, rejecting null and stale cursors.
    pub(crate) fn resolve(&self, cursor: Cursor) -> Result<NodeIndex> {
        let idx = cursor.node();
        if idx.is_nil() {
            return Err(Error::OutOfRange);
        }

        match self.storage.get(idx.0) {
            Some(node) if node.generation == cursor.generation() && !node.is_vacant() => Ok(idx),
            _ => {
                debug!("rejecting stale cursor to slot {}", idx.0);
                Err(Error::InvalidCursor)
            }
        }
    }

    fn ensure_room(&self, additional: usize) -> Result<()> {
        if self.len.saturating_add(additional) > self.max_size {
            return Err(Error::Overflow {
                max_size: self.max_size,
            });
        }

        Ok(())
    }

    fn allocate(&mut self, payload: Payload<K, V>) -> NodeIndex {
        if self.free_head.is_nil() {
            self.storage.push(RedwoodNode::new_isolated(payload));
            return NodeIndex(self.storage.len() - 1);
        }

        let idx = self.free_head;
        let node = self.node_mut(idx);
        let next_free = node.parent;

        node.payload = payload;
        node.color = NodeColor::Red;
        node.parent = NodeIndex::NIL;
        node.left = NodeIndex::NIL;
        node.right = NodeIndex::NIL;

        self.free_head = next_free;
        idx
    }

    /// Pushes the slot on the free list and hands back its key and value, if it held any.
    fn release(&mut self, idx: NodeIndex) -> Option<(K, V)> {
        let free_head = self.free_head;
        let node = self.node_mut(idx);

        let payload = mem::replace(&mut node.payload, Payload::Vacant);
        node.generation = node.generation.wrapping_add(1);
        node.color = NodeColor::Black;
        node.parent = free_head;
        node.left = NodeIndex::NIL;
        node.right = NodeIndex::NIL;

        self.free_head = idx;

        match payload {
            Payload::Data(key, value) => Some((key, value)),
            Payload::Sentinel | Payload::Vacant => None,
        }
    }

    fn swap_payloads(&mut self, a: NodeIndex, b: NodeIndex) {
        let taken = mem::replace(&mut self.node_mut(a).payload, Payload::Vacant);
        let displaced = mem::replace(&mut self.node_mut(b).payload, taken);
        self.node_mut(a).payload = displaced;
    }

    /// Removes a data node from the tree.
    ///
    /// Returns the removed entry together with the node that now holds the element following it: the
    /// node itself when the successor was moved in, otherwise the successor (possibly the sentinel), or
    /// `NIL` once the tree is empty.
    pub(crate) fn unlink(&mut self, target: NodeIndex) -> Option<(NodeIndex, (K, V))> {
        if !self.is_data(target) {
            return None;
        }

        if self.len == 1 {
            let payload = mem::replace(&mut self.node_mut(target).payload, Payload::Vacant);
            self.clear();

            return match payload {
                Payload::Data(key, value) => Some((NodeIndex::NIL, (key, value))),
                Payload::Sentinel | Payload::Vacant => None,
            };
        }

        let node = self.node(target);
        let has_two_children = !node.left_child().is_nil() && self.is_data(node.right_child());

        let (victim, follower) = if has_two_children {
            let successor = self.minimal(self.node(target).right_child());
            self.swap_payloads(target, successor);
            (successor, target)
        } else {
            (target, self.next_node(target))
        };

        self.splice_out(victim);
        self.len -= 1;

        self.release(victim).map(|entry| (follower, entry))
    }

    /// Detaches a node with at most one data child and restores the coloring.
    fn splice_out(&mut self, victim: NodeIndex) {
        let holds_sentinel = self.node(victim).right_child() == self.sentinel;
        if holds_sentinel {
            self.node_mut(victim).right = NodeIndex::NIL;
        }

        let node = self.node(victim);
        let child = if node.left_child().is_nil() {
            node.right_child()
        } else {
            node.left_child()
        };

        if self.is_red(victim) {
            self.replace_node(victim, child);
        } else if self.is_red(child) {
            self.replace_node(victim, child);
            self.paint(child, NodeColor::Black);
        } else {
            // A black leaf: rebalance while it still holds its place, then drop it.
            self.fix_black_deficit(victim);
            self.replace_node(victim, child);
        }

        if holds_sentinel {
            self.anchor_sentinel();
        }
    }

    fn anchor_sentinel(&mut self) {
        let sentinel = self.sentinel;
        let maximum = self.maximal(self.root);

        self.node_mut(maximum).right = sentinel;
        self.node_mut(sentinel).parent = maximum;
    }

    fn replace_node(&mut self, node: NodeIndex, child: NodeIndex) {
        let parent = self.parent(node);
        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }

        self.replace_child(parent, node, child);
    }

    fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) {
        if parent.is_nil() {
            self.root = new;
        } else if self.node(parent).left_child() == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    fn insert_case(&self, node: NodeIndex) -> InsertCase {
        let parent = self.parent(node);
        if parent.is_nil() {
            return InsertCase::Root;
        }
        if !self.is_red(parent) {
            return InsertCase::BlackParent;
        }
        if self.is_red(self.sibling(parent)) {
            return InsertCase::RedUncle;
        }

        if self.is_left_child(node) == self.is_left_child(parent) {
            InsertCase::OuterGrandchild
        } else {
            InsertCase::InnerGrandchild
        }
    }

    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        loop {
            let case = self.insert_case(curr_node);
            trace!("insert fixup at slot {}: {:?}", curr_node.0, case);

            match case {
                InsertCase::Root => {
                    self.paint(curr_node, NodeColor::Black);
                    return;
                }
                InsertCase::BlackParent => return,
                InsertCase::RedUncle => {
                    let parent_idx = self.parent(curr_node);
                    let grandparent_idx = self.parent(parent_idx);
                    let uncle = self.sibling(parent_idx);

                    self.paint(parent_idx, NodeColor::Black);
                    self.paint(uncle, NodeColor::Black);
                    self.paint(grandparent_idx, NodeColor::Red);

                    curr_node = grandparent_idx;
                }
                InsertCase::InnerGrandchild => {
                    let parent_idx = self.parent(curr_node);
                    if self.is_left_child(curr_node) {
                        self.rotate_right(parent_idx);
                    } else {
                        self.rotate_left(parent_idx);
                    }

                    // The old parent is now an outer grandchild under a red parent.
                    curr_node = parent_idx;
                }
                InsertCase::OuterGrandchild => {
                    let parent_idx = self.parent(curr_node);
                    let grandparent_idx = self.parent(parent_idx);

                    self.paint(parent_idx, NodeColor::Black);
                    self.paint(grandparent_idx, NodeColor::Red);

                    if self.is_left_child(curr_node) {
                        self.rotate_right(grandparent_idx);
                    } else {
                        self.rotate_left(grandparent_idx);
                    }
                    return;
                }
            }
        }
    }

    /// Near and far children of the sibling of `node`, seen from `node`'s side.
    fn nephews(&self, node: NodeIndex) -> (NodeIndex, NodeIndex) {
        let sibling = self.sibling(node);
        if sibling.is_nil() {
            return (NodeIndex::NIL, NodeIndex::NIL);
        }

        let sibling_node = self.node(sibling);
        if self.is_left_child(node) {
            (sibling_node.left_child(), sibling_node.right_child())
        } else {
            (sibling_node.right_child(), sibling_node.left_child())
        }
    }

    fn delete_case(&self, node: NodeIndex) -> DeleteCase {
        let parent = self.parent(node);
        if parent.is_nil() {
            return DeleteCase::Root;
        }
        if self.is_red(self.sibling(node)) {
            return DeleteCase::RedSibling;
        }

        let (near, far) = self.nephews(node);
        let nephews_black = !self.is_red(near) && !self.is_red(far);

        if nephews_black && !self.is_red(parent) {
            DeleteCase::BlackFamily
        } else if nephews_black {
            DeleteCase::RedParent
        } else if !self.is_red(far) {
            DeleteCase::NearNephewRed
        } else {
            DeleteCase::FarNephewRed
        }
    }

    /// Restores the black height after the path through `start` lost a black node.
    fn fix_black_deficit(&mut self, start: NodeIndex) {
        let mut node = start;

        loop {
            let case = self.delete_case(node);
            trace!("delete fixup at slot {}: {:?}", node.0, case);

            let parent = self.parent(node);
            let sibling = self.sibling(node);

            match case {
                DeleteCase::Root => return,
                DeleteCase::RedSibling => {
                    self.paint(sibling, NodeColor::Black);
                    self.paint(parent, NodeColor::Red);
                    self.rotate_toward(parent, node);
                }
                DeleteCase::BlackFamily => {
                    self.paint(sibling, NodeColor::Red);
                    node = parent;
                }
                DeleteCase::RedParent => {
                    self.paint(sibling, NodeColor::Red);
                    self.paint(parent, NodeColor::Black);
                    return;
                }
                DeleteCase::NearNephewRed => {
                    let (near, _) = self.nephews(node);

                    self.paint(sibling, NodeColor::Red);
                    self.paint(near, NodeColor::Black);

                    if self.is_left_child(node) {
                        self.rotate_right(sibling);
                    } else {
                        self.rotate_left(sibling);
                    }
                }
                DeleteCase::FarNephewRed => {
                    let (_, far) = self.nephews(node);

                    self.paint(sibling, self.color(parent));
                    self.paint(parent, NodeColor::Black);
                    self.paint(far, NodeColor::Black);
                    self.rotate_toward(parent, node);
                    return;
                }
            }
        }
    }

    /// Rotates `center` so that `node`, one of its children, moves further down.
    fn rotate_toward(&mut self, center: NodeIndex, node: NodeIndex) {
        if self.is_left_child(node) {
            self.rotate_left(center);
        } else {
            self.rotate_right(center);
        }
    }

    fn rotate_left(&mut self, center: NodeIndex) {
        let grandparent_idx = self.parent(center);
        let sibling_idx = self.node(center).right_child();
        trace!("rotating left around slot {}", center.0);

        let c_idx = self.node(sibling_idx).left_child();

        self.node_mut(center).right = c_idx;
        if !c_idx.is_nil() {
            self.node_mut(c_idx).parent = center;
        }

        self.node_mut(sibling_idx).left = center;
        self.node_mut(center).parent = sibling_idx;
        self.node_mut(sibling_idx).parent = grandparent_idx;

        self.replace_child(grandparent_idx, center, sibling_idx);
        if grandparent_idx.is_nil() {
            self.paint(sibling_idx, NodeColor::Black);
        }
    }

    fn rotate_right(&mut self, center: NodeIndex) {
        let grandparent_idx = self.parent(center);
        let sibling_idx = self.node(center).left_child();
        trace!("rotating right around slot {}", center.0);

        let c_idx = self.node(sibling_idx).right_child();

        self.node_mut(center).left = c_idx;
        if !c_idx.is_nil() {
            self.node_mut(c_idx).parent = center;
        }

        self.node_mut(sibling_idx).right = center;
        self.node_mut(center).parent = sibling_idx;
        self.node_mut(sibling_idx).parent = grandparent_idx;

        self.replace_child(grandparent_idx, center, sibling_idx);
        if grandparent_idx.is_nil() {
            self.paint(sibling_idx, NodeColor::Black);
        }
    }
}

impl<K: Ord, V> Redwood<K, V> {
    /// Inserts `key` after every key equal to it.
    ///
    /// Never merges with an existing key; containers that reject duplicates look the key up first.
    /// Fails with [`Error::Overflow`], leaving the tree untouched, once [`Redwood::max_size`] is reached.
    pub fn insert(&mut self, key: K, value: V) -> Result<Cursor> {
        self.ensure_room(1)?;

        let node = self.insert_node(key, value);
        Ok(self.cursor_at(node))
    }

    fn insert_node(&mut self, key: K, value: V) -> NodeIndex {
        if self.root.is_nil() {
            let sentinel = self.allocate(Payload::Sentinel);
            let root = self.allocate(Payload::Data(key, value));

            self.node_mut(root).color = NodeColor::Black;
            self.node_mut(root).right = sentinel;
            self.node_mut(sentinel).parent = root;

            self.root = root;
            self.sentinel = sentinel;
            self.len = 1;
            return root;
        }

        let mut current_node = self.root;
        let (parent_node, goes_right) = loop {
            let goes_right = self
                .entry(current_node)
                .is_some_and(|(node_key, _)| key >= *node_key);

            let next = if goes_right {
                self.node(current_node).right_child()
            } else {
                self.node(current_node).left_child()
            };

            if !self.is_data(next) {
                break (current_node, goes_right);
            }
            current_node = next;
        };

        let new_node_pos = self.allocate(Payload::Data(key, value));
        self.node_mut(new_node_pos).parent = parent_node;

        if goes_right {
            // The right slot is either empty or holds the sentinel, which moves under the new maximum.
            let displaced = self.node(parent_node).right_child();
            self.node_mut(parent_node).right = new_node_pos;

            if !displaced.is_nil() {
                self.node_mut(new_node_pos).right = displaced;
                self.node_mut(displaced).parent = new_node_pos;
            }
        } else {
            self.node_mut(parent_node).left = new_node_pos;
        }

        self.len += 1;
        self.fix_red_violation(new_node_pos);

        new_node_pos
    }

    /// Cursor to the first element equal to `key`, or `end()` when there is none.
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_or_end(self.find_node(key))
    }

    pub(crate) fn find_node<Q>(&self, key: &Q) -> NodeIndex
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let candidate = self.lower_bound_node(key);

        match self.entry(candidate) {
            Some((node_key, _)) if key.cmp(node_key.borrow()) == Ordering::Equal => candidate,
            _ => NodeIndex::NIL,
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current_node = self.root;

        while let Some((node_key, _)) = self.entry(current_node) {
            match key.cmp(node_key.borrow()) {
                Ordering::Less => {
                    current_node = self.node(current_node).left_child();
                }
                Ordering::Equal => {
                    return true;
                }
                Ordering::Greater => {
                    current_node = self.node(current_node).right_child();
                }
            }
        }

        false
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entry(self.find_node(key)).map(|(_, value)| value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(key);
        self.value_mut(node)
    }

    /// Number of elements equal to `key`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current_node = self.lower_bound_node(key);
        let mut count = 0;

        while let Some((node_key, _)) = self.entry(current_node) {
            if key.cmp(node_key.borrow()) != Ordering::Equal {
                break;
            }
            count += 1;
            current_node = self.next_node(current_node);
        }

        count
    }

    /// Cursor to the first element not less than `key`, or `end()`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_or_end(self.lower_bound_node(key))
    }

    /// Cursor to the first element greater than `key`, or `end()`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor_or_end(self.upper_bound_node(key))
    }

    fn lower_bound_node<Q>(&self, key: &Q) -> NodeIndex
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current_node = self.root;
        let mut candidate = NodeIndex::NIL;

        while let Some((node_key, _)) = self.entry(current_node) {
            if key.cmp(node_key.borrow()) != Ordering::Greater {
                candidate = current_node;
                current_node = self.node(current_node).left_child();
            } else {
                current_node = self.node(current_node).right_child();
            }
        }

        candidate
    }

    fn upper_bound_node<Q>(&self, key: &Q) -> NodeIndex
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current_node = self.root;
        let mut candidate = NodeIndex::NIL;

        while let Some((node_key, _)) = self.entry(current_node) {
            if key.cmp(node_key.borrow()) == Ordering::Less {
                candidate = current_node;
                current_node = self.node(current_node).left_child();
            } else {
                current_node = self.node(current_node).right_child();
            }
        }

        candidate
    }

    /// Moves into `self` every element of `other` whose key `self` does not contain yet.
    ///
    /// Elements that would be duplicates stay in `other`. Fails with [`Error::Overflow`] before moving
    /// anything if the moved elements could not all fit.
    pub fn merge_unique(&mut self, other: &mut Self) -> Result<()> {
        let incoming = other.iter().filter(|(key, _)| !self.contains(*key)).count();
        self.ensure_room(incoming)?;

        debug!("merging {} of {} elements", incoming, other.len());

        let mut current_node = other.first_node();
        while other.is_data(current_node) {
            let present = other
                .entry(current_node)
                .is_some_and(|(key, _)| self.contains(key));

            if present {
                current_node = other.next_node(current_node);
                continue;
            }

            match other.unlink(current_node) {
                Some((follower, (key, value))) => {
                    self.insert_node(key, value);
                    current_node = follower;
                }
                None => break,
            }
        }

        Ok(())
    }

    /// Moves every element of `other` into `self`, keeping duplicates.
    pub fn merge_all(&mut self, other: &mut Self) -> Result<()> {
        self.ensure_room(other.len())?;

        debug!("merging all {} elements", other.len());

        while let Some((_, (key, value))) = other.unlink(other.first_node()) {
            self.insert_node(key, value);
        }

        Ok(())
    }
}

impl<K, V> Default for Redwood<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Redwood<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Redwood<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for Redwood<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for Redwood<K, V> {
    /// # Panics
    ///
    /// Panics if the tree would grow past [`Redwood::max_size`].
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for Redwood<K, V> {
    /// # Panics
    ///
    /// Panics if the tree would grow past [`Redwood::max_size`].
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            if let Err(error) = self.insert(key, value) {
                panic!("cannot extend tree: {error}");
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Redwood<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut Redwood<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for Redwood<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
