use crate::Redwood;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Position of a slot in the arena.
///
/// `NIL` stands for an absent link. The sentinel is a real slot and never `NIL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub(crate) const NIL: NodeIndex = NodeIndex(usize::MAX);

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self == Self::NIL
    }
}

/// What a slot currently holds.
///
/// Vacant slots are chained into the free list through their `parent` link.
#[derive(Debug, Clone)]
pub(crate) enum Payload<K, V> {
    Data(K, V),
    Sentinel,
    Vacant,
}

#[derive(Debug, Clone)]
pub(crate) struct RedwoodNode<K, V> {
    pub(crate) payload: Payload<K, V>,
    /// Bumped every time the slot is released, so cursors into a recycled slot can be told apart.
    pub(crate) generation: u32,
    pub(crate) color: NodeColor,
    pub(crate) parent: NodeIndex,
    pub(crate) left: NodeIndex,
    pub(crate) right: NodeIndex,
}

impl<K, V> RedwoodNode<K, V> {
    pub(crate) fn new_isolated(payload: Payload<K, V>) -> Self {
        Self {
            payload,
            generation: 0,
            color: NodeColor::default(),
            parent: NodeIndex::NIL,
            left: NodeIndex::NIL,
            right: NodeIndex::NIL,
        }
    }

    #[inline]
    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    #[inline]
    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }

    pub(crate) fn is_vacant(&self) -> bool {
        matches!(self.payload, Payload::Vacant)
    }
}

impl<K, V> Redwood<K, V> {
    #[inline]
    pub(crate) fn node(&self, idx: NodeIndex) -> &RedwoodNode<K, V> {
        &self.storage[idx.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut RedwoodNode<K, V> {
        &mut self.storage[idx.0]
    }

    /// Key and value stored at `idx`, or `None` for `NIL`, the sentinel and vacant slots.
    pub(crate) fn entry(&self, idx: NodeIndex) -> Option<(&K, &V)> {
        if idx.is_nil() {
            return None;
        }

        match &self.node(idx).payload {
            Payload::Data(key, value) => Some((key, value)),
            Payload::Sentinel | Payload::Vacant => None,
        }
    }

    pub(crate) fn value_mut(&mut self, idx: NodeIndex) -> Option<&mut V> {
        if idx.is_nil() {
            return None;
        }

        match &mut self.node_mut(idx).payload {
            Payload::Data(_, value) => Some(value),
            Payload::Sentinel | Payload::Vacant => None,
        }
    }

    #[inline]
    pub(crate) fn is_data(&self, idx: NodeIndex) -> bool {
        !idx.is_nil() && matches!(self.node(idx).payload, Payload::Data(..))
    }

    /// `NIL` and the sentinel both read as black.
    pub(crate) fn color(&self, idx: NodeIndex) -> NodeColor {
        if self.is_data(idx) {
            self.node(idx).color
        } else {
            NodeColor::Black
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, idx: NodeIndex) -> bool {
        self.color(idx) == NodeColor::Red
    }

    /// Recolors a data node. The sentinel and `NIL` keep their implicit black.
    pub(crate) fn paint(&mut self, idx: NodeIndex, color: NodeColor) {
        if self.is_data(idx) {
            self.node_mut(idx).color = color;
        }
    }

    #[inline]
    pub(crate) fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.node(idx).parent
    }

    pub(crate) fn is_left_child(&self, idx: NodeIndex) -> bool {
        let parent = self.parent(idx);
        !parent.is_nil() && self.node(parent).left_child() == idx
    }

    pub(crate) fn sibling(&self, idx: NodeIndex) -> NodeIndex {
        let parent = self.parent(idx);
        if parent.is_nil() {
            return NodeIndex::NIL;
        }

        let parent_node = self.node(parent);
        if parent_node.left_child() == idx {
            parent_node.right_child()
        } else {
            parent_node.left_child()
        }
    }

    /// Leftmost node of the subtree rooted at `idx`.
    pub(crate) fn minimal(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        while !self.node(current).left_child().is_nil() {
            current = self.node(current).left_child();
        }

        current
    }

    /// Rightmost data node of the subtree rooted at `idx`, stopping short of the sentinel.
    pub(crate) fn maximal(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        while self.is_data(self.node(current).right_child()) {
            current = self.node(current).right_child();
        }

        current
    }

    pub(crate) fn first_node(&self) -> NodeIndex {
        if self.root.is_nil() {
            NodeIndex::NIL
        } else {
            self.minimal(self.root)
        }
    }

    pub(crate) fn last_node(&self) -> NodeIndex {
        if self.root.is_nil() {
            NodeIndex::NIL
        } else {
            self.maximal(self.root)
        }
    }

    /// Structural in-order successor.
    ///
    /// The maximum resolves to the sentinel hanging off its right link. Returns `NIL` when climbing runs
    /// out of ancestors, which only happens when starting from the sentinel itself.
    pub(crate) fn next_node(&self, idx: NodeIndex) -> NodeIndex {
        let right = self.node(idx).right_child();
        if !right.is_nil() {
            return self.minimal(right);
        }

        let mut current = idx;
        loop {
            let parent = self.parent(current);
            if parent.is_nil() {
                return NodeIndex::NIL;
            }
            if self.node(parent).left_child() == current {
                return parent;
            }
            current = parent;
        }
    }

    /// Structural in-order predecessor. Returns `NIL` when starting from the minimum.
    pub(crate) fn prev_node(&self, idx: NodeIndex) -> NodeIndex {
        let left = self.node(idx).left_child();
        if !left.is_nil() {
            return self.maximal(left);
        }

        let mut current = idx;
        loop {
            let parent = self.parent(current);
            if parent.is_nil() {
                return NodeIndex::NIL;
            }
            if self.node(parent).right_child() == current {
                return parent;
            }
            current = parent;
        }
    }

    /// Climbs to the root, then follows right links to the end, landing on the sentinel.
    pub(crate) fn find_sentinel_from(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        while !self.parent(current).is_nil() {
            current = self.parent(current);
        }
        while !self.node(current).right_child().is_nil() {
            current = self.node(current).right_child();
        }

        current
    }

    /// Slot indices of every data node, in key order.
    pub(crate) fn in_order_slots(&self) -> alloc::vec::Vec<usize> {
        let mut slots = alloc::vec::Vec::with_capacity(self.len);
        let mut current = self.first_node();
        while self.is_data(current) {
            slots.push(current.0);
            current = self.next_node(current);
        }

        slots
    }
}
