use core::fmt::{self, Display, Write};

use crate::{
    InvariantViolation, Redwood,
    node::{NodeColor, NodeIndex},
};

type Checked<T> = core::result::Result<T, InvariantViolation>;

impl<K: Ord, V> Redwood<K, V> {
    /// Walks the whole tree and checks the red-black properties, the key order, the element count and the
    /// position of the sentinel.
    ///
    /// Meant for tests and debugging, it runs in linear time.
    pub fn validate(&self) -> Checked<()> {
        if self.root.is_nil() {
            if self.len != 0 {
                return Err(InvariantViolation::LengthMismatch {
                    reported: self.len,
                    found: 0,
                });
            }
            if !self.sentinel.is_nil() {
                return Err(InvariantViolation::MisplacedSentinel);
            }
            return Ok(());
        }

        if self.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        if !self.parent(self.root).is_nil() {
            return Err(InvariantViolation::BrokenParentLink(self.root.0));
        }

        self.black_height(self.root)?;

        let mut found = 0;
        let mut previous: Option<&K> = None;
        let mut current = self.first_node();
        while let Some((key, _)) = self.entry(current) {
            if previous.is_some_and(|previous| previous > key) {
                return Err(InvariantViolation::OutOfOrder(current.0));
            }
            previous = Some(key);
            found += 1;

            if found > self.len {
                break;
            }
            current = self.next_node(current);
        }

        if found != self.len {
            return Err(InvariantViolation::LengthMismatch {
                reported: self.len,
                found,
            });
        }

        let maximum = self.maximal(self.root);
        let sentinel = self.sentinel;
        let anchored = !sentinel.is_nil()
            && current == sentinel
            && self.node(maximum).right_child() == sentinel
            && self.parent(sentinel) == maximum
            && self.node(sentinel).left_child().is_nil()
            && self.node(sentinel).right_child().is_nil();

        if !anchored {
            return Err(InvariantViolation::MisplacedSentinel);
        }

        Ok(())
    }

    /// Number of black nodes on every path below `idx`, counting `idx` itself.
    fn black_height(&self, idx: NodeIndex) -> Checked<usize> {
        if !self.is_data(idx) {
            return Ok(0);
        }

        let node = self.node(idx);
        for child in [node.left_child(), node.right_child()] {
            if child.is_nil() {
                continue;
            }
            if self.parent(child) != idx {
                return Err(InvariantViolation::BrokenParentLink(child.0));
            }
            if self.is_red(idx) && self.is_red(child) {
                return Err(InvariantViolation::RedRedEdge(idx.0));
            }
        }

        let left = self.black_height(node.left_child())?;
        let right = self.black_height(node.right_child())?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch(idx.0));
        }

        Ok(left + usize::from(self.color(idx) == NodeColor::Black))
    }
}

impl<K: Display, V> Redwood<K, V> {
    /// Renders the tree as a Graphviz digraph, one node per key filled with its color.
    ///
    /// The sentinel is drawn as a box labelled `end`.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing into a `String` never fails.
        let _ = self.write_dot(&mut out);
        out
    }

    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph redwood {{")?;
        writeln!(out, "    node [style=filled, fontcolor=white];")?;

        let mut pending = alloc::vec::Vec::new();
        if !self.root.is_nil() {
            pending.push(self.root);
        }

        while let Some(idx) = pending.pop() {
            match self.entry(idx) {
                Some((key, _)) => {
                    let fill = match self.color(idx) {
                        NodeColor::Red => "red",
                        NodeColor::Black => "black",
                    };
                    writeln!(out, "    n{} [label=\"{}\", fillcolor={}];", idx.0, key, fill)?;
                }
                None => writeln!(out, "    n{} [label=\"end\", shape=box, fillcolor=gray];", idx.0)?,
            }

            let node = self.node(idx);
            for child in [node.left_child(), node.right_child()] {
                if !child.is_nil() {
                    writeln!(out, "    n{} -> n{};", idx.0, child.0)?;
                    pending.push(child);
                }
            }
        }

        writeln!(out, "}}")
    }
}
