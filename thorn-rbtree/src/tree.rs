//! The tree proper: insertion, lookup, removal and ordered iteration.

use core::cmp::Ordering;
use core::ptr::null_mut;

use thorn_ffi::{KernelError, KernelPtr, KernelResult};

use crate::node::{RbColor, RbDirection, RbNode, RbTreeOps, RB_DIR_LEFT, RB_DIR_RIGHT};

/// Red-Black tree root
///
/// Holds the root pointer, a cache of the leftmost and rightmost nodes,
/// and the comparison strategy. The tree performs no allocation and no
/// synchronization; callers serialize access externally and must keep any
/// lock held across a whole iteration sequence, since mutation between
/// iteration steps invalidates the walk.
#[repr(C)]
#[derive(Debug)]
pub struct RbTree {
    /// Topmost node, null when the tree is empty
    pub root: *mut RbNode,
    /// Cached extremes: `[RB_DIR_LEFT]` is the minimum, `[RB_DIR_RIGHT]`
    /// the maximum; both null when the tree is empty
    pub minmax: [*mut RbNode; 2],
    /// Comparison strategy supplied at initialization
    pub ops: RbTreeOps,
}

impl RbTree {
    /// Create a new empty tree with the given comparison strategy
    pub const fn new(ops: RbTreeOps) -> Self {
        Self {
            root: null_mut(),
            minmax: [null_mut(), null_mut()],
            ops,
        }
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Minimum node in O(1) (null when empty)
    pub fn min(&self) -> *mut RbNode {
        self.minmax[RB_DIR_LEFT]
    }

    /// Maximum node in O(1) (null when empty)
    pub fn max(&self) -> *mut RbNode {
        self.minmax[RB_DIR_RIGHT]
    }

    fn compare_nodes(&self, a: *const RbNode, b: *const RbNode) -> Ordering {
        (self.ops.compare_nodes)(self.ops.context, a, b)
    }

    fn compare_key(&self, node: *const RbNode, key: KernelPtr) -> Ordering {
        (self.ops.compare_key)(self.ops.context, node, key)
    }

    /// Insert a node into the tree
    ///
    /// The embedding record's key fields must already be populated. On
    /// success the node is linked and reachable by traversal. If a node
    /// comparing equal is already present, `EEXIST` is returned and the
    /// tree is unchanged; callers wanting multimap semantics must break
    /// ties in the comparator (e.g. by record identity).
    ///
    /// # Safety
    /// `node` must be a valid pointer that stays valid while linked, and
    /// must not currently be part of any tree.
    pub unsafe fn insert_node(&mut self, node: *mut RbNode) -> KernelResult<()> {
        let mut parent: *mut RbNode = null_mut();
        let mut position = RbDirection::Left;

        // Find insertion point
        let mut cursor = self.root;
        while !cursor.is_null() {
            parent = cursor;
            position = match self.compare_nodes(node, cursor) {
                Ordering::Less => RbDirection::Left,
                Ordering::Greater => RbDirection::Right,
                Ordering::Equal => return Err(KernelError::EEXIST),
            };
            cursor = (*cursor).rb_nodes[position as usize];
        }

        // Link as a red leaf
        (*node).rb_nodes = [null_mut(), null_mut()];
        (*node).rb_info = 0;
        (*node).set_parent(parent);
        (*node).set_position(position);
        if parent.is_null() {
            self.root = node;
            self.minmax = [node, node];
        } else {
            (*parent).rb_nodes[position as usize] = node;
            // A new extreme is always linked beneath the old one, on the
            // same side.
            if self.minmax[position as usize] == parent {
                self.minmax[position as usize] = node;
            }
        }

        self.insert_rebalance(node);
        Ok(())
    }

    /// Rebalance after insertion: clear the red-red violation walking up,
    /// then force the root black.
    unsafe fn insert_rebalance(&mut self, mut node: *mut RbNode) {
        loop {
            let parent = (*node).parent();
            if parent.is_null() || (*parent).is_black() {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let grandparent = (*parent).parent();
            let pdir = (*parent).position();
            let uncle = (*grandparent).rb_nodes[pdir.other() as usize];

            if !uncle.is_null() && (*uncle).is_red() {
                (*parent).set_color(RbColor::Black);
                (*uncle).set_color(RbColor::Black);
                (*grandparent).set_color(RbColor::Red);
                node = grandparent;
            } else {
                if (*node).position() != pdir {
                    node = parent;
                    self.rotate(node, pdir);
                }
                let parent = (*node).parent();
                let grandparent = (*parent).parent();
                (*parent).set_color(RbColor::Black);
                (*grandparent).set_color(RbColor::Red);
                self.rotate(grandparent, pdir.other());
            }
        }

        if !self.root.is_null() {
            (*self.root).set_color(RbColor::Black);
        }
    }

    /// Find the node comparing equal to `key`, or null
    ///
    /// # Safety
    /// The tree's nodes must all be valid (guaranteed by the insert/remove
    /// contracts as long as linked records stay alive and unmoved).
    pub unsafe fn find_node(&self, key: KernelPtr) -> *mut RbNode {
        let mut cursor = self.root;
        while !cursor.is_null() {
            cursor = match self.compare_key(cursor, key) {
                Ordering::Equal => return cursor,
                // cursor < key: everything left of it is smaller still
                Ordering::Less => (*cursor).rb_nodes[RB_DIR_RIGHT],
                Ordering::Greater => (*cursor).rb_nodes[RB_DIR_LEFT],
            };
        }
        null_mut()
    }

    /// Find the least node whose key is greater than or equal to `key`,
    /// or null if every node compares less
    ///
    /// # Safety
    /// As for [`find_node`](Self::find_node).
    pub unsafe fn find_node_geq(&self, key: KernelPtr) -> *mut RbNode {
        let mut best: *mut RbNode = null_mut();
        let mut cursor = self.root;
        while !cursor.is_null() {
            cursor = match self.compare_key(cursor, key) {
                Ordering::Equal => return cursor,
                Ordering::Less => (*cursor).rb_nodes[RB_DIR_RIGHT],
                Ordering::Greater => {
                    best = cursor;
                    (*cursor).rb_nodes[RB_DIR_LEFT]
                }
            };
        }
        best
    }

    /// Find the greatest node whose key is less than or equal to `key`,
    /// or null if every node compares greater
    ///
    /// # Safety
    /// As for [`find_node`](Self::find_node).
    pub unsafe fn find_node_leq(&self, key: KernelPtr) -> *mut RbNode {
        let mut best: *mut RbNode = null_mut();
        let mut cursor = self.root;
        while !cursor.is_null() {
            cursor = match self.compare_key(cursor, key) {
                Ordering::Equal => return cursor,
                Ordering::Greater => (*cursor).rb_nodes[RB_DIR_LEFT],
                Ordering::Less => {
                    best = cursor;
                    (*cursor).rb_nodes[RB_DIR_RIGHT]
                }
            };
        }
        best
    }

    /// Remove a node from the tree
    ///
    /// The node is unlinked; its link fields are undefined afterwards and
    /// the caller may immediately reuse or destroy the embedding record.
    ///
    /// # Safety
    /// `node` must be a member of this tree. Removing a non-member is
    /// undefined behavior; the contract is not checked at runtime.
    pub unsafe fn remove_node(&mut self, node: *mut RbNode) {
        // Refresh the extremum cache before the structure changes.
        if self.minmax[RB_DIR_LEFT] == node {
            self.minmax[RB_DIR_LEFT] = self.iterate(node, RbDirection::Right);
        }
        if self.minmax[RB_DIR_RIGHT] == node {
            self.minmax[RB_DIR_RIGHT] = self.iterate(node, RbDirection::Left);
        }

        if !(*node).rb_nodes[RB_DIR_LEFT].is_null()
            && !(*node).rb_nodes[RB_DIR_RIGHT].is_null()
        {
            let successor = extreme((*node).rb_nodes[RB_DIR_RIGHT], RbDirection::Left);
            self.swap_with_successor(node, successor);
        }
        self.prune_node(node);
    }

    /// Exchange the structural positions of `node` and its in-order
    /// successor: links, position flags and colors move, payloads do not.
    /// Afterwards `node` occupies the successor's old slot and has no left
    /// child.
    unsafe fn swap_with_successor(&mut self, node: *mut RbNode, successor: *mut RbNode) {
        let parent = (*node).parent();
        let position = (*node).position();
        let left = (*node).rb_nodes[RB_DIR_LEFT];
        let right = (*node).rb_nodes[RB_DIR_RIGHT];
        let node_color = (*node).color();

        let succ_parent = (*successor).parent();
        let succ_right = (*successor).rb_nodes[RB_DIR_RIGHT];
        let succ_color = (*successor).color();

        // The successor takes node's place.
        if parent.is_null() {
            self.root = successor;
        } else {
            (*parent).rb_nodes[position as usize] = successor;
        }
        (*successor).set_parent(parent);
        (*successor).set_position(position);
        (*successor).set_color(node_color);
        (*successor).rb_nodes[RB_DIR_LEFT] = left;
        (*left).set_parent(successor);

        // Node takes the successor's old place, keeping at most the
        // successor's right child.
        (*node).set_color(succ_color);
        (*node).rb_nodes[RB_DIR_LEFT] = null_mut();
        (*node).rb_nodes[RB_DIR_RIGHT] = succ_right;
        if !succ_right.is_null() {
            (*succ_right).set_parent(node);
        }

        if succ_parent == node {
            // The successor was node's right child; node slots in
            // directly beneath it.
            (*successor).rb_nodes[RB_DIR_RIGHT] = node;
            (*node).set_parent(successor);
            (*node).set_position(RbDirection::Right);
        } else {
            // The successor was the leftmost node of the right subtree.
            (*successor).rb_nodes[RB_DIR_RIGHT] = right;
            (*right).set_parent(successor);
            (*node).set_parent(succ_parent);
            (*node).set_position(RbDirection::Left);
            (*succ_parent).rb_nodes[RB_DIR_LEFT] = node;
        }
    }

    /// Unlink a node with at most one child, then restore the black-height
    /// invariant if a black node left the tree.
    unsafe fn prune_node(&mut self, node: *mut RbNode) {
        let left = (*node).rb_nodes[RB_DIR_LEFT];
        let right = (*node).rb_nodes[RB_DIR_RIGHT];
        let child = if left.is_null() { right } else { left };
        let parent = (*node).parent();
        let position = (*node).position();
        let was_black = (*node).is_black();

        if !child.is_null() {
            (*child).set_parent(parent);
            (*child).set_position(position);
        }
        if parent.is_null() {
            self.root = child;
        } else {
            (*parent).rb_nodes[position as usize] = child;
        }

        if !was_black {
            return;
        }
        if !child.is_null() && (*child).is_red() {
            // A red child absorbs the missing black.
            (*child).set_color(RbColor::Black);
        } else if !parent.is_null() {
            self.remove_rebalance(parent, position);
        }
    }

    /// Restore the black-height invariant after a black node vanished from
    /// the `direction` subtree of `parent`. The classic sibling/nephew
    /// case analysis, symmetric in `direction`.
    unsafe fn remove_rebalance(&mut self, mut parent: *mut RbNode, mut direction: RbDirection) {
        loop {
            // The deficient side is one black short, so the sibling side
            // has positive black height and the sibling exists.
            let mut sibling = (*parent).rb_nodes[direction.other() as usize];

            if (*sibling).is_red() {
                // Red sibling: rotate it up to expose a black one.
                (*sibling).set_color(RbColor::Black);
                (*parent).set_color(RbColor::Red);
                self.rotate(parent, direction);
                sibling = (*parent).rb_nodes[direction.other() as usize];
            }

            let near = (*sibling).rb_nodes[direction as usize];
            let far = (*sibling).rb_nodes[direction.other() as usize];
            let near_red = !near.is_null() && (*near).is_red();
            let far_red = !far.is_null() && (*far).is_red();

            if !near_red && !far_red {
                // Both nephews black: the sibling sheds one black and the
                // deficit moves up to the parent.
                (*sibling).set_color(RbColor::Red);
                if (*parent).is_red() {
                    (*parent).set_color(RbColor::Black);
                    return;
                }
                let grandparent = (*parent).parent();
                if grandparent.is_null() {
                    // The whole tree lost one black level uniformly.
                    return;
                }
                direction = (*parent).position();
                parent = grandparent;
                continue;
            }

            if !far_red {
                // Near nephew red: rotate it over the sibling so the red
                // lands on the far side.
                (*near).set_color(RbColor::Black);
                (*sibling).set_color(RbColor::Red);
                self.rotate(sibling, direction.other());
                sibling = (*parent).rb_nodes[direction.other() as usize];
            }

            // Far nephew red: one rotation ends the deficit.
            (*sibling).set_color((*parent).color());
            (*parent).set_color(RbColor::Black);
            let far = (*sibling).rb_nodes[direction.other() as usize];
            (*far).set_color(RbColor::Black);
            self.rotate(parent, direction);
            return;
        }
    }

    /// Return the node adjacent to `node` in the given direction, or null
    /// when the walk is exhausted. A null `node` starts the walk: the
    /// minimum for [`RbDirection::Right`] (forward), the maximum for
    /// [`RbDirection::Left`] (backward).
    ///
    /// # Safety
    /// `node` must be null or a member of this tree, and the tree must not
    /// be mutated between iteration steps.
    pub unsafe fn iterate(&self, node: *mut RbNode, direction: RbDirection) -> *mut RbNode {
        if node.is_null() {
            return self.minmax[direction.other() as usize];
        }

        let child = (*node).rb_nodes[direction as usize];
        if !child.is_null() {
            // The adjacent node is the nearest of the `direction` subtree.
            return extreme(child, direction.other());
        }

        // Climb while we are on the `direction` side of the parent.
        let mut cursor = node;
        loop {
            let parent = (*cursor).parent();
            if parent.is_null() {
                return null_mut();
            }
            if (*cursor).position() != direction {
                return parent;
            }
            cursor = parent;
        }
    }

    /// Rotate `node` down in `direction`; its child on the opposite side
    /// takes its place. Preserves the in-order sequence.
    unsafe fn rotate(&mut self, node: *mut RbNode, direction: RbDirection) {
        let other = direction.other();
        let pivot = (*node).rb_nodes[other as usize];
        let parent = (*node).parent();
        let position = (*node).position();

        // The pivot's `direction`-side subtree moves under node.
        let inner = (*pivot).rb_nodes[direction as usize];
        (*node).rb_nodes[other as usize] = inner;
        if !inner.is_null() {
            (*inner).set_parent(node);
            (*inner).set_position(other);
        }

        // The pivot takes node's slot.
        (*pivot).set_parent(parent);
        (*pivot).set_position(position);
        if parent.is_null() {
            self.root = pivot;
        } else {
            (*parent).rb_nodes[position as usize] = pivot;
        }

        // Node descends to the pivot's `direction` slot.
        (*pivot).rb_nodes[direction as usize] = node;
        (*node).set_parent(pivot);
        (*node).set_position(direction);
    }
}

/// Descend to the extreme of a subtree in the given direction.
pub(crate) unsafe fn extreme(mut node: *mut RbNode, direction: RbDirection) -> *mut RbNode {
    loop {
        let next = (*node).rb_nodes[direction as usize];
        if next.is_null() {
            return node;
        }
        node = next;
    }
}
