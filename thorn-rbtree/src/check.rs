//! Tree invariant diagnostics.
//!
//! A debugging aid for test suites and assertion builds: production code
//! must keep the invariants by construction, so nothing here runs on any
//! production path.

use core::cmp::Ordering;
use core::fmt;

use crate::node::{RbDirection, RbNode, RB_DIR_LEFT, RB_DIR_RIGHT};
use crate::tree::{extreme, RbTree};

/// A structural invariant violation found by [`check`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A child does not respect the comparator's order relative to its parent
    OrderViolation,
    /// The root node is red
    RootNotBlack,
    /// The root node still has a parent link
    BadRootLink,
    /// A red node has a red child
    RedRedViolation,
    /// Paths from the same node reach null with differing black counts
    BlackHeightMismatch,
    /// A child's parent pointer does not point back at its parent
    BadParentLink,
    /// A node's cached position flag disagrees with its actual slot
    BadPositionFlag,
    /// The cached minimum/maximum pointers are stale
    BadMinMaxCache,
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::OrderViolation => "search order violated",
            Self::RootNotBlack => "root is red",
            Self::BadRootLink => "root has a parent link",
            Self::RedRedViolation => "red node with red child",
            Self::BlackHeightMismatch => "unequal black heights",
            Self::BadParentLink => "parent pointer does not point back",
            Self::BadPositionFlag => "cached position disagrees with slot",
            Self::BadMinMaxCache => "stale minimum/maximum cache",
        };
        f.write_str(message)
    }
}

/// Verify every structural invariant of the tree
///
/// Walks the whole tree checking search order, colors, black heights,
/// parent/position consistency, the root link and the extremum cache.
/// With `verbose`, each violation is reported through the `log` facade
/// before being returned.
///
/// # Safety
/// The tree's nodes must all be valid pointers (links may be arbitrarily
/// inconsistent otherwise; that is what this function exists to detect).
pub unsafe fn check(tree: &RbTree, verbose: bool) -> Result<(), CheckError> {
    let root = tree.root;
    if root.is_null() {
        if !tree.minmax[RB_DIR_LEFT].is_null() || !tree.minmax[RB_DIR_RIGHT].is_null() {
            return Err(fail(verbose, root, CheckError::BadMinMaxCache));
        }
        return Ok(());
    }
    if !(*root).parent().is_null() {
        return Err(fail(verbose, root, CheckError::BadRootLink));
    }
    if (*root).is_red() {
        return Err(fail(verbose, root, CheckError::RootNotBlack));
    }
    check_subtree(tree, root, verbose)?;
    if tree.minmax[RB_DIR_LEFT] != extreme(root, RbDirection::Left)
        || tree.minmax[RB_DIR_RIGHT] != extreme(root, RbDirection::Right)
    {
        return Err(fail(verbose, root, CheckError::BadMinMaxCache));
    }
    Ok(())
}

/// Check one subtree and return its black height (null links count one).
unsafe fn check_subtree(
    tree: &RbTree,
    node: *mut RbNode,
    verbose: bool,
) -> Result<usize, CheckError> {
    let mut heights = [0usize; 2];
    for direction in [RbDirection::Left, RbDirection::Right] {
        let child = (*node).child(direction);
        if child.is_null() {
            heights[direction as usize] = 1;
            continue;
        }
        if (*child).parent() != node {
            return Err(fail(verbose, child, CheckError::BadParentLink));
        }
        if (*child).position() != direction {
            return Err(fail(verbose, child, CheckError::BadPositionFlag));
        }
        let expected = match direction {
            RbDirection::Left => Ordering::Less,
            RbDirection::Right => Ordering::Greater,
        };
        if (tree.ops.compare_nodes)(tree.ops.context, child, node) != expected {
            return Err(fail(verbose, child, CheckError::OrderViolation));
        }
        if (*node).is_red() && (*child).is_red() {
            return Err(fail(verbose, child, CheckError::RedRedViolation));
        }
        heights[direction as usize] = check_subtree(tree, child, verbose)?;
    }
    if heights[RB_DIR_LEFT] != heights[RB_DIR_RIGHT] {
        return Err(fail(verbose, node, CheckError::BlackHeightMismatch));
    }
    Ok(heights[RB_DIR_LEFT] + (*node).is_black() as usize)
}

fn fail(verbose: bool, node: *const RbNode, error: CheckError) -> CheckError {
    if verbose {
        log::error!("rb_tree check failed at {node:p}: {error}");
    }
    error
}

/// Minimum and maximum root-to-null path lengths, in nodes
///
/// `(0, 0)` for an empty tree. Useful for asserting the logarithmic
/// balance guarantee in tests.
///
/// # Safety
/// The tree's nodes must all be valid and consistently linked.
pub unsafe fn depths(tree: &RbTree) -> (usize, usize) {
    subtree_depths(tree.root)
}

unsafe fn subtree_depths(node: *mut RbNode) -> (usize, usize) {
    if node.is_null() {
        return (0, 0);
    }
    let (left_min, left_max) = subtree_depths((*node).left());
    let (right_min, right_max) = subtree_depths((*node).right());
    (left_min.min(right_min) + 1, left_max.max(right_max) + 1)
}
