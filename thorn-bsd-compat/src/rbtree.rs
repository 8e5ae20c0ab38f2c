//! BSD-compatible red-black tree API adapter
//!
//! Provides the `rb_tree_*` C API over `thorn-rbtree`. The C ops table is
//! stored as the core comparator context; trampoline functions fetch it
//! back and translate the signum convention to `Ordering`.

use core::cmp::Ordering;
use core::ptr::{self, null_mut};

use thorn_ffi::{c_int, c_uint, KernelPtr};
use thorn_rbtree::{RbDirection, RbNode, RbTree, RbTreeOps};

// Re-export the node type under its C name; the layout contract is
// verified in thorn-abi-test.
pub use thorn_rbtree::RbNode as rb_node;

/// Left child slot / predecessor direction
pub const RB_DIR_LEFT: c_uint = 0;
/// Right child slot / successor direction
pub const RB_DIR_RIGHT: c_uint = 1;

/// Node-to-node comparator: negative/zero/positive for `a` less than,
/// equal to, or greater than `b`
pub type rbto_compare_nodes_fn =
    unsafe extern "C" fn(context: KernelPtr, a: *const rb_node, b: *const rb_node) -> c_int;

/// Node-to-key comparator, same convention with an opaque key
pub type rbto_compare_key_fn =
    unsafe extern "C" fn(context: KernelPtr, node: *const rb_node, key: KernelPtr) -> c_int;

/// C comparison strategy table
///
/// Must outlive every tree initialized with it; both functions must
/// implement the same total order and be side-effect free.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct rb_tree_ops_t {
    pub rbto_compare_nodes: rbto_compare_nodes_fn,
    pub rbto_compare_key: rbto_compare_key_fn,
    pub rbto_context: KernelPtr,
}

/// Tree object for the C API
///
/// A transparent wrapper over the core tree whose comparator context
/// points at the caller's [`rb_tree_ops_t`].
#[repr(transparent)]
#[derive(Debug)]
pub struct rb_tree_t {
    inner: RbTree,
}

fn sign_to_ordering(value: c_int) -> Ordering {
    value.cmp(&0)
}

fn compare_nodes_shim(context: KernelPtr, a: *const RbNode, b: *const RbNode) -> Ordering {
    let ops = context as *const rb_tree_ops_t;
    let value = unsafe { ((*ops).rbto_compare_nodes)((*ops).rbto_context, a, b) };
    sign_to_ordering(value)
}

fn compare_key_shim(context: KernelPtr, node: *const RbNode, key: KernelPtr) -> Ordering {
    let ops = context as *const rb_tree_ops_t;
    let value = unsafe { ((*ops).rbto_compare_key)((*ops).rbto_context, node, key) };
    sign_to_ordering(value)
}

fn direction(value: c_uint) -> RbDirection {
    if value == RB_DIR_LEFT {
        RbDirection::Left
    } else {
        RbDirection::Right
    }
}

/// Initialize a tree with the given ops table
///
/// # Safety
/// `rbt` must point to writable storage for an `rb_tree_t`; `ops` must be
/// valid for the tree's whole lifetime.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_init(rbt: *mut rb_tree_t, ops: *const rb_tree_ops_t) {
    ptr::write(
        rbt,
        rb_tree_t {
            inner: RbTree::new(RbTreeOps {
                compare_nodes: compare_nodes_shim,
                compare_key: compare_key_shim,
                context: ops as KernelPtr,
            }),
        },
    );
}

/// Insert a node, returning `node` on success or the already-present node
/// comparing equal (in which case the tree is unchanged)
///
/// # Safety
/// `rbt` must be an initialized tree; `node` must be valid and not
/// currently in any tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_insert_node(
    rbt: *mut rb_tree_t,
    node: *mut rb_node,
) -> *mut rb_node {
    match (*rbt).inner.insert_node(node) {
        Ok(()) => node,
        Err(_) => find_equal(&(*rbt).inner, node),
    }
}

/// Locate the member comparing equal to `node`. Only called after insert
/// reported a collision, so the descent always terminates at a member.
unsafe fn find_equal(tree: &RbTree, node: *const RbNode) -> *mut RbNode {
    let mut cursor = tree.root;
    while !cursor.is_null() {
        cursor = match (tree.ops.compare_nodes)(tree.ops.context, node, cursor) {
            Ordering::Equal => return cursor,
            Ordering::Less => (*cursor).left(),
            Ordering::Greater => (*cursor).right(),
        };
    }
    null_mut()
}

/// Find the node comparing equal to `key`, or NULL
///
/// # Safety
/// `rbt` must be an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_find_node(rbt: *mut rb_tree_t, key: KernelPtr) -> *mut rb_node {
    (*rbt).inner.find_node(key)
}

/// Find the least node greater than or equal to `key`, or NULL
///
/// # Safety
/// `rbt` must be an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_find_node_geq(
    rbt: *mut rb_tree_t,
    key: KernelPtr,
) -> *mut rb_node {
    (*rbt).inner.find_node_geq(key)
}

/// Find the greatest node less than or equal to `key`, or NULL
///
/// # Safety
/// `rbt` must be an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_find_node_leq(
    rbt: *mut rb_tree_t,
    key: KernelPtr,
) -> *mut rb_node {
    (*rbt).inner.find_node_leq(key)
}

/// Remove a node from the tree
///
/// # Safety
/// `rbt` must be an initialized tree and `node` one of its members.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_remove_node(rbt: *mut rb_tree_t, node: *mut rb_node) {
    (*rbt).inner.remove_node(node);
}

/// Return the node adjacent to `node` in `dir`, or NULL when exhausted;
/// a NULL `node` starts the walk (minimum for `RB_DIR_RIGHT`, maximum for
/// `RB_DIR_LEFT`)
///
/// # Safety
/// `rbt` must be an initialized tree; `node` NULL or one of its members.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_iterate(
    rbt: *mut rb_tree_t,
    node: *mut rb_node,
    dir: c_uint,
) -> *mut rb_node {
    (*rbt).inner.iterate(node, direction(dir))
}

/// Minimum node, or NULL when the tree is empty
///
/// # Safety
/// `rbt` must be an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_min(rbt: *mut rb_tree_t) -> *mut rb_node {
    (*rbt).inner.min()
}

/// Maximum node, or NULL when the tree is empty
///
/// # Safety
/// `rbt` must be an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_max(rbt: *mut rb_tree_t) -> *mut rb_node {
    (*rbt).inner.max()
}

/// Check if tree is empty
///
/// # Safety
/// `rbt` must be NULL or an initialized tree.
#[no_mangle]
pub unsafe extern "C" fn rb_tree_empty(rbt: *const rb_tree_t) -> bool {
    if rbt.is_null() {
        return true;
    }
    (*rbt).inner.is_empty()
}
