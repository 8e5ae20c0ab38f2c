//! Helpers shared by the step definitions: an integer-keyed record
//! embedding a tree node, and a comparison strategy over it.

use std::cmp::Ordering;

use thorn_ffi::KernelPtr;
use thorn_rbtree::{RbNode, RbTreeOps};

/// A caller-owned record with the tree node embedded as its first field.
#[repr(C)]
#[derive(Debug)]
pub struct KeyRecord {
    pub node: RbNode,
    pub key: i64,
}

impl KeyRecord {
    pub fn new(key: i64) -> Self {
        Self {
            node: RbNode::new(),
            key,
        }
    }
}

/// Key of the record embedding `node`.
///
/// # Safety
/// `node` must point at the `node` field of a live `KeyRecord`.
pub unsafe fn key_of(node: *const RbNode) -> i64 {
    (*(node as *const KeyRecord)).key
}

fn compare_nodes(_context: KernelPtr, a: *const RbNode, b: *const RbNode) -> Ordering {
    unsafe { key_of(a).cmp(&key_of(b)) }
}

fn compare_key(_context: KernelPtr, node: *const RbNode, key: KernelPtr) -> Ordering {
    let key = unsafe { *(key as *const i64) };
    unsafe { key_of(node) }.cmp(&key)
}

/// Comparison strategy for [`KeyRecord`] trees.
pub fn record_ops() -> RbTreeOps {
    RbTreeOps {
        compare_nodes,
        compare_key,
        context: std::ptr::null_mut(),
    }
}
