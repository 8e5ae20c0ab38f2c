//! Shared test scaffolding: an integer-keyed embedding record, a
//! comparator over it, and a harness that owns the records backing a tree.

use core::cmp::Ordering;
use core::ptr::null_mut;

use thorn_ffi::{KernelPtr, KernelResult};

use crate::node::{RbDirection, RbNode, RbTreeOps};
use crate::tree::RbTree;

/// Test record embedding a tree node as its first field.
#[repr(C)]
#[derive(Debug)]
pub struct IntNode {
    pub node: RbNode,
    pub key: i32,
}

impl IntNode {
    pub fn new(key: i32) -> Self {
        Self {
            node: RbNode::new(),
            key,
        }
    }
}

/// Key of the record embedding `node`.
///
/// # Safety
/// `node` must point at the `node` field of a live `IntNode`.
pub unsafe fn key_at(node: *const RbNode) -> i32 {
    (*(node as *const IntNode)).key
}

fn compare_nodes(_context: KernelPtr, a: *const RbNode, b: *const RbNode) -> Ordering {
    unsafe { key_at(a).cmp(&key_at(b)) }
}

fn compare_key(_context: KernelPtr, node: *const RbNode, key: KernelPtr) -> Ordering {
    let key = unsafe { *(key as *const i32) };
    unsafe { key_at(node) }.cmp(&key)
}

pub fn int_ops() -> RbTreeOps {
    RbTreeOps {
        compare_nodes,
        compare_key,
        context: null_mut(),
    }
}

/// A tree plus the heap-pinned records backing its nodes.
#[derive(Debug)]
pub struct IntTree {
    pub tree: RbTree,
    records: Vec<Box<IntNode>>,
}

impl IntTree {
    pub fn new() -> Self {
        Self {
            tree: RbTree::new(int_ops()),
            records: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: i32) -> KernelResult<()> {
        let mut record = Box::new(IntNode::new(key));
        let node = &mut record.node as *mut RbNode;
        let result = unsafe { self.tree.insert_node(node) };
        if result.is_ok() {
            self.records.push(record);
        }
        result
    }

    pub fn find(&self, key: i32) -> *mut RbNode {
        unsafe { self.tree.find_node(&key as *const i32 as KernelPtr) }
    }

    pub fn find_geq(&self, key: i32) -> *mut RbNode {
        unsafe { self.tree.find_node_geq(&key as *const i32 as KernelPtr) }
    }

    pub fn find_leq(&self, key: i32) -> *mut RbNode {
        unsafe { self.tree.find_node_leq(&key as *const i32 as KernelPtr) }
    }

    pub fn remove(&mut self, key: i32) {
        let node = self.find(key);
        assert!(!node.is_null(), "removing absent key {key}");
        unsafe { self.tree.remove_node(node) };
        self.records.retain(|record| record.key != key);
    }

    pub fn in_order(&self) -> Vec<i32> {
        self.collect(RbDirection::Right)
    }

    pub fn in_order_rev(&self) -> Vec<i32> {
        self.collect(RbDirection::Left)
    }

    fn collect(&self, direction: RbDirection) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut cursor = unsafe { self.tree.iterate(null_mut(), direction) };
        while !cursor.is_null() {
            keys.push(unsafe { key_at(cursor) });
            cursor = unsafe { self.tree.iterate(cursor, direction) };
        }
        keys
    }
}
