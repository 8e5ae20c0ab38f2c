//! BSD kernel red-black tree implementation
//!
//! This crate provides a Rust implementation of the BSD kernel's intrusive
//! red-black tree (`rb_tree`), maintaining binary compatibility with C
//! code. Nodes are embedded by value inside caller-owned records; the tree
//! allocates and frees nothing and orders records through a caller-supplied
//! comparison strategy.
//!
//! The structure is unsynchronized by design: callers serialize access
//! externally, holding any lock across whole iteration sequences.

#![cfg_attr(not(test), no_std)]

pub mod node;
pub mod tree;

#[cfg(any(test, feature = "diagnostics"))]
pub mod check;

#[cfg(test)]
pub(crate) mod testutil;

pub use node::{
    RbColor, RbCompareKey, RbCompareNodes, RbDirection, RbNode, RbTreeOps, RB_DIR_LEFT,
    RB_DIR_RIGHT,
};
pub use tree::RbTree;
