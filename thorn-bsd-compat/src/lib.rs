//! BSD Kernel ABI Compatibility Adapter
//!
//! This crate provides the adapter/boundary layer between thorn's internal
//! Rust API and the BSD kernel's `rb_tree` C ABI. It translates between
//! the two without constraining the core's internal design.
//!
//! # Architecture
//!
//! ```text
//! BSD C Code
//!      ↓
//! BSD Compat Layer (this crate) - Translation boundary
//!      ↓
//! thorn-rbtree (pure Rust)
//! ```
//!
//! C code keeps the familiar API:
//!
//! ```c
//! #include <sys/rbtree.h>
//!
//! static const rb_tree_ops_t ops = { ... };
//! rb_tree_t tree;
//! rb_tree_init(&tree, &ops);
//! rb_tree_insert_node(&tree, &record->node);
//! ```
//!
//! The adapter routes comparisons through the C ops table and calls the
//! core's Rust API internally.

#![cfg_attr(not(test), no_std)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

pub mod rbtree;

pub use rbtree::{rb_node, rb_tree_ops_t, rb_tree_t, RB_DIR_LEFT, RB_DIR_RIGHT};
