//! Test framework for thorn kernel components
//!
//! This crate provides testing infrastructure for validating the tree from
//! userspace. Unlike the kernel crates, it runs with std.

pub mod helpers;

#[cfg(test)]
mod tests {
    use crate::helpers::KeyRecord;

    #[test]
    fn test_record_embeds_node_first() {
        assert_eq!(core::mem::offset_of!(KeyRecord, node), 0);
    }
}
