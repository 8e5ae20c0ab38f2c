//! ABI Compatibility Testing for thorn
//!
//! This crate provides testing to ensure Rust structures are
//! binary-compatible with the BSD kernel's C structures.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(dead_code)]

/// Macro to verify structure size matches expected value
#[macro_export]
macro_rules! verify_size {
    ($rust_type:ty, $expected_size:expr) => {
        const _: () = {
            const SIZE: usize = ::core::mem::size_of::<$rust_type>();
            const EXPECTED: usize = $expected_size;

            // This will fail at compile time if sizes don't match
            assert!(SIZE == EXPECTED, "Size mismatch");
        };
    };
}

/// Macro to verify type alignment
#[macro_export]
macro_rules! verify_align {
    ($type:ty, $expected_align:expr) => {
        const _: () = {
            const ALIGN: usize = ::core::mem::align_of::<$type>();
            const EXPECTED: usize = $expected_align;

            assert!(ALIGN == EXPECTED, "Alignment mismatch");
        };
    };
}

/// Macro to verify field offset matches expected value
#[macro_export]
macro_rules! verify_offset {
    ($type:ty, $field:ident, $expected_offset:expr) => {
        const _: () = {
            const OFFSET: usize = ::core::mem::offset_of!($type, $field);
            const EXPECTED: usize = $expected_offset;

            assert!(OFFSET == EXPECTED, "Offset mismatch");
        };
    };
}

#[cfg(test)]
mod tests {
    #[repr(C)]
    struct Sample {
        first: usize,
        second: usize,
    }

    verify_size!(Sample, 2 * core::mem::size_of::<usize>());
    verify_align!(Sample, core::mem::align_of::<usize>());
    verify_offset!(Sample, second, core::mem::size_of::<usize>());

    #[test]
    fn test_verify_macros_compile() {
        // The assertions above are compile-time; reaching here means they
        // all passed.
    }
}
