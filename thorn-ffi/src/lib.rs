//! FFI compatibility layer for C/Rust interoperability
//!
//! This crate provides the foundational types and utilities for maintaining
//! binary compatibility with C code during the kernel migration.

#![cfg_attr(not(test), no_std)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

#[cfg(not(test))]
use core::ffi::c_void;

#[cfg(test)]
use std::ffi::c_void;

pub use libc::{c_char, c_int, c_long, c_uint, c_ulong, size_t};

/// Kernel pointer type (matches C void*)
pub type KernelPtr = *mut c_void;

/// Error codes matching kernel errno values
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KernelError {
    EPERM = 1,
    ENOENT = 2,
    EIO = 5,
    ENOMEM = 12,
    EFAULT = 14,
    EBUSY = 16,
    EEXIST = 17,
    EINVAL = 22,
}

impl KernelError {
    pub fn to_errno(self) -> c_int {
        -(self as c_int)
    }
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

/// Recover a pointer to the structure embedding `$field`.
///
/// The Rust equivalent of C's `container_of()`: given a pointer to a field
/// embedded by value inside a larger structure, produce a pointer to the
/// embedding structure.
///
/// # Safety
/// `$ptr` must point to the `$field` member of a live instance of `$ty`.
///
/// ```
/// use thorn_ffi::container_of;
///
/// #[repr(C)]
/// struct Record {
///     tag: u64,
///     inner: u32,
/// }
///
/// let rec = Record { tag: 7, inner: 42 };
/// let inner_ptr = &rec.inner as *const u32;
/// let rec_ptr = unsafe { container_of!(inner_ptr, Record, inner) };
/// assert_eq!(unsafe { (*rec_ptr).tag }, 7);
/// ```
#[macro_export]
macro_rules! container_of {
    ($ptr:expr, $ty:ty, $field:ident) => {
        ($ptr as *const u8).sub(::core::mem::offset_of!($ty, $field)) as *const $ty
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_error_errno() {
        assert_eq!(KernelError::ENOMEM.to_errno(), -12);
        assert_eq!(KernelError::EEXIST.to_errno(), -17);
        assert_eq!(KernelError::EINVAL.to_errno(), -22);
    }

    #[test]
    fn test_kernel_ptr_size() {
        assert_eq!(
            core::mem::size_of::<KernelPtr>(),
            core::mem::size_of::<usize>()
        );
    }

    #[repr(C)]
    struct Embedding {
        before: u16,
        field: u64,
        after: u8,
    }

    #[test]
    fn test_container_of_interior_field() {
        let e = Embedding {
            before: 1,
            field: 2,
            after: 3,
        };
        let field_ptr = &e.field as *const u64;
        unsafe {
            let outer = container_of!(field_ptr, Embedding, field);
            assert_eq!((*outer).before, 1);
            assert_eq!((*outer).after, 3);
        }
    }
}
