//! FFI Type Compatibility Tests
//!
//! Verify that thorn_ffi types match their C counterparts.

use thorn_ffi::{c_int, c_uint, KernelError, KernelPtr};

#[test]
fn test_kernel_ptr_is_pointer_sized() {
    assert_eq!(
        core::mem::size_of::<KernelPtr>(),
        core::mem::size_of::<*mut libc::c_void>()
    );
    assert_eq!(
        core::mem::align_of::<KernelPtr>(),
        core::mem::align_of::<*mut libc::c_void>()
    );
}

#[test]
fn test_c_int_sizes() {
    assert_eq!(core::mem::size_of::<c_int>(), 4);
    assert_eq!(core::mem::size_of::<c_uint>(), 4);
}

#[test]
fn test_kernel_error_values() {
    // errno values are part of the ABI
    assert_eq!(KernelError::EPERM as i32, 1);
    assert_eq!(KernelError::ENOENT as i32, 2);
    assert_eq!(KernelError::EEXIST as i32, 17);
    assert_eq!(KernelError::EINVAL as i32, 22);
}

#[test]
fn test_kernel_error_size() {
    // #[repr(i32)]
    assert_eq!(core::mem::size_of::<KernelError>(), 4);
}

#[test]
fn test_errno_convention() {
    // C callers receive negated errno values
    assert_eq!(KernelError::EEXIST.to_errno(), -17);
    assert!(KernelError::EPERM.to_errno() < 0);
}
