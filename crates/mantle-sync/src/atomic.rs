//! Atomic width traits over in-place memory.
//!
//! [`AtomicScalar`] extends [`Scalar`] with acquire/release/SeqCst loads
//! and stores materialized directly on a slot address via the standard
//! atomic cells' `from_ptr`. [`RmwScalar`] adds the read-modify-write
//! family for the widths that have it: 32-bit, 64-bit, and pointer-size
//! integers — matching the facility contract, which offers CAS only at
//! those widths.
//!
//! `f32`/`f64` get volatile access by routing through `AtomicU32` /
//! `AtomicU64` bit-casts, so every [`Scalar`] width has a volatile form.
//!
//! The raw trait methods are implementation plumbing for the slot
//! accessors; callers go through [`crate::slot`] and [`crate::rmw`].

use std::sync::atomic::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicU8,
    AtomicUsize, Ordering,
};

use mantle_core::Scalar;

/// A scalar width with atomic load/store support.
///
/// Sealed transitively through [`Scalar`]. Implemented for every `Scalar`
/// width; floats go through bit-casted integer atomics.
pub trait AtomicScalar: Scalar {
    /// Atomically load the value at `ptr` with the given ordering.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of this width, aligned for
    /// the width's atomic cell, and must point into a live allocation for
    /// the whole call.
    #[doc(hidden)]
    unsafe fn atomic_load(ptr: *mut Self, order: Ordering) -> Self;

    /// Atomically store `value` at `ptr` with the given ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`AtomicScalar::atomic_load`].
    #[doc(hidden)]
    unsafe fn atomic_store(ptr: *mut Self, value: Self, order: Ordering);
}

/// A scalar width with read-modify-write support.
pub trait RmwScalar: AtomicScalar {
    /// Compare-and-swap: if the slot holds `expected`, store `new` and
    /// return `true`; otherwise leave the slot unchanged and return
    /// `false`. Acquire-release on success, acquire on failure.
    ///
    /// # Safety
    ///
    /// Same contract as [`AtomicScalar::atomic_load`].
    #[doc(hidden)]
    unsafe fn atomic_compare_exchange(ptr: *mut Self, expected: Self, new: Self) -> bool;

    /// Atomically add `delta` (wrapping) and return the prior value.
    /// Acquire-release.
    ///
    /// # Safety
    ///
    /// Same contract as [`AtomicScalar::atomic_load`].
    #[doc(hidden)]
    unsafe fn atomic_fetch_add(ptr: *mut Self, delta: Self) -> Self;

    /// Atomically replace the value and return the prior one.
    /// Acquire-release.
    ///
    /// # Safety
    ///
    /// Same contract as [`AtomicScalar::atomic_load`].
    #[doc(hidden)]
    unsafe fn atomic_swap(ptr: *mut Self, new: Self) -> Self;
}

macro_rules! impl_atomic_int {
    ($($ty:ty => $cell:ty),+ $(,)?) => {$(
        impl AtomicScalar for $ty {
            unsafe fn atomic_load(ptr: *mut Self, order: Ordering) -> Self {
                // SAFETY: validity and alignment are the caller's contract.
                unsafe { <$cell>::from_ptr(ptr) }.load(order)
            }

            unsafe fn atomic_store(ptr: *mut Self, value: Self, order: Ordering) {
                // SAFETY: validity and alignment are the caller's contract.
                unsafe { <$cell>::from_ptr(ptr) }.store(value, order);
            }
        }
    )+};
}

macro_rules! impl_rmw_int {
    ($($ty:ty => $cell:ty),+ $(,)?) => {$(
        impl RmwScalar for $ty {
            unsafe fn atomic_compare_exchange(ptr: *mut Self, expected: Self, new: Self) -> bool {
                // SAFETY: validity and alignment are the caller's contract.
                unsafe { <$cell>::from_ptr(ptr) }
                    .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            }

            unsafe fn atomic_fetch_add(ptr: *mut Self, delta: Self) -> Self {
                // SAFETY: validity and alignment are the caller's contract.
                unsafe { <$cell>::from_ptr(ptr) }.fetch_add(delta, Ordering::AcqRel)
            }

            unsafe fn atomic_swap(ptr: *mut Self, new: Self) -> Self {
                // SAFETY: validity and alignment are the caller's contract.
                unsafe { <$cell>::from_ptr(ptr) }.swap(new, Ordering::AcqRel)
            }
        }
    )+};
}

impl_atomic_int! {
    u8 => AtomicU8,
    i8 => AtomicI8,
    u16 => AtomicU16,
    i16 => AtomicI16,
    u32 => AtomicU32,
    i32 => AtomicI32,
    u64 => AtomicU64,
    i64 => AtomicI64,
    usize => AtomicUsize,
}

impl_rmw_int! {
    u32 => AtomicU32,
    i32 => AtomicI32,
    u64 => AtomicU64,
    i64 => AtomicI64,
    usize => AtomicUsize,
}

impl AtomicScalar for f32 {
    unsafe fn atomic_load(ptr: *mut Self, order: Ordering) -> Self {
        // SAFETY: validity and alignment are the caller's contract; f32 and
        // u32 share size and alignment.
        f32::from_bits(unsafe { AtomicU32::from_ptr(ptr.cast()) }.load(order))
    }

    unsafe fn atomic_store(ptr: *mut Self, value: Self, order: Ordering) {
        // SAFETY: validity and alignment are the caller's contract.
        unsafe { AtomicU32::from_ptr(ptr.cast()) }.store(value.to_bits(), order);
    }
}

impl AtomicScalar for f64 {
    unsafe fn atomic_load(ptr: *mut Self, order: Ordering) -> Self {
        // SAFETY: validity and alignment are the caller's contract; f64 and
        // u64 share size and alignment.
        f64::from_bits(unsafe { AtomicU64::from_ptr(ptr.cast()) }.load(order))
    }

    unsafe fn atomic_store(ptr: *mut Self, value: Self, order: Ordering) {
        // SAFETY: validity and alignment are the caller's contract.
        unsafe { AtomicU64::from_ptr(ptr.cast()) }.store(value.to_bits(), order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_bits_round_trip() {
        let mut slot: f64 = 0.0;
        unsafe {
            f64::atomic_store(&mut slot, -2.75, Ordering::SeqCst);
            assert_eq!(f64::atomic_load(&mut slot, Ordering::SeqCst), -2.75);
        }

        let mut slot: f32 = 0.0;
        unsafe {
            f32::atomic_store(&mut slot, f32::INFINITY, Ordering::SeqCst);
            assert_eq!(f32::atomic_load(&mut slot, Ordering::SeqCst), f32::INFINITY);
        }
    }

    #[test]
    fn rmw_on_local_slot() {
        let mut slot: u64 = 10;
        unsafe {
            assert!(u64::atomic_compare_exchange(&mut slot, 10, 20));
            assert!(!u64::atomic_compare_exchange(&mut slot, 10, 30));
            assert_eq!(u64::atomic_fetch_add(&mut slot, 5), 20);
            assert_eq!(u64::atomic_swap(&mut slot, 1), 25);
            assert_eq!(slot, 1);
        }
    }
}
