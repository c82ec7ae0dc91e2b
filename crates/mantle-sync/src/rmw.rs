//! Read-modify-write operations on slots.
//!
//! Compare-and-swap is the facility's sole read-modify-write primitive in
//! contract terms; the fetch family has the same observable behavior as a
//! CAS retry loop and uses whatever the platform's atomic cells lower to.

use std::sync::atomic::{AtomicPtr, Ordering};

use crate::atomic::RmwScalar;

#[inline]
fn slot_ptr<W>(base: *mut u8, offset: usize) -> *mut W {
    base.wrapping_add(offset).cast::<W>()
}

/// Compare-and-swap on a slot.
///
/// If the slot holds `expected`, store `new` and return `true`; otherwise
/// leave the slot unchanged and return `false`. Acquire-release on
/// success, acquire on failure.
///
/// # Safety
///
/// `base + offset` must name a slot of width `W` inside a live allocation,
/// aligned for `W`'s atomic cell. Concurrent access is permitted only
/// through the volatile/ordered/RMW accessors.
pub unsafe fn compare_and_swap<W: RmwScalar>(
    base: *mut u8,
    offset: usize,
    expected: W,
    new: W,
) -> bool {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_compare_exchange(slot_ptr::<W>(base, offset), expected, new) }
}

/// Atomically add `delta` (wrapping) to a slot and return the prior value.
///
/// # Safety
///
/// Same contract as [`compare_and_swap`].
pub unsafe fn fetch_add<W: RmwScalar>(base: *mut u8, offset: usize, delta: W) -> W {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_fetch_add(slot_ptr::<W>(base, offset), delta) }
}

/// Atomically replace a slot's value and return the prior one.
///
/// # Safety
///
/// Same contract as [`compare_and_swap`].
pub unsafe fn fetch_set<W: RmwScalar>(base: *mut u8, offset: usize, new: W) -> W {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_swap(slot_ptr::<W>(base, offset), new) }
}

/// Compare-and-swap on a reference-width slot.
///
/// # Safety
///
/// Same contract as [`compare_and_swap`], with `W` = pointer width.
pub unsafe fn compare_and_swap_ptr(
    base: *mut u8,
    offset: usize,
    expected: *mut (),
    new: *mut (),
) -> bool {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { AtomicPtr::from_ptr(slot_ptr::<*mut ()>(base, offset)) }
        .compare_exchange(expected, new, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
}

/// Atomically replace a reference-width slot's value and return the prior
/// one.
///
/// # Safety
///
/// Same contract as [`compare_and_swap`], with `W` = pointer width.
pub unsafe fn fetch_set_ptr(base: *mut u8, offset: usize, new: *mut ()) -> *mut () {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { AtomicPtr::from_ptr(slot_ptr::<*mut ()>(base, offset)) }.swap(new, Ordering::AcqRel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot;

    #[repr(C)]
    struct Counters {
        hits: u32,
        total: u64,
        head: *mut (),
    }

    fn zeroed() -> Counters {
        Counters {
            hits: 0,
            total: 0,
            head: std::ptr::null_mut(),
        }
    }

    #[test]
    fn cas_success_and_failure() {
        let mut c = zeroed();
        let base = (&mut c as *mut Counters).cast::<u8>();
        let hits = std::mem::offset_of!(Counters, hits);
        unsafe {
            slot::store::<u32>(base, hits, 5);

            // Slot holds expected: swaps and reports true.
            assert!(compare_and_swap::<u32>(base, hits, 5, 9));
            assert_eq!(slot::load::<u32>(base, hits), 9);

            // Slot holds something else: unchanged, reports false.
            assert!(!compare_and_swap::<u32>(base, hits, 5, 77));
            assert_eq!(slot::load::<u32>(base, hits), 9);
        }
    }

    #[test]
    fn fetch_add_returns_prior_value() {
        let mut c = zeroed();
        let base = (&mut c as *mut Counters).cast::<u8>();
        let total = std::mem::offset_of!(Counters, total);
        unsafe {
            slot::store::<u64>(base, total, 100);
            let prev = fetch_add::<u64>(base, total, 11);
            assert_eq!(prev, 100);
            assert_eq!(slot::load::<u64>(base, total), 111);
        }
    }

    #[test]
    fn fetch_set_returns_prior_value() {
        let mut c = zeroed();
        let base = (&mut c as *mut Counters).cast::<u8>();
        let hits = std::mem::offset_of!(Counters, hits);
        unsafe {
            slot::store::<u32>(base, hits, 3);
            assert_eq!(fetch_set::<u32>(base, hits, 8), 3);
            assert_eq!(slot::load::<u32>(base, hits), 8);
        }
    }

    #[test]
    fn pointer_cas_and_swap() {
        let mut c = zeroed();
        let mut target = 0u8;
        let base = (&mut c as *mut Counters).cast::<u8>();
        let head = std::mem::offset_of!(Counters, head);
        let target_ptr = (&mut target as *mut u8).cast::<()>();
        unsafe {
            // Null → target succeeds.
            assert!(compare_and_swap_ptr(base, head, std::ptr::null_mut(), target_ptr));
            // Null → anything now fails: slot no longer null.
            assert!(!compare_and_swap_ptr(base, head, std::ptr::null_mut(), target_ptr));

            assert_eq!(fetch_set_ptr(base, head, std::ptr::null_mut()), target_ptr);
            assert!(slot::load_ptr(base, head).is_null());
        }
    }

    #[test]
    fn signed_fetch_add_wraps() {
        let mut slot_val: i32 = i32::MAX;
        let base = (&mut slot_val as *mut i32).cast::<u8>();
        unsafe {
            let prev = fetch_add::<i32>(base, 0, 1);
            assert_eq!(prev, i32::MAX);
            assert_eq!(slot::load::<i32>(base, 0), i32::MIN);
        }
    }
}
