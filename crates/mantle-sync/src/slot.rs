//! Scalar loads and stores at (base, offset) slots.
//!
//! A slot is named by a base pointer into caller-owned storage plus a byte
//! offset obtained from that storage's layout — the pair the rest of the
//! facility calls an object reference and field offset. The functions here
//! never validate the pair: an offset computed for a different type, a
//! dangling base, or a misaligned slot is undefined behavior by contract.
//!
//! Reference-width slots (raw pointers stored in memory) have their own
//! accessors at the bottom; they go through `AtomicPtr` for the volatile
//! and ordered forms.

use std::sync::atomic::{AtomicPtr, Ordering};

use mantle_core::Scalar;

use crate::atomic::AtomicScalar;

#[inline]
fn slot_ptr<W>(base: *mut u8, offset: usize) -> *mut W {
    // Wrapping here would need a base within WIDTH bytes of the top of the
    // address space; such a slot cannot be part of a live allocation.
    base.wrapping_add(offset).cast::<W>()
}

/// Load a scalar from a slot with no cross-thread ordering.
///
/// # Safety
///
/// `base + offset` must name a readable slot of width `W` inside a live,
/// caller-owned allocation, aligned for `W`, with no concurrent writer.
pub unsafe fn load<W: Scalar>(base: *mut u8, offset: usize) -> W {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { slot_ptr::<W>(base, offset).read() }
}

/// Store a scalar to a slot with no cross-thread ordering.
///
/// # Safety
///
/// Same contract as [`load`], and no concurrent reader or writer.
pub unsafe fn store<W: Scalar>(base: *mut u8, offset: usize, value: W) {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { slot_ptr::<W>(base, offset).write(value) };
}

/// Load a scalar from a slot with acquire ordering.
///
/// Reads that follow in program order cannot move before this load.
///
/// # Safety
///
/// `base + offset` must name a slot of width `W` inside a live allocation,
/// aligned for `W`'s atomic cell. Concurrent access is permitted only
/// through the volatile/ordered/RMW accessors.
pub unsafe fn load_volatile<W: AtomicScalar>(base: *mut u8, offset: usize) -> W {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_load(slot_ptr::<W>(base, offset), Ordering::Acquire) }
}

/// Store a scalar to a slot with sequentially consistent ordering.
///
/// Includes the store-load fence: a subsequent load on the same thread
/// cannot be satisfied before this store is visible.
///
/// # Safety
///
/// Same contract as [`load_volatile`].
pub unsafe fn store_volatile<W: AtomicScalar>(base: *mut u8, offset: usize, value: W) {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_store(slot_ptr::<W>(base, offset), value, Ordering::SeqCst) };
}

/// Store a scalar to a slot with release ordering only.
///
/// The lazy-set form: writes that precede in program order are visible to
/// an acquire load that observes this store, but there is no store-load
/// fence. Cheaper than [`store_volatile`] for producer-side publication.
///
/// # Safety
///
/// Same contract as [`load_volatile`].
pub unsafe fn store_ordered<W: AtomicScalar>(base: *mut u8, offset: usize, value: W) {
    // SAFETY: contract forwarded unchanged.
    unsafe { W::atomic_store(slot_ptr::<W>(base, offset), value, Ordering::Release) };
}

// ── Reference-width slots ────────────────────────────────────────────

/// Load a raw pointer from a slot with no cross-thread ordering.
///
/// # Safety
///
/// Same contract as [`load`], with `W` = pointer width.
pub unsafe fn load_ptr(base: *mut u8, offset: usize) -> *mut () {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { slot_ptr::<*mut ()>(base, offset).read() }
}

/// Store a raw pointer to a slot with no cross-thread ordering.
///
/// # Safety
///
/// Same contract as [`store`], with `W` = pointer width.
pub unsafe fn store_ptr(base: *mut u8, offset: usize, value: *mut ()) {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { slot_ptr::<*mut ()>(base, offset).write(value) };
}

/// Load a raw pointer from a slot with acquire ordering.
///
/// # Safety
///
/// Same contract as [`load_volatile`], with `W` = pointer width.
pub unsafe fn load_ptr_volatile(base: *mut u8, offset: usize) -> *mut () {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { AtomicPtr::from_ptr(slot_ptr::<*mut ()>(base, offset)) }.load(Ordering::Acquire)
}

/// Store a raw pointer to a slot with sequentially consistent ordering.
///
/// # Safety
///
/// Same contract as [`load_volatile`], with `W` = pointer width.
pub unsafe fn store_ptr_volatile(base: *mut u8, offset: usize, value: *mut ()) {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { AtomicPtr::from_ptr(slot_ptr::<*mut ()>(base, offset)) }
        .store(value, Ordering::SeqCst);
}

/// Store a raw pointer to a slot with release ordering only.
///
/// # Safety
///
/// Same contract as [`load_volatile`], with `W` = pointer width.
pub unsafe fn store_ptr_ordered(base: *mut u8, offset: usize, value: *mut ()) {
    // SAFETY: slot validity and alignment are the caller's contract.
    unsafe { AtomicPtr::from_ptr(slot_ptr::<*mut ()>(base, offset)) }
        .store(value, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct Record {
        tag: u8,
        level: u16,
        count: u32,
        total: u64,
        ratio: f64,
        link: *mut (),
    }

    fn zeroed_record() -> Record {
        Record {
            tag: 0,
            level: 0,
            count: 0,
            total: 0,
            ratio: 0.0,
            link: std::ptr::null_mut(),
        }
    }

    #[test]
    fn plain_round_trip_every_field() {
        let mut rec = zeroed_record();
        let base = (&mut rec as *mut Record).cast::<u8>();
        unsafe {
            store::<u8>(base, std::mem::offset_of!(Record, tag), 0x7F);
            store::<u16>(base, std::mem::offset_of!(Record, level), 513);
            store::<u32>(base, std::mem::offset_of!(Record, count), 1_000_000);
            store::<u64>(base, std::mem::offset_of!(Record, total), u64::MAX - 1);
            store::<f64>(base, std::mem::offset_of!(Record, ratio), 0.5);

            assert_eq!(load::<u8>(base, std::mem::offset_of!(Record, tag)), 0x7F);
            assert_eq!(load::<u16>(base, std::mem::offset_of!(Record, level)), 513);
            assert_eq!(load::<u32>(base, std::mem::offset_of!(Record, count)), 1_000_000);
            assert_eq!(load::<u64>(base, std::mem::offset_of!(Record, total)), u64::MAX - 1);
            assert_eq!(load::<f64>(base, std::mem::offset_of!(Record, ratio)), 0.5);
        }
        // The stores went through the raw slots, not the struct fields.
        assert_eq!(rec.count, 1_000_000);
        assert_eq!(rec.total, u64::MAX - 1);
    }

    #[test]
    fn volatile_and_ordered_round_trip() {
        let mut rec = zeroed_record();
        let base = (&mut rec as *mut Record).cast::<u8>();
        let count = std::mem::offset_of!(Record, count);
        let ratio = std::mem::offset_of!(Record, ratio);
        unsafe {
            store_volatile::<u32>(base, count, 99);
            assert_eq!(load_volatile::<u32>(base, count), 99);

            store_ordered::<u32>(base, count, 100);
            assert_eq!(load_volatile::<u32>(base, count), 100);

            store_volatile::<f64>(base, ratio, 1.25);
            assert_eq!(load_volatile::<f64>(base, ratio), 1.25);
        }
    }

    #[test]
    fn pointer_slots_round_trip() {
        let mut rec = zeroed_record();
        let mut target = 5u32;
        let base = (&mut rec as *mut Record).cast::<u8>();
        let link = std::mem::offset_of!(Record, link);
        let target_ptr = (&mut target as *mut u32).cast::<()>();
        unsafe {
            assert!(load_ptr(base, link).is_null());

            store_ptr(base, link, target_ptr);
            assert_eq!(load_ptr(base, link), target_ptr);

            store_ptr_volatile(base, link, std::ptr::null_mut());
            assert!(load_ptr_volatile(base, link).is_null());

            store_ptr_ordered(base, link, target_ptr);
            assert_eq!(load_ptr_volatile(base, link), target_ptr);
        }
    }

    #[test]
    fn array_slots_through_base_and_scale() {
        let mut values = [0u32; 8];
        let base = values.as_mut_ptr().cast::<u8>();
        let scale = std::mem::size_of::<u32>();
        unsafe {
            for k in 0..8 {
                store::<u32>(base, k * scale, (k as u32) * 10);
            }
            for k in 0..8 {
                assert_eq!(load::<u32>(base, k * scale), (k as u32) * 10);
            }
        }
        assert_eq!(values[3], 30);
    }
}
