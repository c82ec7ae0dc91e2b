//! Plain scalar access at a raw address.
//!
//! The direct-address counterpart of `mantle-sync`'s slot accessors, for
//! off-heap buffers where there is no object base to offset from. Plain
//! accesses carry no cross-thread ordering; volatile and atomic forms are
//! reached through the slot accessors with the address as the base.

use mantle_core::{RawAddr, Scalar};

/// Read a scalar of width `W` at `addr`.
///
/// # Safety
///
/// `addr` must lie within a live allocation with at least `W::WIDTH` bytes
/// available, must be aligned for `W`, and no other thread may be writing
/// the location concurrently without synchronization.
pub unsafe fn read<W: Scalar>(addr: RawAddr) -> W {
    // SAFETY: validity and alignment are the caller's contract.
    unsafe { addr.as_ptr::<W>().read() }
}

/// Write a scalar of width `W` at `addr`.
///
/// # Safety
///
/// Same contract as [`read`], and no other thread may access the location
/// concurrently without synchronization.
pub unsafe fn write<W: Scalar>(addr: RawAddr, value: W) {
    // SAFETY: validity and alignment are the caller's contract.
    unsafe { addr.as_mut_ptr::<W>().write(value) };
}
