//! Header-prefixed off-heap blocks.
//!
//! Every block is allocated with a 16-byte header ahead of the payload; the
//! header records the payload size so [`free`] can reconstruct the
//! allocation [`Layout`] from the address alone, without a lock-protected
//! side table. The returned address points at the payload, which is always
//! 16-byte aligned.
//!
//! ```text
//! base                      base + HEADER_SIZE
//! │ payload size (usize) ┆… │ payload bytes …        │
//! └──────── header ────────┴──── returned RawAddr ───┘
//! ```

use std::alloc::{self, Layout};
use std::ptr;

use mantle_core::error::AllocError;
use mantle_core::RawAddr;

use crate::stats;

/// Alignment of every block payload. Covers all scalar widths and any type
/// with alignment up to 16.
pub const BLOCK_ALIGN: usize = 16;

/// Bytes reserved ahead of the payload for the size header.
const HEADER_SIZE: usize = 16;

/// Compute the backing layout for a payload of `bytes`, validating size.
fn block_layout(bytes: usize) -> Result<Layout, AllocError> {
    if bytes == 0 {
        return Err(AllocError::InvalidSize { requested: bytes });
    }
    let total = bytes
        .checked_add(HEADER_SIZE)
        .filter(|&t| t <= isize::MAX as usize)
        .ok_or(AllocError::InvalidSize { requested: bytes })?;
    Layout::from_size_align(total, BLOCK_ALIGN)
        .map_err(|_| AllocError::InvalidSize { requested: bytes })
}

fn finish_allocation(base: *mut u8, bytes: usize) -> Result<RawAddr, AllocError> {
    if base.is_null() {
        return Err(AllocError::OutOfMemory { requested: bytes });
    }
    // SAFETY: base is a live allocation of at least HEADER_SIZE bytes,
    // aligned to BLOCK_ALIGN, so the header slot is in bounds and aligned.
    unsafe { base.cast::<usize>().write(bytes) };
    stats::record_alloc(bytes);
    Ok(RawAddr::from_ptr(base).offset(HEADER_SIZE))
}

/// Allocate `bytes` of uninitialized off-heap memory.
///
/// The returned address is aligned to [`BLOCK_ALIGN`] and remains valid
/// until the matching [`free`]. The payload contents are indeterminate.
///
/// Errors with [`AllocError::InvalidSize`] for a zero-byte request or one
/// beyond the allocator's ceiling, and [`AllocError::OutOfMemory`] when the
/// global allocator returns no memory.
pub fn allocate(bytes: usize) -> Result<RawAddr, AllocError> {
    let layout = block_layout(bytes)?;
    // SAFETY: layout has non-zero size (block_layout rejects zero).
    let base = unsafe { alloc::alloc(layout) };
    finish_allocation(base, bytes)
}

/// Allocate `bytes` of zero-filled off-heap memory.
///
/// Same contract as [`allocate`], with the payload guaranteed zeroed.
pub fn allocate_zeroed(bytes: usize) -> Result<RawAddr, AllocError> {
    let layout = block_layout(bytes)?;
    // SAFETY: layout has non-zero size (block_layout rejects zero).
    let base = unsafe { alloc::alloc_zeroed(layout) };
    finish_allocation(base, bytes)
}

/// Release a block previously returned by [`allocate`] or
/// [`allocate_zeroed`].
///
/// # Safety
///
/// `addr` must have been returned by this facility's allocation functions
/// and must not have been freed already. Freeing a foreign address or
/// double-freeing is undefined behavior. After this call every read, write,
/// or atomic operation against the block is use-after-free.
pub unsafe fn free(addr: RawAddr) {
    let base = (addr.0 - HEADER_SIZE) as *mut u8;
    // SAFETY: per the caller contract, base points at the header of a live
    // block, so the size written at allocation time is readable.
    let bytes = unsafe { base.cast::<usize>().read() };
    // SAFETY: the same arithmetic produced this layout at allocation time;
    // block_layout validated it then.
    let layout = unsafe { Layout::from_size_align_unchecked(bytes + HEADER_SIZE, BLOCK_ALIGN) };
    stats::record_free(bytes);
    // SAFETY: base/layout match the original allocation exactly.
    unsafe { alloc::dealloc(base, layout) };
}

/// Payload size in bytes of a live block.
///
/// # Safety
///
/// `addr` must name a live allocation from this facility. Reading the
/// header of a freed or foreign address is undefined behavior.
pub unsafe fn allocated_size(addr: RawAddr) -> usize {
    // SAFETY: per the caller contract, the header precedes the payload.
    unsafe { ((addr.0 - HEADER_SIZE) as *const usize).read() }
}

/// Fill `bytes` bytes starting at `addr` with `value`.
///
/// # Safety
///
/// The region `[addr, addr + bytes)` must lie entirely within a live
/// allocation from this facility, and no other thread may access it
/// concurrently without synchronization.
pub unsafe fn set_memory(addr: RawAddr, bytes: usize, value: u8) {
    // SAFETY: region validity is the caller's contract.
    unsafe { ptr::write_bytes(addr.as_mut_ptr::<u8>(), value, bytes) };
}

/// Copy `bytes` bytes from `src` to `dst`.
///
/// # Safety
///
/// Both regions must lie within live allocations and must not overlap —
/// the underlying primitive gives no overlap-safe guarantee, so an
/// overlapping copy is undefined behavior, matching the facility contract.
/// Concurrent unsynchronized access to either region is likewise undefined.
pub unsafe fn copy_memory(src: RawAddr, dst: RawAddr, bytes: usize) {
    // SAFETY: region validity and non-overlap are the caller's contract.
    unsafe { ptr::copy_nonoverlapping(src.as_ptr::<u8>(), dst.as_mut_ptr::<u8>(), bytes) };
}
