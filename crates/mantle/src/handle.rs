//! The facility capability: acquisition and the raw-operation chokepoint.
//!
//! Every raw operation the workspace offers is a method on [`Handle`], so
//! misuse is auditable — all call sites visibly pass through one type.
//! Acquisition happens once per process behind a `OnceLock`: the platform
//! is probed on first use, and the outcome (the handle or the fatal error)
//! is what every later acquisition sees.

use std::sync::OnceLock;

use mantle_core::error::{AcquireError, AllocError, InstantiateError};
use mantle_core::{RawAddr, Scalar, TypeLayout};
use mantle_heap::{block, direct, instance, platform, stats};
use mantle_sync::{atomic, fence, park, rmw, slot};

/// The process-wide capability granting raw memory access.
///
/// Exactly one instance exists per process, immutable after acquisition
/// and safely shared by reference across all threads. Acquire it with
/// [`Handle::acquire`] (fatal on failure) or [`Handle::try_acquire`].
pub struct Handle {
    _priv: (),
}

// Compile-time assertion: the handle is shared across all threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Handle>();
};

static HANDLE: OnceLock<Result<Handle, AcquireError>> = OnceLock::new();

impl Handle {
    /// Acquire the facility handle, probing the platform on first call.
    ///
    /// Every call after the first returns the same `&'static Handle` (or
    /// the same error — acquisition is attempted once and never retried).
    pub fn try_acquire() -> Result<&'static Handle, AcquireError> {
        match HANDLE.get_or_init(Self::probe) {
            Ok(handle) => Ok(handle),
            Err(e) => Err(e.clone()),
        }
    }

    /// Acquire the facility handle, aborting startup on failure.
    ///
    /// # Panics
    ///
    /// Panics if the underlying privileged primitives are unavailable on
    /// this platform. A process that cannot acquire the handle cannot use
    /// the facility at all; there is no degraded mode.
    pub fn acquire() -> &'static Handle {
        match Self::try_acquire() {
            Ok(handle) => handle,
            Err(e) => panic!("raw memory facility unavailable: {e}"),
        }
    }

    /// One-time platform probe: pointer width, page size sanity, and an
    /// allocate/CAS/free smoke test of the primitives themselves.
    fn probe() -> Result<Handle, AcquireError> {
        let width = platform::address_size();
        if width != 4 && width != 8 {
            return Err(AcquireError::UnsupportedPointerWidth { width });
        }
        if !platform::page_size().is_power_of_two() {
            return Err(AcquireError::SelfTestFailed { check: "page size" });
        }

        let addr = block::allocate(8).map_err(|_| AcquireError::SelfTestFailed {
            check: "probe allocation",
        })?;
        // SAFETY: addr is a live 8-byte block owned by this probe, aligned
        // to 16, accessed by this thread only, freed exactly once below.
        let healthy = unsafe {
            slot::store::<u64>(addr.as_mut_ptr(), 0, 7);
            let swapped = rmw::compare_and_swap::<u64>(addr.as_mut_ptr(), 0, 7, 11);
            let observed = slot::load_volatile::<u64>(addr.as_mut_ptr(), 0);
            block::free(addr);
            swapped && observed == 11
        };
        if !healthy {
            return Err(AcquireError::SelfTestFailed {
                check: "compare-and-swap",
            });
        }
        Ok(Handle { _priv: () })
    }

    // ── Slot access ──────────────────────────────────────────────────

    /// Load a scalar from a slot with no cross-thread ordering.
    ///
    /// # Safety
    ///
    /// `base + offset` must name a readable slot of width `W` inside a
    /// live, caller-owned allocation, aligned for `W`, with no concurrent
    /// writer. The offset must come from the same type's layout as the
    /// storage behind `base`.
    pub unsafe fn load<W: Scalar>(&self, base: *mut u8, offset: usize) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::load::<W>(base, offset) }
    }

    /// Store a scalar to a slot with no cross-thread ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load`], and no concurrent reader or
    /// writer.
    pub unsafe fn store<W: Scalar>(&self, base: *mut u8, offset: usize, value: W) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store::<W>(base, offset, value) };
    }

    /// Load a scalar from a slot with acquire ordering.
    ///
    /// # Safety
    ///
    /// `base + offset` must name a slot of width `W` inside a live
    /// allocation, aligned for `W`'s atomic cell. Concurrent access is
    /// permitted only through the volatile/ordered/RMW accessors.
    pub unsafe fn load_volatile<W: atomic::AtomicScalar>(&self, base: *mut u8, offset: usize) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::load_volatile::<W>(base, offset) }
    }

    /// Store a scalar to a slot with sequentially consistent ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`].
    pub unsafe fn store_volatile<W: atomic::AtomicScalar>(
        &self,
        base: *mut u8,
        offset: usize,
        value: W,
    ) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_volatile::<W>(base, offset, value) };
    }

    /// Store a scalar to a slot with release ordering only (lazy set).
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`].
    pub unsafe fn store_ordered<W: atomic::AtomicScalar>(
        &self,
        base: *mut u8,
        offset: usize,
        value: W,
    ) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_ordered::<W>(base, offset, value) };
    }

    /// Load a raw pointer from a reference-width slot.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load`], with `W` = pointer width.
    pub unsafe fn load_ptr(&self, base: *mut u8, offset: usize) -> *mut () {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::load_ptr(base, offset) }
    }

    /// Store a raw pointer to a reference-width slot.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::store`], with `W` = pointer width.
    pub unsafe fn store_ptr(&self, base: *mut u8, offset: usize, value: *mut ()) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_ptr(base, offset, value) };
    }

    /// Load a raw pointer from a slot with acquire ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`], with `W` = pointer
    /// width.
    pub unsafe fn load_ptr_volatile(&self, base: *mut u8, offset: usize) -> *mut () {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::load_ptr_volatile(base, offset) }
    }

    /// Store a raw pointer to a slot with sequentially consistent
    /// ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`], with `W` = pointer
    /// width.
    pub unsafe fn store_ptr_volatile(&self, base: *mut u8, offset: usize, value: *mut ()) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_ptr_volatile(base, offset, value) };
    }

    /// Store a raw pointer to a slot with release ordering only.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`], with `W` = pointer
    /// width.
    pub unsafe fn store_ptr_ordered(&self, base: *mut u8, offset: usize, value: *mut ()) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_ptr_ordered(base, offset, value) };
    }

    // ── Read-modify-write ────────────────────────────────────────────

    /// Compare-and-swap on a slot: if it holds `expected`, store `new` and
    /// return `true`; otherwise leave it unchanged and return `false`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`].
    pub unsafe fn compare_and_swap<W: atomic::RmwScalar>(
        &self,
        base: *mut u8,
        offset: usize,
        expected: W,
        new: W,
    ) -> bool {
        // SAFETY: contract forwarded unchanged.
        unsafe { rmw::compare_and_swap::<W>(base, offset, expected, new) }
    }

    /// Atomically add `delta` (wrapping) to a slot and return the prior
    /// value.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`].
    pub unsafe fn fetch_add<W: atomic::RmwScalar>(
        &self,
        base: *mut u8,
        offset: usize,
        delta: W,
    ) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { rmw::fetch_add::<W>(base, offset, delta) }
    }

    /// Atomically replace a slot's value and return the prior one.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`].
    pub unsafe fn fetch_set<W: atomic::RmwScalar>(&self, base: *mut u8, offset: usize, new: W) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { rmw::fetch_set::<W>(base, offset, new) }
    }

    /// Compare-and-swap on a reference-width slot.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`], with `W` = pointer
    /// width.
    pub unsafe fn compare_and_swap_ptr(
        &self,
        base: *mut u8,
        offset: usize,
        expected: *mut (),
        new: *mut (),
    ) -> bool {
        // SAFETY: contract forwarded unchanged.
        unsafe { rmw::compare_and_swap_ptr(base, offset, expected, new) }
    }

    /// Atomically replace a reference-width slot's value and return the
    /// prior one.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`], with `W` = pointer
    /// width.
    pub unsafe fn fetch_set_ptr(&self, base: *mut u8, offset: usize, new: *mut ()) -> *mut () {
        // SAFETY: contract forwarded unchanged.
        unsafe { rmw::fetch_set_ptr(base, offset, new) }
    }

    // ── Fences ───────────────────────────────────────────────────────

    /// Acquire fence: loads before it are not reordered with loads or
    /// stores after it.
    pub fn load_fence(&self) {
        fence::load_fence();
    }

    /// Release fence: loads and stores before it are not reordered with
    /// stores after it.
    pub fn store_fence(&self) {
        fence::store_fence();
    }

    /// Sequentially consistent fence: both of the above plus the
    /// store-load barrier.
    pub fn full_fence(&self) {
        fence::full_fence();
    }

    // ── Off-heap blocks ──────────────────────────────────────────────

    /// Allocate `bytes` of uninitialized off-heap memory.
    pub fn allocate(&self, bytes: usize) -> Result<RawAddr, AllocError> {
        block::allocate(bytes)
    }

    /// Allocate `bytes` of zero-filled off-heap memory.
    pub fn allocate_zeroed(&self, bytes: usize) -> Result<RawAddr, AllocError> {
        block::allocate_zeroed(bytes)
    }

    /// Release a block previously returned by [`Handle::allocate`] or
    /// [`Handle::allocate_zeroed`].
    ///
    /// # Safety
    ///
    /// `addr` must have come from this facility's allocation and must not
    /// have been freed already; afterwards every access to the block is
    /// use-after-free.
    pub unsafe fn free(&self, addr: RawAddr) {
        // SAFETY: contract forwarded unchanged.
        unsafe { block::free(addr) };
    }

    /// Payload size in bytes of a live block.
    ///
    /// # Safety
    ///
    /// `addr` must name a live allocation from this facility.
    pub unsafe fn allocated_size(&self, addr: RawAddr) -> usize {
        // SAFETY: contract forwarded unchanged.
        unsafe { block::allocated_size(addr) }
    }

    /// Fill `bytes` bytes starting at `addr` with `value`.
    ///
    /// # Safety
    ///
    /// The region must lie entirely within a live allocation from this
    /// facility, with no unsynchronized concurrent access.
    pub unsafe fn set_memory(&self, addr: RawAddr, bytes: usize, value: u8) {
        // SAFETY: contract forwarded unchanged.
        unsafe { block::set_memory(addr, bytes, value) };
    }

    /// Copy `bytes` bytes from `src` to `dst`.
    ///
    /// # Safety
    ///
    /// Both regions must lie within live allocations and must not overlap;
    /// an overlapping copy is undefined behavior.
    pub unsafe fn copy_memory(&self, src: RawAddr, dst: RawAddr, bytes: usize) {
        // SAFETY: contract forwarded unchanged.
        unsafe { block::copy_memory(src, dst, bytes) };
    }

    /// Read a scalar at a raw address (no base/offset indirection).
    ///
    /// # Safety
    ///
    /// `addr` must lie within a live allocation with `W::WIDTH` bytes
    /// available, aligned for `W`, with no unsynchronized concurrent
    /// writer.
    pub unsafe fn read_direct<W: Scalar>(&self, addr: RawAddr) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { direct::read::<W>(addr) }
    }

    /// Write a scalar at a raw address.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::read_direct`], and no concurrent reader
    /// or writer.
    pub unsafe fn write_direct<W: Scalar>(&self, addr: RawAddr, value: W) {
        // SAFETY: contract forwarded unchanged.
        unsafe { direct::write::<W>(addr, value) };
    }

    /// Load a scalar at a raw address with acquire ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`] with the address as the
    /// base.
    pub unsafe fn read_direct_volatile<W: atomic::AtomicScalar>(&self, addr: RawAddr) -> W {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::load_volatile::<W>(addr.as_mut_ptr(), 0) }
    }

    /// Store a scalar at a raw address with sequentially consistent
    /// ordering.
    ///
    /// # Safety
    ///
    /// Same contract as [`Handle::load_volatile`] with the address as the
    /// base.
    pub unsafe fn write_direct_volatile<W: atomic::AtomicScalar>(&self, addr: RawAddr, value: W) {
        // SAFETY: contract forwarded unchanged.
        unsafe { slot::store_volatile::<W>(addr.as_mut_ptr(), 0, value) };
    }

    // ── Instantiation ────────────────────────────────────────────────

    /// Produce a zero-initialized instance of a registered type without
    /// running any construction logic.
    pub fn allocate_instance(
        &self,
        layout: &TypeLayout,
    ) -> Result<instance::RawInstance, InstantiateError> {
        instance::allocate_instance(layout)
    }

    // ── Thread parking ───────────────────────────────────────────────

    /// Park the calling thread on its thread-local parker.
    ///
    /// Returns when a permit is consumed, the deadline elapses, or a
    /// spurious wakeup occurs; re-check your condition in a loop.
    pub fn park(&self, deadline: park::ParkDeadline) {
        park::park_current(deadline);
    }

    /// Get an [`park::Unparker`] targeting the calling thread, to hand to
    /// another thread.
    pub fn unparker(&self) -> park::Unparker {
        park::current_unparker()
    }

    // ── Platform metadata ────────────────────────────────────────────

    /// Size of a native pointer in bytes.
    pub fn address_size(&self) -> usize {
        platform::address_size()
    }

    /// Size of a virtual memory page in bytes.
    pub fn page_size(&self) -> usize {
        platform::page_size()
    }

    /// Point-in-time snapshot of the off-heap allocation counters.
    pub fn heap_stats(&self) -> stats::HeapStats {
        stats::HeapStats::snapshot()
    }
}
