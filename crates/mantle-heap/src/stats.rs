//! Process-wide allocation accounting.
//!
//! Relaxed atomic counters updated on every allocate/free. Diagnostics
//! only — the counters impose no synchronization on the memory they count.

use std::sync::atomic::{AtomicU64, Ordering};

static LIVE_BLOCKS: AtomicU64 = AtomicU64::new(0);
static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static TOTAL_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static TOTAL_FREES: AtomicU64 = AtomicU64::new(0);

pub(crate) fn record_alloc(bytes: usize) {
    LIVE_BLOCKS.fetch_add(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_add(bytes as u64, Ordering::Relaxed);
    TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_free(bytes: usize) {
    LIVE_BLOCKS.fetch_sub(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_sub(bytes as u64, Ordering::Relaxed);
    TOTAL_FREES.fetch_add(1, Ordering::Relaxed);
}

/// A point-in-time snapshot of the off-heap accounting counters.
///
/// Counters cover every block allocated through this facility in this
/// process, across all threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapStats {
    /// Blocks currently allocated and not yet freed.
    pub live_blocks: u64,
    /// Payload bytes currently allocated and not yet freed.
    pub live_bytes: u64,
    /// Allocations since process start.
    pub total_allocations: u64,
    /// Frees since process start.
    pub total_frees: u64,
}

impl HeapStats {
    /// Read the current counter values.
    ///
    /// Each counter is read independently; under concurrent allocation the
    /// snapshot is approximate, not a consistent cut.
    pub fn snapshot() -> Self {
        Self {
            live_blocks: LIVE_BLOCKS.load(Ordering::Relaxed),
            live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
            total_allocations: TOTAL_ALLOCATIONS.load(Ordering::Relaxed),
            total_frees: TOTAL_FREES.load(Ordering::Relaxed),
        }
    }
}
