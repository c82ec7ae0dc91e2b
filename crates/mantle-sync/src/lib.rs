//! Slot access, atomics, fences, and thread parking for the Mantle
//! facility.
//!
//! Provides the (base, offset) half of the facility: scalar loads and
//! stores in plain, volatile, and ordered modes, compare-and-swap and the
//! fetch family, standalone memory fences, and single-permit thread
//! parking. Together with `mantle-heap`, this crate holds the facility's
//! unsafe core; the `mantle::Handle` chokepoint forwards to it.
//!
//! # Ordering modes
//!
//! - **Plain** accesses carry no cross-thread ordering at all.
//! - **Volatile** loads are acquire; volatile stores are sequentially
//!   consistent (they include the store-load fence).
//! - **Ordered** stores are release-only — the cheaper publication store
//!   that omits the store-load fence.
//!
//! The facility adds no ordering beyond what each operation states and
//! removes none.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod atomic;
pub mod fence;
pub mod park;
pub mod rmw;
pub mod slot;

// Public re-exports for the primary API surface.
pub use atomic::{AtomicScalar, RmwScalar};
pub use fence::{full_fence, load_fence, store_fence};
pub use park::{current_unparker, park_current, ParkDeadline, Parker, Unparker};
