//! Mantle: a raw memory access facility behind one capability handle.
//!
//! Mantle provides uniform, minimal-overhead primitives for (a) reading
//! and writing caller-owned storage by byte offset, (b) allocating,
//! freeing, and copying off-heap memory blocks addressed by integer
//! address, and (c) the atomic and ordering primitives needed to build
//! lock-free data structures — compare-and-swap, the fetch family,
//! standalone fences, and single-permit thread parking.
//!
//! The facility interprets nothing: callers are trusted to supply valid
//! storage, correctly computed offsets, and correctly sized values.
//! Metadata, instantiation, and allocation failures come back as typed
//! errors; everything else that can go wrong — a stale address, a foreign
//! offset, an overlapping copy — is undefined behavior, stated
//! per-operation in `# Safety` sections and gated behind the one unsafe
//! chokepoint, [`Handle`].
//!
//! # Quick start
//!
//! ```rust
//! use mantle::prelude::*;
//!
//! #[repr(C)]
//! struct Counter { hits: u64, misses: u64 }
//!
//! // Acquired once per process; fatal if the platform cannot support it.
//! let handle = Handle::acquire();
//!
//! // Register the type's real in-memory layout, then query offsets.
//! let mut registry = LayoutRegistry::new();
//! registry.register(mantle::struct_layout!(Counter { hits, misses })).unwrap();
//! let hits = registry.field_offset("Counter", "hits").unwrap();
//!
//! // Zero-initialized storage, no constructor run.
//! let instance = handle
//!     .allocate_instance(registry.layout("Counter").unwrap())
//!     .unwrap();
//!
//! unsafe {
//!     handle.store::<u64>(instance.base(), hits, 41);
//!     assert_eq!(handle.fetch_add::<u64>(instance.base(), hits, 1), 41);
//!     assert_eq!(handle.load_volatile::<u64>(instance.base(), hits), 42);
//! }
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mantle-core` | Addresses, width traits, layout registry, error taxonomy |
//! | [`heap`] | `mantle-heap` | Off-heap blocks, direct access, instantiation, stats, platform metadata |
//! | [`sync`] | `mantle-sync` | Slot accessors, RMW, fences, parking |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod handle;

pub use handle::Handle;

/// Core types: addresses, width traits, layout metadata, errors
/// (`mantle-core`).
pub use mantle_core as types;

/// Off-heap block management, direct-address access, instantiation,
/// accounting, and platform metadata (`mantle-heap`).
pub use mantle_heap as heap;

/// Slot accessors, read-modify-write, fences, and parking
/// (`mantle-sync`).
pub use mantle_sync as sync;

// `struct_layout!` expands to paths in `mantle_core`, so the macro is
// re-exported at the crate root the same way.
pub use mantle_core::struct_layout;

/// Common imports for typical Mantle usage.
///
/// ```rust
/// use mantle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::handle::Handle;

    // Core types
    pub use mantle_core::{LayoutRegistry, RawAddr, Scalar, TypeLayout, TypeShape};

    // Errors
    pub use mantle_core::{AcquireError, AllocError, InstantiateError, MetadataError};

    // Heap
    pub use mantle_heap::{HeapStats, RawInstance};

    // Sync
    pub use mantle_sync::{AtomicScalar, ParkDeadline, Parker, RmwScalar, Unparker};
}
