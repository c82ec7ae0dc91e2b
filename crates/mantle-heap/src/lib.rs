//! Off-heap block management for the Mantle raw memory access facility.
//!
//! Provides the address-based half of the facility: allocate/free of
//! header-prefixed blocks, region fill and copy, plain scalar access at a
//! raw address, uninitialized instantiation, allocation accounting, and
//! platform metadata queries. Together with `mantle-sync`, this crate
//! holds the facility's unsafe core; the `mantle::Handle` chokepoint
//! forwards to it.
//!
//! # Safety boundary
//!
//! Safe functions here ([`allocate`], [`allocate_zeroed`], the stats and
//! platform queries, [`allocate_instance`]) validate their inputs and
//! return typed errors. Everything else takes a caller-supplied address
//! and is `unsafe`: an address that does not name a live allocation from
//! this facility, an out-of-bounds length, or a misaligned scalar access
//! is undefined behavior — never a detected, reportable condition. The
//! `mantle::Handle` capability is the intended call site for all of it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod block;
pub mod direct;
pub mod instance;
pub mod platform;
pub mod stats;

// Public re-exports for the primary API surface.
pub use block::{allocate, allocate_zeroed, allocated_size, copy_memory, free, set_memory};
pub use instance::{allocate_instance, RawInstance};
pub use platform::{address_size, page_size};
pub use stats::HeapStats;
