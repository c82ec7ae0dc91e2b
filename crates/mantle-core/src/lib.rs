//! Core types for the Mantle raw memory access facility.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental abstractions used throughout the Mantle workspace: off-heap
//! addresses, scalar width traits, type layout metadata, and the error
//! taxonomy. It contains no `unsafe` code — the raw operations themselves
//! live in `mantle-heap` and `mantle-sync`, behind the `mantle::Handle`
//! capability.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod addr;
pub mod error;
pub mod layout;
pub mod scalar;

// Public re-exports for the primary API surface.
pub use addr::RawAddr;
pub use error::{AcquireError, AllocError, InstantiateError, MetadataError};
pub use layout::{FieldLayout, LayoutRegistry, TypeLayout, TypeShape};
pub use scalar::Scalar;
