//! Error taxonomy for the raw memory access facility.
//!
//! Four recoverable-or-fatal categories get typed errors here. The fifth
//! category — invalid references, offsets, or addresses handed to a raw
//! operation — is undefined behavior by contract and is deliberately not
//! represented: it is documented per-operation in `# Safety` sections and
//! never detected at runtime.

use std::error::Error;
use std::fmt;

/// Fatal failure to acquire the privileged facility handle.
///
/// Surfaced once, at first acquisition; every later acquisition attempt
/// reports the same error. A process that cannot acquire the handle cannot
/// use the facility at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireError {
    /// The target's pointer width is not one the facility supports.
    UnsupportedPointerWidth {
        /// Pointer width in bytes reported by the platform.
        width: usize,
    },
    /// The acquisition self-test exercised a primitive and saw a wrong result.
    SelfTestFailed {
        /// Which probe check failed.
        check: &'static str,
    },
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPointerWidth { width } => {
                write!(f, "unsupported pointer width: {width} bytes")
            }
            Self::SelfTestFailed { check } => {
                write!(f, "acquisition self-test failed: {check}")
            }
        }
    }
}

impl Error for AcquireError {}

/// Errors from layout metadata queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataError {
    /// No layout registered under this type name.
    UnknownType {
        /// The unrecognised type name.
        type_name: String,
    },
    /// The type is registered but has no field with this name.
    UnknownField {
        /// The type that was queried.
        type_name: String,
        /// The unrecognised field name.
        field: String,
    },
    /// An array query was made against a non-array layout.
    NotAnArray {
        /// The type that was queried.
        type_name: String,
    },
    /// A layout with this name is already registered.
    DuplicateType {
        /// The colliding type name.
        type_name: String,
    },
    /// An array layout declared a zero element scale.
    ZeroElementScale {
        /// The offending type name.
        type_name: String,
    },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { type_name } => {
                write!(f, "unknown type: {type_name}")
            }
            Self::UnknownField { type_name, field } => {
                write!(f, "type {type_name} has no field named {field}")
            }
            Self::NotAnArray { type_name } => {
                write!(f, "type {type_name} is not an array layout")
            }
            Self::DuplicateType { type_name } => {
                write!(f, "type {type_name} is already registered")
            }
            Self::ZeroElementScale { type_name } => {
                write!(f, "array layout {type_name} has a zero element scale")
            }
        }
    }
}

impl Error for MetadataError {}

/// Errors from off-heap block allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested size cannot be allocated: zero, or beyond the
    /// allocator's `isize::MAX` ceiling once the block header is added.
    InvalidSize {
        /// Number of payload bytes requested.
        requested: usize,
    },
    /// The global allocator returned no memory.
    OutOfMemory {
        /// Number of payload bytes requested.
        requested: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { requested } => {
                write!(f, "invalid allocation size: {requested} bytes")
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory allocating {requested} bytes")
            }
        }
    }
}

impl Error for AllocError {}

/// Errors from uninitialized instantiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstantiateError {
    /// The layout has no concrete size or alignment (opaque shape).
    NotInstantiable {
        /// The type that cannot be instantiated.
        type_name: String,
    },
    /// The layout is concrete but zero-sized; there is no storage to hand out.
    ZeroSized {
        /// The zero-sized type name.
        type_name: String,
    },
    /// The layout's alignment exceeds what block storage guarantees.
    UnsupportedAlign {
        /// The over-aligned type name.
        type_name: String,
        /// The alignment the layout requires.
        align: usize,
    },
    /// Storage for the instance could not be allocated.
    Alloc(AllocError),
}

impl fmt::Display for InstantiateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstantiable { type_name } => {
                write!(f, "type {type_name} is not instantiable")
            }
            Self::ZeroSized { type_name } => {
                write!(f, "type {type_name} is zero-sized")
            }
            Self::UnsupportedAlign { type_name, align } => {
                write!(f, "type {type_name} requires unsupported alignment {align}")
            }
            Self::Alloc(e) => {
                write!(f, "instance allocation failed: {e}")
            }
        }
    }
}

impl Error for InstantiateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocError> for InstantiateError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}
