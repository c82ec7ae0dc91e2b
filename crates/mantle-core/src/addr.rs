//! Integer off-heap addresses.

use std::fmt;

/// An integer address identifying off-heap memory.
///
/// Addresses are produced by the facility's block allocator and remain
/// meaningful only between the allocation that produced them and the
/// corresponding free. The facility never interprets the memory an address
/// points at; it only reads and writes it at caller-supplied coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawAddr(pub usize);

impl RawAddr {
    /// The null address. Never returned by a successful allocation.
    pub const NULL: RawAddr = RawAddr(0);

    /// Whether this is the null address.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Reinterpret as a const pointer to `T`.
    ///
    /// The pointer is only dereferenceable under the allocation contract of
    /// the facility that produced this address.
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    /// Reinterpret as a mut pointer to `T`.
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    /// Capture the address of an existing pointer.
    pub fn from_ptr<T>(ptr: *const T) -> RawAddr {
        RawAddr(ptr as usize)
    }

    /// Displace this address by `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if the displacement overflows the address space. An
    /// overflowing displacement can never name a live allocation, so this
    /// is a caller bug rather than a recoverable condition.
    pub fn offset(self, bytes: usize) -> RawAddr {
        RawAddr(
            self.0
                .checked_add(bytes)
                .expect("address displacement overflows the address space"),
        )
    }
}

impl fmt::Display for RawAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<usize> for RawAddr {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<RawAddr> for usize {
    fn from(addr: RawAddr) -> usize {
        addr.0
    }
}
