//! Uninitialized instantiation from layout metadata.
//!
//! [`allocate_instance`] turns a registered [`TypeLayout`] into zeroed
//! storage without running any construction logic — the analog of
//! instantiating a class while bypassing its constructors. The storage is
//! owned by the returned [`RawInstance`] and freed on drop.

use mantle_core::error::InstantiateError;
use mantle_core::{RawAddr, TypeLayout};

use crate::block::{self, BLOCK_ALIGN};

/// An owned, zero-initialized off-heap instance of a registered type.
///
/// Field slots are addressed with offsets from the type's layout against
/// [`RawInstance::base`]. The backing block is freed when the instance is
/// dropped; any raw pointers derived from it die with it.
#[derive(Debug)]
#[must_use]
pub struct RawInstance {
    addr: RawAddr,
    size: usize,
    type_name: String,
}

impl RawInstance {
    /// Base pointer of the instance's storage, for slot access.
    pub fn base(&self) -> *mut u8 {
        self.addr.as_mut_ptr()
    }

    /// Address of the instance's storage.
    pub fn addr(&self) -> RawAddr {
        self.addr
    }

    /// Size of the instance's storage in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Name of the type this instance was allocated for.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the storage as a concrete Rust type.
    ///
    /// # Safety
    ///
    /// `T` must be the type whose layout produced this instance, and all-zero
    /// bytes (or whatever the caller has since written through the slot
    /// accessors) must be a valid `T`. Types carrying references, `NonNull`,
    /// or niche-constrained enums are not valid all-zero.
    pub unsafe fn as_ref<T>(&self) -> &T {
        // SAFETY: storage is live, sized and aligned for T per the contract.
        unsafe { &*self.addr.as_ptr::<T>() }
    }

    /// Mutably borrow the storage as a concrete Rust type.
    ///
    /// # Safety
    ///
    /// Same contract as [`RawInstance::as_ref`].
    pub unsafe fn as_mut<T>(&mut self) -> &mut T {
        // SAFETY: storage is live, sized and aligned for T per the contract;
        // &mut self guarantees exclusivity.
        unsafe { &mut *self.addr.as_mut_ptr::<T>() }
    }
}

impl Drop for RawInstance {
    fn drop(&mut self) {
        // SAFETY: addr came from allocate_zeroed in allocate_instance and
        // ownership guarantees it is freed exactly once, here.
        unsafe { block::free(self.addr) };
    }
}

/// Produce a zero-initialized instance of a registered type without running
/// any construction logic.
///
/// Fails with [`InstantiateError::NotInstantiable`] for opaque layouts
/// (no concrete storage description), [`InstantiateError::ZeroSized`] for
/// zero-size layouts, and [`InstantiateError::UnsupportedAlign`] when the
/// layout requires alignment beyond what block storage guarantees.
pub fn allocate_instance(layout: &TypeLayout) -> Result<RawInstance, InstantiateError> {
    let (size, align) = layout
        .storage()
        .ok_or_else(|| InstantiateError::NotInstantiable {
            type_name: layout.name().to_string(),
        })?;
    if size == 0 {
        return Err(InstantiateError::ZeroSized {
            type_name: layout.name().to_string(),
        });
    }
    if align > BLOCK_ALIGN {
        return Err(InstantiateError::UnsupportedAlign {
            type_name: layout.name().to_string(),
            align,
        });
    }
    let addr = block::allocate_zeroed(size)?;
    Ok(RawInstance {
        addr,
        size,
        type_name: layout.name().to_string(),
    })
}
