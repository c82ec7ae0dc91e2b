//! Scalar width marker trait.
//!
//! Rather than one near-identical accessor method per scalar type, the
//! facility exposes operations generic over a width: [`Scalar`] marks the
//! plain-access widths here, and `mantle-sync` layers `AtomicScalar` /
//! `RmwScalar` on top for the widths that have atomic cells and
//! read-modify-write instructions.

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// A scalar value the facility can read and write at a raw slot.
///
/// Implemented for the fixed-width integers, `f32`/`f64`, and `usize`.
/// Sealed: the facility's safety contracts are only sound for types whose
/// every bit pattern is a valid value.
pub trait Scalar:
    sealed::Sealed + Copy + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Width of the scalar in bytes.
    const WIDTH: usize;
}

macro_rules! impl_scalar {
    ($($ty:ty => $width:expr),+ $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = $width;
        }
    )+};
}

impl_scalar! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
    usize => std::mem::size_of::<usize>(),
}
