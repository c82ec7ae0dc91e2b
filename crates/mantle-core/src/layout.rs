//! Type layout metadata and the layout registry.
//!
//! Instead of interrogating a managed runtime reflectively, callers
//! register each type's layout explicitly (typically via [`struct_layout!`]
//! and `core::mem::offset_of!`) and query offsets by name. Queries are pure
//! and deterministic for a given registration sequence.
//!
//! Offsets obtained from a layout are only meaningful against instances of
//! that same type; reusing them across types is part of the facility's
//! undefined-behavior class, not something the registry can police.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::MetadataError;

/// Name and byte offset of one field within a struct layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field name, unique within its type.
    pub name: String,
    /// Byte displacement from the start of the object's storage.
    pub offset: usize,
}

/// The shape of a registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeShape {
    /// A concrete struct with named fields at fixed offsets.
    Struct {
        /// Field table, in registration order.
        fields: SmallVec<[FieldLayout; 8]>,
    },
    /// An array: elements of a fixed stride starting at a base offset.
    Array {
        /// Offset from the start of the storage to element zero.
        base_offset: usize,
        /// Size of each element in bytes. Always positive once registered.
        element_scale: usize,
    },
    /// A type with no concrete storage description — the analog of an
    /// abstract class or interface. Not instantiable.
    Opaque,
}

/// Layout metadata for one registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeLayout {
    name: String,
    size: Option<usize>,
    align: Option<usize>,
    shape: TypeShape,
}

impl TypeLayout {
    /// Describe a concrete struct with the given size and alignment.
    ///
    /// Fields are attached with [`TypeLayout::with_field`]; the
    /// [`struct_layout!`] macro does both in one step from a Rust type.
    pub fn structure(name: impl Into<String>, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            align: Some(align),
            shape: TypeShape::Struct {
                fields: SmallVec::new(),
            },
        }
    }

    /// Describe an array layout: elements of `element_scale` bytes starting
    /// `base_offset` bytes into the storage.
    ///
    /// Arrays have no fixed total size (length is the caller's business),
    /// so they are not instantiable through the facility.
    pub fn array(name: impl Into<String>, base_offset: usize, element_scale: usize) -> Self {
        Self {
            name: name.into(),
            size: None,
            align: None,
            shape: TypeShape::Array {
                base_offset,
                element_scale,
            },
        }
    }

    /// Describe an opaque type: known by name, with no storage description.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            align: None,
            shape: TypeShape::Opaque,
        }
    }

    /// Append a field to a struct layout (builder style).
    ///
    /// Has no effect on array or opaque shapes.
    pub fn with_field(mut self, name: impl Into<String>, offset: usize) -> Self {
        if let TypeShape::Struct { fields } = &mut self.shape {
            fields.push(FieldLayout {
                name: name.into(),
                offset,
            });
        }
        self
    }

    /// The type name this layout is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape of this layout.
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Concrete `(size, align)` if this layout describes instantiable
    /// storage, `None` for arrays and opaque types.
    pub fn storage(&self) -> Option<(usize, usize)> {
        match (self.size, self.align) {
            (Some(size), Some(align)) => Some((size, align)),
            _ => None,
        }
    }
}

/// Builds a [`TypeLayout`] for a Rust struct from its real in-memory layout.
///
/// Size, alignment, and field offsets come from `size_of` / `align_of` /
/// `offset_of!`, so the registered metadata is exact for this build.
///
/// ```
/// use mantle_core::{struct_layout, LayoutRegistry};
///
/// #[repr(C)]
/// struct Pair { first: u32, second: u32 }
///
/// let mut registry = LayoutRegistry::new();
/// registry.register(struct_layout!(Pair { first, second })).unwrap();
/// assert_eq!(registry.field_offset("Pair", "second").unwrap(), 4);
/// ```
#[macro_export]
macro_rules! struct_layout {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        $crate::layout::TypeLayout::structure(
            ::core::stringify!($ty),
            ::core::mem::size_of::<$ty>(),
            ::core::mem::align_of::<$ty>(),
        )
        $(.with_field(
            ::core::stringify!($field),
            ::core::mem::offset_of!($ty, $field),
        ))+
    };
}

/// Registry of type layouts, queried by name.
///
/// Uses `IndexMap` (not `HashMap`) so iteration and diagnostics follow
/// registration order deterministically.
#[derive(Clone, Debug, Default)]
pub struct LayoutRegistry {
    types: IndexMap<String, TypeLayout>,
}

impl LayoutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a type layout.
    ///
    /// Rejects duplicate names and array layouts with a zero element scale
    /// (a zero stride can never address distinct elements).
    pub fn register(&mut self, layout: TypeLayout) -> Result<(), MetadataError> {
        if let TypeShape::Array { element_scale, .. } = layout.shape {
            if element_scale == 0 {
                return Err(MetadataError::ZeroElementScale {
                    type_name: layout.name.clone(),
                });
            }
        }
        if self.types.contains_key(&layout.name) {
            return Err(MetadataError::DuplicateType {
                type_name: layout.name,
            });
        }
        self.types.insert(layout.name.clone(), layout);
        Ok(())
    }

    /// Look up a registered layout.
    pub fn layout(&self, type_name: &str) -> Result<&TypeLayout, MetadataError> {
        self.types
            .get(type_name)
            .ok_or_else(|| MetadataError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    /// Byte offset of `field` within `type_name`'s storage.
    pub fn field_offset(&self, type_name: &str, field: &str) -> Result<usize, MetadataError> {
        let layout = self.layout(type_name)?;
        let fields = match &layout.shape {
            TypeShape::Struct { fields } => fields,
            _ => {
                return Err(MetadataError::UnknownField {
                    type_name: type_name.to_string(),
                    field: field.to_string(),
                })
            }
        };
        fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.offset)
            .ok_or_else(|| MetadataError::UnknownField {
                type_name: type_name.to_string(),
                field: field.to_string(),
            })
    }

    /// Offset from the start of an array's storage to element zero.
    pub fn array_base_offset(&self, type_name: &str) -> Result<usize, MetadataError> {
        match self.layout(type_name)?.shape {
            TypeShape::Array { base_offset, .. } => Ok(base_offset),
            _ => Err(MetadataError::NotAnArray {
                type_name: type_name.to_string(),
            }),
        }
    }

    /// Size in bytes of each element of an array layout. Always positive.
    pub fn array_element_scale(&self, type_name: &str) -> Result<usize, MetadataError> {
        match self.layout(type_name)?.shape {
            TypeShape::Array { element_scale, .. } => Ok(element_scale),
            _ => Err(MetadataError::NotAnArray {
                type_name: type_name.to_string(),
            }),
        }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every registered field offset reads back exactly, and a name
        /// outside the registered set stays a typed error.
        #[test]
        fn registered_offsets_read_back(offsets in proptest::collection::vec(0usize..4096, 1..16)) {
            let mut layout = TypeLayout::structure("T", 4096, 8);
            for (i, off) in offsets.iter().enumerate() {
                layout = layout.with_field(format!("f{i}"), *off);
            }
            let mut registry = LayoutRegistry::new();
            registry.register(layout).unwrap();

            for (i, off) in offsets.iter().enumerate() {
                prop_assert_eq!(registry.field_offset("T", &format!("f{i}")).unwrap(), *off);
            }
            prop_assert!(registry.field_offset("T", "not_a_field").is_err());
        }

        /// Array queries return exactly what was registered for any
        /// positive scale.
        #[test]
        fn array_queries_read_back(base in 0usize..1024, scale in 1usize..512) {
            let mut registry = LayoutRegistry::new();
            registry.register(TypeLayout::array("A", base, scale)).unwrap();
            prop_assert_eq!(registry.array_base_offset("A").unwrap(), base);
            prop_assert_eq!(registry.array_element_scale("A").unwrap(), scale);
        }
    }
}
