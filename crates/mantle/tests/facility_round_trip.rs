//! Integration test: the full facility surface end to end.
//!
//! Registers a type's layout, instantiates it without running any
//! construction logic, drives its slots through the handle, and exercises
//! the off-heap block operations' round-trip guarantees.

use mantle::prelude::*;

#[repr(C)]
struct Session {
    id: u64,
    flags: u32,
    weight: f64,
    next: *mut (),
}

impl Session {
    /// The constructor the facility must bypass: every field non-zero.
    #[allow(dead_code)]
    fn new() -> Self {
        Self {
            id: 0xDEAD_BEEF,
            flags: 0xFFFF_FFFF,
            weight: 1.0,
            next: std::ptr::NonNull::<()>::dangling().as_ptr(),
        }
    }
}

fn session_registry() -> LayoutRegistry {
    let mut registry = LayoutRegistry::new();
    registry
        .register(mantle::struct_layout!(Session { id, flags, weight, next }))
        .unwrap();
    registry
        .register(TypeLayout::array("f64[]", 0, std::mem::size_of::<f64>()))
        .unwrap();
    registry
}

#[test]
fn instance_fields_are_zero_not_constructed() {
    let handle = Handle::acquire();
    let registry = session_registry();
    let instance = handle
        .allocate_instance(registry.layout("Session").unwrap())
        .unwrap();

    let id = registry.field_offset("Session", "id").unwrap();
    let flags = registry.field_offset("Session", "flags").unwrap();
    let weight = registry.field_offset("Session", "weight").unwrap();
    let next = registry.field_offset("Session", "next").unwrap();

    unsafe {
        assert_eq!(handle.load::<u64>(instance.base(), id), 0);
        assert_eq!(handle.load::<u32>(instance.base(), flags), 0);
        assert_eq!(handle.load::<f64>(instance.base(), weight), 0.0);
        assert!(handle.load_ptr(instance.base(), next).is_null());
    }
}

#[test]
fn slot_access_through_layout_offsets() {
    let handle = Handle::acquire();
    let registry = session_registry();
    let instance = handle
        .allocate_instance(registry.layout("Session").unwrap())
        .unwrap();

    let id = registry.field_offset("Session", "id").unwrap();
    let flags = registry.field_offset("Session", "flags").unwrap();
    let weight = registry.field_offset("Session", "weight").unwrap();

    unsafe {
        handle.store::<u64>(instance.base(), id, 7_000_000_001);
        handle.store_volatile::<u32>(instance.base(), flags, 0b1010);
        handle.store_ordered::<f64>(instance.base(), weight, 2.5);

        assert_eq!(handle.load::<u64>(instance.base(), id), 7_000_000_001);
        assert_eq!(handle.load_volatile::<u32>(instance.base(), flags), 0b1010);
        assert_eq!(handle.load_volatile::<f64>(instance.base(), weight), 2.5);

        // CAS and fetch family through the same offsets.
        assert!(handle.compare_and_swap::<u32>(instance.base(), flags, 0b1010, 0b1111));
        assert!(!handle.compare_and_swap::<u32>(instance.base(), flags, 0b1010, 0));
        assert_eq!(handle.fetch_add::<u64>(instance.base(), id, 1), 7_000_000_001);
        assert_eq!(handle.fetch_set::<u64>(instance.base(), id, 5), 7_000_000_002);
        assert_eq!(handle.load::<u64>(instance.base(), id), 5);
    }
}

#[test]
fn array_slots_through_registry_metadata() {
    let handle = Handle::acquire();
    let registry = session_registry();

    let base_offset = registry.array_base_offset("f64[]").unwrap();
    let scale = registry.array_element_scale("f64[]").unwrap();
    assert!(scale > 0);

    let addr = handle.allocate_zeroed(base_offset + scale * 8).unwrap();
    unsafe {
        for k in 0..8 {
            handle.store::<f64>(
                addr.as_mut_ptr(),
                base_offset + k * scale,
                k as f64 * 0.5,
            );
        }
        for k in 0..8 {
            assert_eq!(
                handle.load::<f64>(addr.as_mut_ptr(), base_offset + k * scale),
                k as f64 * 0.5
            );
        }
        handle.free(addr);
    }
}

#[test]
fn allocation_fill_copy_round_trip() {
    // Allocate 64 bytes, fill with 0xAB, copy into a second block:
    // every byte of the copy must read 0xAB.
    let handle = Handle::acquire();
    let a = handle.allocate(64).unwrap();
    let b = handle.allocate(64).unwrap();
    unsafe {
        assert_eq!(handle.allocated_size(a), 64);
        handle.set_memory(a, 64, 0xAB);
        handle.copy_memory(a, b, 64);
        for k in 0..64 {
            assert_eq!(handle.read_direct::<u8>(b.offset(k)), 0xAB, "byte {k}");
        }
        handle.free(a);
        handle.free(b);
    }
}

#[test]
fn direct_volatile_access_at_raw_addresses() {
    let handle = Handle::acquire();
    let addr = handle.allocate_zeroed(16).unwrap();
    unsafe {
        handle.write_direct_volatile::<u64>(addr, 99);
        assert_eq!(handle.read_direct_volatile::<u64>(addr), 99);
        handle.write_direct::<u32>(addr.offset(8), 7);
        assert_eq!(handle.read_direct::<u32>(addr.offset(8)), 7);
        handle.free(addr);
    }
}

#[test]
fn invalid_requests_fail_with_typed_errors() {
    let handle = Handle::acquire();
    let registry = session_registry();

    // Allocation: zero and absurd sizes are errors, not UB.
    assert!(matches!(
        handle.allocate(0),
        Err(AllocError::InvalidSize { .. })
    ));
    assert!(matches!(
        handle.allocate(usize::MAX),
        Err(AllocError::InvalidSize { .. })
    ));

    // Metadata: unknown names are errors, not crashes.
    assert!(matches!(
        registry.field_offset("Session", "nope"),
        Err(MetadataError::UnknownField { .. })
    ));
    assert!(matches!(
        registry.array_base_offset("Session"),
        Err(MetadataError::NotAnArray { .. })
    ));
    assert!(matches!(
        registry.layout("Ghost"),
        Err(MetadataError::UnknownType { .. })
    ));

    // Instantiation: opaque layouts are not instantiable.
    let mut registry = registry;
    registry.register(TypeLayout::opaque("Abstract")).unwrap();
    assert!(matches!(
        handle.allocate_instance(registry.layout("Abstract").unwrap()),
        Err(InstantiateError::NotInstantiable { .. })
    ));
}

#[test]
fn heap_stats_track_allocations() {
    let handle = Handle::acquire();
    let before = handle.heap_stats();
    let addr = handle.allocate(32).unwrap();
    let mid = handle.heap_stats();
    assert!(mid.total_allocations > before.total_allocations);
    unsafe { handle.free(addr) };
    let after = handle.heap_stats();
    assert!(after.total_frees > before.total_frees);
}

#[test]
fn singleton_identity_across_acquisitions() {
    let a = Handle::acquire();
    let b = Handle::acquire();
    let c = Handle::try_acquire().unwrap();
    assert!(std::ptr::eq(a, b));
    assert!(std::ptr::eq(b, c));
}
