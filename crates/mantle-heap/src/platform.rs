//! Platform metadata queries.
//!
//! Pure environment queries, deterministic for a given build target.

/// Size of a native pointer in bytes.
pub fn address_size() -> usize {
    std::mem::size_of::<usize>()
}

/// Size of a virtual memory page in bytes.
///
/// A per-target constant: Apple aarch64 targets use 16 KiB pages, every
/// other supported target uses 4 KiB.
pub fn page_size() -> usize {
    #[cfg(all(target_arch = "aarch64", target_vendor = "apple"))]
    {
        16384
    }
    #[cfg(not(all(target_arch = "aarch64", target_vendor = "apple")))]
    {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_size_matches_pointer_width() {
        assert_eq!(address_size(), std::mem::size_of::<*const u8>());
        assert!(address_size() == 4 || address_size() == 8);
    }

    #[test]
    fn page_size_is_a_power_of_two() {
        assert!(page_size().is_power_of_two());
        assert!(page_size() >= 4096);
    }
}
