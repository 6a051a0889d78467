//! FCB container header.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Header at the start of every binary object file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct FcbHeader {
    /// Magic value, `"nbCF"` when read little-endian.
    pub magic: u32,
    /// Container version.
    pub version: u16,
    /// Flags (unused, preserved as zero).
    pub flags: u16,
    /// Number of objects in the tree, root included.
    pub total_object_count: u32,
    /// Number of field values across all objects.
    pub total_value_count: u32,
}

impl FcbHeader {
    /// The magic value at the start of an FCB file.
    pub const MAGIC: u32 = 0x4643_626E;

    /// The only container version this crate reads and writes.
    pub const VERSION: u16 = 3;

    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a header for a tree with the given totals.
    pub fn new(total_object_count: u32, total_value_count: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            flags: 0,
            total_object_count,
            total_value_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(FcbHeader::SIZE, 16);

        let header = FcbHeader::new(2, 5);
        let bytes = zerocopy::IntoBytes::as_bytes(&header);
        assert_eq!(&bytes[..4], b"nbCF");
        assert_eq!(&bytes[4..6], &[3, 0]);
    }
}
