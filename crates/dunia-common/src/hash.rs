//! CRC-32 name hashing.
//!
//! Binary object files never store names, only the CRC-32 (IEEE) digest of
//! the UTF-8 name. Every class, field and object is keyed by this value.

/// Compute the CRC-32 hash of a byte slice.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Compute the CRC-32 hash of a name.
///
/// The string is encoded as UTF-8 before hashing.
#[inline]
pub fn hash_str(s: &str) -> u32 {
    hash_bytes(s.as_bytes())
}

/// Format a hash the way it appears in `hash` attributes: eight upper-case
/// hex digits, no prefix.
#[inline]
pub fn format_hash(hash: u32) -> String {
    format!("{:08X}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hash() {
        assert_eq!(hash_bytes(&[]), 0);
    }

    #[test]
    fn test_known_hashes() {
        assert_eq!(hash_str("EntityLibraries"), 0xBCDD10B4);
        assert_eq!(hash_str("EntityLibrary"), 0xE0BDB3DB);
        assert_eq!(hash_str("Name"), 0xFE11D138);
    }

    #[test]
    fn test_string_hash() {
        assert_eq!(hash_str("test"), hash_bytes(b"test"));
    }

    #[test]
    fn test_format_hash() {
        assert_eq!(format_hash(0xBCDD10B4), "BCDD10B4");
        assert_eq!(format_hash(0x1F), "0000001F");
    }
}
