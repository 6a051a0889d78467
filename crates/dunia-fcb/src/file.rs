//! Binary object file handling.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::{reader, writer, BinaryObject, FcbHeader, Result};

/// A binary object file: a single root object and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryObjectFile {
    /// The root object.
    pub root: BinaryObject,
}

impl BinaryObjectFile {
    /// Wrap a root object.
    pub fn new(root: BinaryObject) -> Self {
        Self { root }
    }

    /// Check if data starts with the FCB magic.
    pub fn is_fcb(data: &[u8]) -> bool {
        data.len() >= 4 && data[..4] == FcbHeader::MAGIC.to_le_bytes()
    }

    /// Parse a binary object file from bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        reader::read_tree(data).map(Self::new)
    }

    /// Serialize to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        writer::write_tree(&self.root, &mut output)?;
        Ok(output)
    }

    /// Read a binary object file from disk.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::deserialize(&data)
    }

    /// Write the file to disk.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut output = BufWriter::new(fs::File::create(path)?);
        writer::write_tree(&self.root, &mut output)?;
        std::io::Write::flush(&mut output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fcb() {
        assert!(BinaryObjectFile::is_fcb(b"nbCF\x03\x00"));
        assert!(!BinaryObjectFile::is_fcb(b"<?xml"));
        assert!(!BinaryObjectFile::is_fcb(b"nb"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.fcb");

        let file = BinaryObjectFile::new(
            BinaryObject::new(1)
                .with_value(2, vec![1, 2, 3])
                .unwrap()
                .with_child(BinaryObject::new(3)),
        );
        file.write_file(&path).unwrap();

        let read = BinaryObjectFile::read_file(&path).unwrap();
        assert_eq!(read, file);
    }
}
