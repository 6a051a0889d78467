//! FCB deserialization.

use dunia_common::BinaryReader;
use tracing::warn;

use crate::{BinaryObject, Error, FcbHeader, Result};

/// Marker byte for a 32-bit count.
pub(crate) const COUNT_U32: u8 = 0xFF;
/// Marker byte for a 32-bit back-reference.
pub(crate) const COUNT_REFERENCE: u8 = 0xFE;

/// A decoded count: either a plain number or a back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Count {
    Value(u32),
    Reference(u32),
}

fn read_count(reader: &mut BinaryReader<'_>) -> Result<Count> {
    let marker = reader.read_u8()?;
    Ok(match marker {
        COUNT_U32 => Count::Value(reader.read_u32()?),
        COUNT_REFERENCE => Count::Reference(reader.read_u32()?),
        small => Count::Value(small as u32),
    })
}

fn read_plain_count(reader: &mut BinaryReader<'_>) -> Result<u32> {
    let position = reader.position();
    match read_count(reader)? {
        Count::Value(count) => Ok(count),
        Count::Reference(_) => Err(Error::UnexpectedReference(position)),
    }
}

/// Read a complete FCB file from bytes.
pub(crate) fn read_tree(data: &[u8]) -> Result<BinaryObject> {
    let mut reader = BinaryReader::new(data);
    let header: FcbHeader = reader.read_struct()?;

    let magic = header.magic;
    if magic != FcbHeader::MAGIC {
        return Err(dunia_common::Error::InvalidMagic {
            expected: FcbHeader::MAGIC,
            actual: magic,
        }
        .into());
    }

    let version = header.version;
    if version != FcbHeader::VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let mut tree_reader = TreeReader {
        data,
        reader,
        objects: Vec::new(),
    };
    let root = tree_reader.read_object()?;

    let (objects, values) = (header.total_object_count, header.total_value_count);
    if objects as usize != root.total_objects() || values as usize != root.total_values() {
        warn!(
            objects,
            values,
            actual_objects = root.total_objects(),
            actual_values = root.total_values(),
            "FCB header totals do not match the tree"
        );
    }

    Ok(root)
}

struct TreeReader<'a> {
    data: &'a [u8],
    reader: BinaryReader<'a>,
    /// Start offset of every object in read order. A slot stays empty until
    /// its subtree is done.
    objects: Vec<Option<usize>>,
}

impl<'a> TreeReader<'a> {
    fn read_object(&mut self) -> Result<BinaryObject> {
        self.read_object_inner(true)
    }

    /// Read one object. With `record` unset the object is being replayed for
    /// a back-reference and its subtree is not numbered again.
    fn read_object_inner(&mut self, record: bool) -> Result<BinaryObject> {
        let start = self.reader.position();
        let child_count = match read_count(&mut self.reader)? {
            Count::Value(count) => count,
            Count::Reference(index) => return self.read_referenced(index),
        };

        let slot = self.objects.len();
        if record {
            self.objects.push(None);
        }

        let mut object = BinaryObject::new(self.reader.read_u32()?);

        let value_count = read_plain_count(&mut self.reader)?;
        for _ in 0..value_count {
            let hash = self.reader.read_u32()?;
            let value = self.read_value()?;
            object.insert_value(hash, value)?;
        }

        for _ in 0..child_count {
            let child = self.read_object_inner(record)?;
            object.push_child(child);
        }

        if record {
            self.objects[slot] = Some(start);
        }
        Ok(object)
    }

    /// Re-read a finished object from its recorded offset.
    fn read_referenced(&mut self, index: u32) -> Result<BinaryObject> {
        let start = self
            .objects
            .get(index as usize)
            .copied()
            .flatten()
            .ok_or(Error::ObjectReferenceOutOfBounds {
                index,
                count: self.objects.len(),
            })?;

        let resume = self.reader.position();
        self.reader.seek(start);
        let object = self.read_object_inner(false);
        self.reader.seek(resume);
        object
    }

    fn read_value(&mut self) -> Result<Vec<u8>> {
        let position = self.reader.position();
        match read_count(&mut self.reader)? {
            Count::Value(size) => Ok(self.reader.read_bytes(size as usize)?.to_vec()),
            Count::Reference(offset) => {
                let target = position
                    .checked_sub(offset as usize)
                    .ok_or(Error::ValueReferenceOutOfBounds { offset, position })?;
                let mut shared = BinaryReader::new(self.data);
                shared.seek(target);
                let size = read_plain_count(&mut shared)?;
                Ok(shared.read_bytes(size as usize)?.to_vec())
            }
        }
    }
}
