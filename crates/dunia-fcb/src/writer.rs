//! FCB serialization.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::reader::COUNT_U32;
use crate::{BinaryObject, FcbHeader, Result};

/// Serialize a tree, header included.
///
/// Every count and value is written inline; no back-references are emitted.
pub(crate) fn write_tree<W: Write>(root: &BinaryObject, output: &mut W) -> Result<()> {
    let header = FcbHeader::new(root.total_objects() as u32, root.total_values() as u32);
    output.write_all(zerocopy::IntoBytes::as_bytes(&header))?;
    write_object(root, output)?;
    Ok(())
}

fn write_count<W: Write>(count: usize, output: &mut W) -> io::Result<()> {
    if count < COUNT_U32 as usize - 1 {
        output.write_u8(count as u8)
    } else {
        output.write_u8(COUNT_U32)?;
        output.write_u32::<LittleEndian>(count as u32)
    }
}

fn write_object<W: Write>(object: &BinaryObject, output: &mut W) -> io::Result<()> {
    write_count(object.children().len(), output)?;
    output.write_u32::<LittleEndian>(object.type_hash())?;

    write_count(object.values().len(), output)?;
    for (hash, value) in object.values().iter() {
        output.write_u32::<LittleEndian>(hash)?;
        write_count(value.len(), output)?;
        output.write_all(value)?;
    }

    for child in object.children() {
        write_object(child, output)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_tree;

    #[test]
    fn test_small_and_large_counts() {
        let mut small = Vec::new();
        write_count(0xFD, &mut small).unwrap();
        assert_eq!(small, vec![0xFD]);

        let mut large = Vec::new();
        write_count(0xFE, &mut large).unwrap();
        assert_eq!(large, vec![0xFF, 0xFE, 0, 0, 0]);
    }

    #[test]
    fn test_written_tree_reads_back() {
        let mut root = BinaryObject::new(0xBCDD10B4);
        for i in 0..300u32 {
            let child = BinaryObject::new(0xE0BDB3DB)
                .with_value(0xFE11D138, format!("entity{}\0", i).into_bytes())
                .unwrap()
                .with_value(0x1234, vec![0u8; 0x1FF])
                .unwrap();
            root.push_child(child);
        }

        let mut data = Vec::new();
        write_tree(&root, &mut data).unwrap();

        let read = read_tree(&data).unwrap();
        assert_eq!(read, root);
    }
}
