//! Splitting entity libraries into one document per entity.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use dunia_fcb::BinaryObject;
use dunia_schema::ObjectDefinition;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use tracing::debug;

use super::write::emit;
use super::Transcoder;
use crate::{FieldCodec, Result};

/// Type hash of an entity library container (`EntityLibraries`).
pub const ENTITY_LIBRARIES_HASH: u32 = 0xBCDD10B4;

/// Type hash of a single entity library (`EntityLibrary`).
pub const ENTITY_LIBRARY_HASH: u32 = 0xE0BDB3DB;

/// Hash of the `Name` field used to label split files.
pub const NAME_FIELD_HASH: u32 = 0xFE11D138;

/// Whether a root node is an entity library container that can be split:
/// no field values of its own and only entity libraries as children.
pub fn is_split_candidate(root: &BinaryObject) -> bool {
    root.type_hash() == ENTITY_LIBRARIES_HASH
        && root.values().is_empty()
        && root
            .children()
            .iter()
            .all(|child| child.type_hash() == ENTITY_LIBRARY_HASH)
}

/// File name for the child at `index` (zero-based) of `count` children.
///
/// The 1-based ordinal is zero-padded to the number of digits in `count`,
/// and suffixed with `_` and the child's `Name` value whenever it has one,
/// even an empty one.
pub fn ordinal_file_name(index: usize, count: usize, child: &BinaryObject) -> String {
    let width = count.to_string().len();
    let ordinal = index + 1;

    match child_name(child) {
        Some(name) => format!("{ordinal:0width$}_{name}.xml"),
        None => format!("{ordinal:0width$}.xml"),
    }
}

/// The child's `Name` value up to the first NUL, made safe for a file name.
fn child_name(child: &BinaryObject) -> Option<String> {
    let bytes = child.values().get(NAME_FIELD_HASH)?;
    let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
    let name: String = String::from_utf8_lossy(&bytes[..end])
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    Some(name)
}

impl<C: FieldCodec> Transcoder<'_, C> {
    pub(super) fn write_split<W: Write>(
        &self,
        writer: &mut Writer<W>,
        root: &BinaryObject,
        object_def: Option<&Arc<ObjectDefinition>>,
        base_path: &Path,
    ) -> Result<()> {
        let class_def = self
            .resolver
            .effective_class(object_def.map(Arc::as_ref), root)?;
        let count = root.children().len();
        debug!(count, base = %base_path.display(), "splitting entity libraries");

        let mut start = BytesStart::new("object");
        start.push_attribute(("name", "EntityLibraries"));
        emit(writer, Event::Start(start))?;

        for (index, child) in root.children().iter().enumerate() {
            fs::create_dir_all(base_path)?;
            let file_name = ordinal_file_name(index, count, child);
            let child_def = self
                .resolver
                .child_object_definition(object_def, class_def.as_deref(), child.type_hash());
            self.write_file(child, child_def.as_ref(), base_path.join(&file_name))?;

            let mut stub = BytesStart::new("object");
            stub.push_attribute(("external", file_name.as_str()));
            emit(writer, Event::Empty(stub))?;
        }

        emit(writer, Event::End(BytesEnd::new("object")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dunia_common::hash::hash_str;

    fn library(name: Option<&[u8]>) -> BinaryObject {
        let mut node = BinaryObject::new(ENTITY_LIBRARY_HASH);
        if let Some(name) = name {
            node.insert_value(NAME_FIELD_HASH, name.to_vec()).unwrap();
        }
        node
    }

    #[test]
    fn test_well_known_hashes() {
        assert_eq!(hash_str("EntityLibraries"), ENTITY_LIBRARIES_HASH);
        assert_eq!(hash_str("EntityLibrary"), ENTITY_LIBRARY_HASH);
        assert_eq!(hash_str("Name"), NAME_FIELD_HASH);
    }

    #[test]
    fn test_ordinal_names() {
        assert_eq!(ordinal_file_name(2, 12, &library(Some(b"Foo\0"))), "03_Foo.xml");
        assert_eq!(ordinal_file_name(2, 12, &library(None)), "03.xml");
        assert_eq!(ordinal_file_name(0, 9, &library(Some(b"Bar"))), "1_Bar.xml");
        assert_eq!(ordinal_file_name(2, 12, &library(Some(b"\0"))), "03_.xml");
        assert_eq!(ordinal_file_name(99, 100, &library(Some(b""))), "100_.xml");
        assert_eq!(ordinal_file_name(0, 1, &library(Some(b"  \0"))), "1_  .xml");
        assert_eq!(ordinal_file_name(4, 250, &library(Some(b"a/b:c\0junk"))), "005_a_b_c.xml");
    }

    #[test]
    fn test_split_candidate() {
        let root = BinaryObject::new(ENTITY_LIBRARIES_HASH)
            .with_child(library(None))
            .with_child(library(None));
        assert!(is_split_candidate(&root));

        let mixed = root.clone().with_child(BinaryObject::new(1));
        assert!(!is_split_candidate(&mixed));

        let with_values = root.clone().with_value(1, vec![0]).unwrap();
        assert!(!is_split_candidate(&with_values));

        assert!(is_split_candidate(&BinaryObject::new(ENTITY_LIBRARIES_HASH)));
        assert!(!is_split_candidate(&BinaryObject::new(1).with_child(library(None))));
    }
}
