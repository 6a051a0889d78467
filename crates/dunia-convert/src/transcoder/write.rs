//! Object tree to XML.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use dunia_common::hash::format_hash;
use dunia_common::XmlElement;
use dunia_fcb::BinaryObject;
use dunia_schema::{ClassDefinition, FieldDefinition, FieldType, ObjectDefinition};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

use super::{split, Transcoder};
use crate::{Error, FieldCodec, Result};

pub(super) fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|e| Error::Xml(e.to_string()))
}

impl<C: FieldCodec> Transcoder<'_, C> {
    /// Write a tree as an XML document at `output_path`.
    ///
    /// When splitting is enabled and the root is an entity library container,
    /// every entity is written to its own file under `base_path` and the
    /// document at `output_path` only holds external references.
    pub fn write_document<P, B>(
        &self,
        root: &BinaryObject,
        object_def: Option<&Arc<ObjectDefinition>>,
        output_path: P,
        base_path: B,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        B: AsRef<Path>,
    {
        if !(self.options.split_entity_libraries && split::is_split_candidate(root)) {
            return self.write_file(root, object_def, output_path);
        }

        let file = File::create(output_path.as_ref())?;
        let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_split(&mut writer, root, object_def, base_path.as_ref())?;
        writer.into_inner().flush()?;
        Ok(())
    }

    /// Write a tree as a standalone XML document, without splitting.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        node: &BinaryObject,
        object_def: Option<&Arc<ObjectDefinition>>,
        path: P,
    ) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut output = BufWriter::new(file);
        self.write_to(&mut output, node, object_def)?;
        output.flush()?;
        Ok(())
    }

    pub(super) fn write_to<W: Write>(
        &self,
        output: W,
        node: &BinaryObject,
        object_def: Option<&Arc<ObjectDefinition>>,
    ) -> Result<()> {
        let mut writer = Writer::new_with_indent(output, b' ', 2);
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_node(&mut writer, node, object_def)
    }

    /// Write one node and its subtree as an `object` element.
    pub fn write_node<W: Write>(
        &self,
        writer: &mut Writer<W>,
        node: &BinaryObject,
        object_def: Option<&Arc<ObjectDefinition>>,
    ) -> Result<()> {
        let class_def = self
            .resolver
            .effective_class(object_def.map(Arc::as_ref), node)?;
        if class_def.is_none() {
            warn!(hash = %format_hash(node.type_hash()), "no class definition, writing fields as BinHex");
        }

        let mut start = BytesStart::new("object");
        match object_name(node, object_def, class_def.as_deref()) {
            Some(name) => start.push_attribute(("name", name)),
            None => start.push_attribute(("hash", format_hash(node.type_hash()).as_str())),
        }

        if node.values().is_empty() && node.children().is_empty() {
            return emit(writer, Event::Empty(start));
        }
        emit(writer, Event::Start(start))?;

        for (hash, bytes) in node.values().iter() {
            let field_def = match class_def.as_deref() {
                Some(class) => {
                    let field_def = class.field(hash);
                    if field_def.is_none() {
                        warn!(class = %class.id(), field = %format_hash(hash), "no field definition");
                    }
                    field_def
                }
                None => None,
            };
            self.write_field(writer, hash, bytes, field_def)?;
        }

        for child in node.children() {
            let child_def = self
                .resolver
                .child_object_definition(object_def, class_def.as_deref(), child.type_hash());
            self.write_node(writer, child, child_def.as_ref())?;
        }

        emit(writer, Event::End(BytesEnd::new("object")))
    }

    fn write_field<W: Write>(
        &self,
        writer: &mut Writer<W>,
        hash: u32,
        bytes: &[u8],
        field_def: Option<&FieldDefinition>,
    ) -> Result<()> {
        let decoded = field_def.and_then(|def| match self.decode_exact(def, bytes) {
            Ok(text) => Some((def, text)),
            Err(e) => {
                warn!(field = %def.id(), error = %e, "writing field as BinHex");
                None
            }
        });

        let mut start = BytesStart::new("field");
        match field_def.and_then(|def| def.name()) {
            Some(name) => start.push_attribute(("name", name)),
            None => start.push_attribute(("hash", format_hash(hash).as_str())),
        }

        let text = match decoded {
            Some((def, text)) => {
                start.push_attribute(("type", def.field_type().as_str()));
                if let Some(enum_def) = def.enum_definition() {
                    start.push_attribute(("enum", enum_def.name()));
                }
                text
            }
            None => {
                start.push_attribute(("type", FieldType::BinHex.as_str()));
                hex::encode_upper(bytes)
            }
        };

        if text.is_empty() {
            return emit(writer, Event::Empty(start));
        }
        emit(writer, Event::Start(start))?;
        emit(writer, Event::Text(BytesText::new(&text)))?;
        emit(writer, Event::End(BytesEnd::new("field")))
    }

    /// Decode a payload, accepting the text only if it encodes back to the
    /// same bytes.
    fn decode_exact(&self, def: &FieldDefinition, bytes: &[u8]) -> Result<String> {
        let field_type = def.field_type();
        let text = self.codec.decode(Some(def), field_type, bytes)?;
        let element = XmlElement::new("field").text(text.as_str());
        if self.codec.encode(Some(def), field_type, &element)? != bytes {
            return Err(Error::InvalidFieldPayload {
                field_type,
                size: bytes.len(),
            });
        }
        Ok(text)
    }
}

/// The symbolic name for a node, used only when it hashes to the node's
/// type hash.
fn object_name<'d>(
    node: &BinaryObject,
    object_def: Option<&'d Arc<ObjectDefinition>>,
    class_def: Option<&'d ClassDefinition>,
) -> Option<&'d str> {
    let from_object = object_def
        .filter(|o| o.hash() == node.type_hash())
        .and_then(|o| o.name());
    let from_class = || {
        class_def
            .filter(|c| c.hash() == node.type_hash())
            .and_then(|c| c.name())
    };
    from_object.or_else(from_class)
}
