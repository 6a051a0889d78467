//! Class resolution.
//!
//! Which class governs a node is decided by data, not by static type:
//!
//! 1. If the object definition names a discriminator field and the node has
//!    it, the field holds the hash of the governing class.
//! 2. Otherwise the object definition's own class applies.
//! 3. If that class names a discriminator field in turn and the node has it,
//!    the class it points to applies instead.
//!
//! Children are resolved either against the class's fixed nested tables or,
//! for classes with dynamic nested classes, against the global class table.

use std::sync::Arc;

use dunia_common::{BinaryReader, NameHash, XmlElement};
use dunia_fcb::BinaryObject;
use dunia_schema::{ClassDefinition, Configuration, FieldType, ObjectDefinition};
use tracing::warn;

use crate::{DefaultFieldCodec, Error, FieldCodec, Result};

/// Something a discriminator value can be read from: a binary node or an
/// XML element.
pub trait DiscriminatorSource {
    /// The class hash stored under `field`, or `None` when the node has no
    /// such field and that is acceptable for this representation.
    fn class_hash(&self, field: &NameHash) -> Result<Option<u32>>;
}

impl DiscriminatorSource for BinaryObject {
    /// The value is decoded as a little-endian `u32`. An absent value is fine.
    fn class_hash(&self, field: &NameHash) -> Result<Option<u32>> {
        match self.values().get(field.hash()) {
            Some(bytes) => Ok(Some(BinaryReader::new(bytes).read_u32()?)),
            None => Ok(None),
        }
    }
}

impl DiscriminatorSource for XmlElement {
    /// The `field` child is looked up by name first, then by hash. Its text is
    /// encoded under its own `type` attribute (`Hash32` when absent) and the
    /// payload read as a little-endian `u32`, as on the binary side. The
    /// field must be present.
    fn class_hash(&self, field: &NameHash) -> Result<Option<u32>> {
        let by_name = field
            .name()
            .and_then(|name| self.find_child("field", "name", name));
        let by_hash = || {
            self.children_named("field").find(|child| {
                child
                    .attribute("hash")
                    .and_then(|h| u32::from_str_radix(h.trim(), 16).ok())
                    == Some(field.hash())
            })
        };

        let element = by_name.or_else(by_hash).ok_or_else(|| Error::MissingDiscriminator {
            object: describe(self),
            field: field.to_string(),
        })?;

        let field_type = match element.attribute("type") {
            Some(text) => text.parse::<FieldType>()?,
            None => FieldType::Hash32,
        };
        let invalid = || Error::InvalidDiscriminator {
            field: field.to_string(),
            text: element.text.trim().to_string(),
        };

        let bytes = DefaultFieldCodec
            .encode(None, field_type, element)
            .map_err(|_| invalid())?;
        let hash = BinaryReader::new(&bytes).read_u32().map_err(|_| invalid())?;
        Ok(Some(hash))
    }
}

fn describe(element: &XmlElement) -> String {
    NameHash::from_element(element)
        .map(|id| id.to_string())
        .unwrap_or_else(|_| element.tag.clone())
}

/// Resolves class and child object definitions against a registry.
#[derive(Debug, Clone, Copy)]
pub struct ClassResolver<'a> {
    config: &'a Configuration,
}

impl<'a> ClassResolver<'a> {
    /// Create a resolver over a registry.
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Determine the class definition that governs `node`.
    ///
    /// `None` means the node has no known class: it is written by hash with
    /// all fields as `BinHex`.
    pub fn effective_class<S>(
        &self,
        object_def: Option<&ObjectDefinition>,
        node: &S,
    ) -> Result<Option<Arc<ClassDefinition>>>
    where
        S: DiscriminatorSource + ?Sized,
    {
        let Some(object_def) = object_def else {
            return Ok(None);
        };

        if let Some(field) = object_def.discriminator() {
            if let Some(class) = self.discriminated_class(node, field)? {
                return Ok(Some(class));
            }
        }

        let Some(class) = object_def.class_definition() else {
            return Ok(None);
        };

        if let Some(field) = class.discriminator() {
            if let Some(selected) = self.discriminated_class(node, field)? {
                return Ok(Some(selected));
            }
        }

        Ok(Some(Arc::clone(class)))
    }

    fn discriminated_class<S>(&self, node: &S, field: &NameHash) -> Result<Option<Arc<ClassDefinition>>>
    where
        S: DiscriminatorSource + ?Sized,
    {
        let Some(hash) = node.class_hash(field)? else {
            return Ok(None);
        };

        let class = self.config.class_definition(hash).cloned();
        if class.is_none() {
            warn!(field = %field, class = format_args!("{:08X}", hash), "discriminator names an unknown class");
        }
        Ok(class)
    }

    /// Determine the object definition for a child of type `type_hash`.
    ///
    /// For a class with dynamic nested classes, the child's type hash is
    /// looked up in the global class table and the nested tables are ignored.
    /// Otherwise the class's nested classes are tried, then the object
    /// definition's nested objects.
    pub fn child_object_definition(
        &self,
        object_def: Option<&Arc<ObjectDefinition>>,
        class_def: Option<&ClassDefinition>,
        type_hash: u32,
    ) -> Option<Arc<ObjectDefinition>> {
        if let Some(class) = class_def.filter(|c| c.dynamic_nested_classes()) {
            let found = self.config.class_definition(type_hash);
            if found.is_none() {
                warn!(
                    parent = %class.id(),
                    child = format_args!("{:08X}", type_hash),
                    "no class definition for dynamic child"
                );
            }
            return found.map(|c| Arc::new(ObjectDefinition::from_class(c)));
        }

        if let Some(nested) = class_def.and_then(|c| c.nested_class(type_hash)) {
            return Some(Arc::new(ObjectDefinition::from_class(nested)));
        }

        object_def.and_then(|o| o.nested_object(type_hash)).cloned()
    }
}
