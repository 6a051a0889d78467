//! Recursive conversion between [`BinaryObject`] trees and XML.

mod read;
pub(crate) mod split;
mod write;

use std::sync::Arc;

use dunia_fcb::BinaryObject;
use dunia_schema::{Configuration, ObjectDefinition};
use tracing::warn;

use crate::{ClassResolver, DefaultFieldCodec, FieldCodec, Result};

/// Options controlling conversion output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Write entity libraries as one file per entity plus a stub-bearing
    /// parent document.
    pub split_entity_libraries: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            split_entity_libraries: true,
        }
    }
}

/// Converts object trees to XML and back under a schema registry.
///
/// The transcoder holds no mutable state, so one instance can convert any
/// number of documents, from any number of threads when `C` is `Sync`.
#[derive(Debug, Clone)]
pub struct Transcoder<'a, C = DefaultFieldCodec> {
    config: &'a Configuration,
    resolver: ClassResolver<'a>,
    codec: C,
    options: TranscodeOptions,
}

impl<'a> Transcoder<'a> {
    /// Create a transcoder using the default field codec.
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            resolver: ClassResolver::new(config),
            codec: DefaultFieldCodec,
            options: TranscodeOptions::default(),
        }
    }
}

impl<'a, C: FieldCodec> Transcoder<'a, C> {
    /// Replace the field codec.
    pub fn with_codec<D: FieldCodec>(self, codec: D) -> Transcoder<'a, D> {
        Transcoder {
            config: self.config,
            resolver: self.resolver,
            codec,
            options: self.options,
        }
    }

    /// Replace the conversion options.
    pub fn with_options(mut self, options: TranscodeOptions) -> Self {
        self.options = options;
        self
    }

    /// The schema registry.
    pub fn config(&self) -> &'a Configuration {
        self.config
    }

    /// The conversion options.
    pub fn options(&self) -> TranscodeOptions {
        self.options
    }

    /// The root object definition for files with the given base name
    /// (e.g. `entitylibrary`).
    pub fn object_definition_for(&self, base_name: &str) -> Option<Arc<ObjectDefinition>> {
        let found = self
            .config
            .object_file_definition(base_name)
            .and_then(|file| file.object_definition())
            .cloned();
        if found.is_none() {
            warn!(base_name, "no object file definition, converting without schema");
        }
        found
    }

    /// Render a tree as an XML document in memory. Entity libraries are not
    /// split.
    pub fn write_string(&self, node: &BinaryObject, object_def: Option<&Arc<ObjectDefinition>>) -> Result<String> {
        let mut output = Vec::new();
        self.write_to(&mut output, node, object_def)?;
        String::from_utf8(output).map_err(|e| crate::Error::Xml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use dunia_common::hash::hash_str;
    use dunia_common::{NameHash, XmlElement};
    use dunia_schema::{ClassDefinition, EnumDefinition, FieldDefinition, FieldType};

    use crate::{Error, ENTITY_LIBRARIES_HASH, ENTITY_LIBRARY_HASH, NAME_FIELD_HASH};

    fn field(name: &str, field_type: FieldType) -> FieldDefinition {
        FieldDefinition::new(NameHash::from_name(name), field_type)
    }

    /// Entity libraries holding any registered component class.
    fn schema() -> (Configuration, Arc<ObjectDefinition>) {
        let mut config = Configuration::new();
        let shape = Arc::new(EnumDefinition::new("Shape").with_element("Point", 0).with_element("Spot", 1));
        config
            .add_class(
                ClassDefinition::new(NameHash::from_name("CLight"))
                    .with_field(field("Intensity", FieldType::Float32))
                    .with_field(FieldDefinition::enumeration(NameHash::from_name("Shape"), shape))
                    .with_field(field("Color", FieldType::Vector3)),
            )
            .unwrap();
        config
            .add_class(
                ClassDefinition::new(NameHash::from_name("CMesh"))
                    .with_field(field("File", FieldType::String))
                    .with_field(field("Lod", FieldType::UInt8)),
            )
            .unwrap();

        let library = ClassDefinition::new(NameHash::from_name("EntityLibrary"))
            .with_dynamic_nested_classes(true)
            .with_field(field("Name", FieldType::String))
            .with_field(field("Id", FieldType::UInt64));
        let root = ObjectDefinition::new(NameHash::from_name("EntityLibraries"))
            .with_nested_object(ObjectDefinition::new(NameHash::from_name("EntityLibrary")).with_class(Arc::new(library)));
        (config, Arc::new(root))
    }

    fn light(intensity: f32) -> BinaryObject {
        let mut color = Vec::new();
        for c in [1.0f32, 0.5, 0.25] {
            color.extend_from_slice(&c.to_le_bytes());
        }
        BinaryObject::new(hash_str("CLight"))
            .with_value(hash_str("Intensity"), intensity.to_le_bytes())
            .unwrap()
            .with_value(hash_str("Shape"), 1i32.to_le_bytes())
            .unwrap()
            .with_value(hash_str("Color"), color)
            .unwrap()
    }

    fn entity(name: Option<&str>, id: u64) -> BinaryObject {
        let mut node = BinaryObject::new(ENTITY_LIBRARY_HASH);
        if let Some(name) = name {
            node.insert_value(NAME_FIELD_HASH, format!("{name}\0").into_bytes()).unwrap();
        }
        node.insert_value(hash_str("Id"), id.to_le_bytes().to_vec()).unwrap();
        // Undocumented field and child
        node.insert_value(0x0BADF00D, vec![9, 8, 7]).unwrap();
        node.push_child(light(2.5));
        node.push_child(
            BinaryObject::new(hash_str("CMesh"))
                .with_value(hash_str("File"), b"crate.xbg\0".to_vec())
                .unwrap()
                .with_value(hash_str("Lod"), vec![2])
                .unwrap(),
        );
        node.push_child(BinaryObject::new(0x00001234).with_value(1, vec![0xFF]).unwrap());
        node
    }

    fn libraries(names: &[Option<&str>]) -> BinaryObject {
        let mut root = BinaryObject::new(ENTITY_LIBRARIES_HASH);
        for (i, name) in names.iter().enumerate() {
            root.push_child(entity(*name, i as u64));
        }
        root
    }

    fn reread(transcoder: &Transcoder<'_>, xml: &str, object_def: Option<&Arc<ObjectDefinition>>) -> BinaryObject {
        let element = XmlElement::parse(xml).unwrap();
        transcoder.read_element(&element, object_def, Path::new(".")).unwrap()
    }

    #[test]
    fn test_round_trip_with_schema() {
        let (config, root_def) = schema();
        let transcoder = Transcoder::new(&config);
        let root = libraries(&[Some("Props"), None]);

        let xml = transcoder.write_string(&root, Some(&root_def)).unwrap();
        assert!(xml.contains(r#"<object name="EntityLibrary">"#));
        assert!(xml.contains(r#"<field name="Name" type="String">Props</field>"#));
        assert!(xml.contains(r#"<object name="CLight">"#));
        assert!(xml.contains(r#"<field name="Shape" type="Enum" enum="Shape">Spot</field>"#));
        assert!(xml.contains(r#"<field name="Color" type="Vector3">1,0.5,0.25</field>"#));
        assert!(xml.contains(r#"<field hash="0BADF00D" type="BinHex">090807</field>"#));
        assert!(xml.contains(r#"<object hash="00001234">"#));

        assert_eq!(reread(&transcoder, &xml, Some(&root_def)), root);
    }

    #[test]
    fn test_round_trip_without_schema() {
        let config = Configuration::new();
        let transcoder = Transcoder::new(&config);
        let root = libraries(&[Some("Props")]);

        let xml = transcoder.write_string(&root, None).unwrap();
        assert!(!xml.contains("name="));
        assert!(!xml.contains(r#"type="String""#));
        assert_eq!(reread(&transcoder, &xml, None), root);
    }

    #[test]
    fn test_discriminator_outranks_static_class() {
        let (mut config, _) = schema();
        config
            .add_class(
                ClassDefinition::new(NameHash::from_name("CSpotLight"))
                    .with_field(field("hidClass", FieldType::Hash32))
                    .with_field(field("Cone", FieldType::Float32)),
            )
            .unwrap();

        let component = ClassDefinition::new(NameHash::from_name("Component"))
            .with_discriminator(NameHash::from_name("hidClass"))
            .with_field(field("hidClass", FieldType::Hash32))
            .with_field(field("Cone", FieldType::UInt32));
        let parent = ClassDefinition::new(NameHash::from_name("CEntity")).with_nested_class(component);
        let object_def = Arc::new(ObjectDefinition::new(NameHash::from_name("Entity")).with_class(Arc::new(parent)));

        let spot = BinaryObject::new(hash_str("Component"))
            .with_value(hash_str("hidClass"), hash_str("CSpotLight").to_le_bytes())
            .unwrap()
            .with_value(hash_str("Cone"), 0.75f32.to_le_bytes())
            .unwrap();
        // Names a class the registry does not know: the static class applies
        let plain = BinaryObject::new(hash_str("Component"))
            .with_value(hash_str("hidClass"), 0xDEADBEEFu32.to_le_bytes())
            .unwrap()
            .with_value(hash_str("Cone"), 3u32.to_le_bytes())
            .unwrap();
        let node = BinaryObject::new(hash_str("Entity")).with_child(spot).with_child(plain);

        let transcoder = Transcoder::new(&config);
        let xml = transcoder.write_string(&node, Some(&object_def)).unwrap();
        assert!(xml.contains(r#"<object name="Component">"#));
        assert!(xml.contains(r#"<field name="hidClass" type="Hash32">DEADBEEF</field>"#));
        assert!(xml.contains(r#"<field name="Cone" type="Float32">0.75</field>"#));
        assert!(xml.contains(r#"<field name="Cone" type="UInt32">3</field>"#));

        assert_eq!(reread(&transcoder, &xml, Some(&object_def)), node);
    }

    #[test]
    fn test_decimal_discriminator_round_trip() {
        let mut config = Configuration::new();
        config
            .add_class(
                ClassDefinition::new(NameHash::from_name("CLight"))
                    .with_field(field("hidClass", FieldType::UInt32))
                    .with_field(field("Cone", FieldType::Float32)),
            )
            .unwrap();
        let object_def = Arc::new(
            ObjectDefinition::new(NameHash::from_name("Entity")).with_discriminator(NameHash::from_name("hidClass")),
        );

        let light = hash_str("CLight");
        let node = BinaryObject::new(hash_str("Entity"))
            .with_value(hash_str("hidClass"), light.to_le_bytes())
            .unwrap()
            .with_value(hash_str("Cone"), 0.5f32.to_le_bytes())
            .unwrap();

        let transcoder = Transcoder::new(&config);
        let xml = transcoder.write_string(&node, Some(&object_def)).unwrap();
        assert!(xml.contains(&format!(r#"<field name="hidClass" type="UInt32">{light}</field>"#)));
        assert!(xml.contains(r#"<field name="Cone" type="Float32">0.5</field>"#));

        assert_eq!(reread(&transcoder, &xml, Some(&object_def)), node);
    }

    #[test]
    fn test_missing_xml_discriminator() {
        let (config, _) = schema();
        let object_def = Arc::new(
            ObjectDefinition::new(NameHash::from_name("Entity")).with_discriminator(NameHash::from_name("hidClass")),
        );
        let element = XmlElement::parse(r#"<object name="Entity"/>"#).unwrap();
        let err = Transcoder::new(&config)
            .read_element(&element, Some(&object_def), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, Error::MissingDiscriminator { .. }));
    }

    #[test]
    fn test_split_merge_equivalence() {
        let dir = tempfile::tempdir().unwrap();
        let (config, root_def) = schema();
        let root = libraries(&[Some("Alpha"), None, Some("Gamma")]);

        let split = Transcoder::new(&config);
        let output = dir.path().join("lib.xml");
        split
            .write_document(&root, Some(&root_def), &output, dir.path().join("lib"))
            .unwrap();

        let parent = fs::read_to_string(&output).unwrap();
        assert!(parent.contains(r#"<object name="EntityLibraries">"#));
        assert!(parent.contains(r#"<object external="1_Alpha.xml"/>"#));
        assert!(parent.contains(r#"<object external="2.xml"/>"#));
        assert!(parent.contains(r#"<object external="3_Gamma.xml"/>"#));
        assert!(dir.path().join("lib/2.xml").is_file());

        let merged = split.read_document(&output, Some(&root_def)).unwrap();
        assert_eq!(merged, root);

        // The monolithic document reads back to the same tree
        let whole = Transcoder::new(&config).with_options(TranscodeOptions {
            split_entity_libraries: false,
        });
        let monolithic = dir.path().join("whole.xml");
        whole
            .write_document(&root, Some(&root_def), &monolithic, dir.path().join("whole"))
            .unwrap();
        assert!(!dir.path().join("whole").exists());
        assert_eq!(whole.read_document(&monolithic, Some(&root_def)).unwrap(), merged);
    }

    #[test]
    fn test_empty_library_container_splits() {
        let dir = tempfile::tempdir().unwrap();
        let (config, root_def) = schema();
        let root = BinaryObject::new(ENTITY_LIBRARIES_HASH);

        let transcoder = Transcoder::new(&config);
        let output = dir.path().join("empty.xml");
        transcoder
            .write_document(&root, Some(&root_def), &output, dir.path().join("empty"))
            .unwrap();

        assert!(fs::read_to_string(&output).unwrap().contains(r#"<object name="EntityLibraries">"#));
        assert!(!dir.path().join("empty").exists());
        assert_eq!(transcoder.read_document(&output, Some(&root_def)).unwrap(), root);
    }

    #[test]
    fn test_empty_name_keeps_separator() {
        let dir = tempfile::tempdir().unwrap();
        let (config, root_def) = schema();
        let root = libraries(&[Some(""), None]);

        let transcoder = Transcoder::new(&config);
        let output = dir.path().join("lib.xml");
        transcoder
            .write_document(&root, Some(&root_def), &output, dir.path().join("lib"))
            .unwrap();

        let parent = fs::read_to_string(&output).unwrap();
        assert!(parent.contains(r#"<object external="1_.xml"/>"#));
        assert!(parent.contains(r#"<object external="2.xml"/>"#));
        assert_eq!(transcoder.read_document(&output, Some(&root_def)).unwrap(), root);
    }

    #[test]
    fn test_object_definition_for() {
        let (mut config, root_def) = schema();
        config
            .add_object_file(dunia_schema::ObjectFileDefinition::new(
                "EntityLibrary",
                Some(ObjectDefinition::clone(&root_def)),
            ))
            .unwrap();
        let transcoder = Transcoder::new(&config);

        assert!(transcoder.object_definition_for("entitylibrary").is_some());
        assert!(transcoder.object_definition_for("worldsector").is_none());
    }
}
