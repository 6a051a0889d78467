//! XML to object tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dunia_common::{NameHash, XmlElement};
use dunia_fcb::BinaryObject;
use dunia_schema::{ClassDefinition, FieldType, ObjectDefinition};

use super::Transcoder;
use crate::{Error, FieldCodec, Result};

impl<C: FieldCodec> Transcoder<'_, C> {
    /// Read an XML document into an object tree.
    ///
    /// External references are resolved against the document path with its
    /// extension removed, so `lib.xml` looks for its parts under `lib/`.
    pub fn read_document<P: AsRef<Path>>(
        &self,
        path: P,
        object_def: Option<&Arc<ObjectDefinition>>,
    ) -> Result<BinaryObject> {
        let path = path.as_ref();
        let root = XmlElement::open(path)?;
        self.read_element(&root, object_def, &path.with_extension(""))
    }

    /// Read a parsed `object` element into an object tree.
    pub fn read_element(
        &self,
        element: &XmlElement,
        object_def: Option<&Arc<ObjectDefinition>>,
        base_path: &Path,
    ) -> Result<BinaryObject> {
        expect_object(element)?;
        if let Some(external) = element.attribute("external") {
            let (root, base_path) = load_external(element, external, base_path)?;
            return self.read_element(&root, object_def, &base_path);
        }

        let id = NameHash::from_element(element)?;
        self.read_node(element, &id, object_def, base_path)
    }

    fn read_child(
        &self,
        element: &XmlElement,
        parent_object: Option<&Arc<ObjectDefinition>>,
        parent_class: Option<&ClassDefinition>,
        base_path: &Path,
    ) -> Result<BinaryObject> {
        if let Some(external) = element.attribute("external") {
            let (root, base_path) = load_external(element, external, base_path)?;
            expect_object(&root)?;
            return self.read_child(&root, parent_object, parent_class, &base_path);
        }

        let id = NameHash::from_element(element)?;
        let object_def = self
            .resolver
            .child_object_definition(parent_object, parent_class, id.hash());
        self.read_node(element, &id, object_def.as_ref(), base_path)
    }

    fn read_node(
        &self,
        element: &XmlElement,
        id: &NameHash,
        object_def: Option<&Arc<ObjectDefinition>>,
        base_path: &Path,
    ) -> Result<BinaryObject> {
        let class_def = self
            .resolver
            .effective_class(object_def.map(Arc::as_ref), element)?;
        let mut node = BinaryObject::new(id.hash());

        for field in element.children_named("field") {
            let field_id = NameHash::from_element(field)?;
            let field_def = class_def.as_deref().and_then(|c| c.field(field_id.hash()));

            let field_type = match field.attribute("type") {
                Some(text) => text.parse::<FieldType>()?,
                None => match field_def {
                    Some(def) => def.field_type(),
                    None => return Err(dunia_schema::Error::UnknownFieldType(String::new()).into()),
                },
            };

            let bytes = self.codec.encode(field_def, field_type, field)?;
            node.insert_value(field_id.hash(), bytes)?;
        }

        for child in element.children_named("object") {
            let child = self.read_child(child, object_def, class_def.as_deref(), base_path)?;
            node.push_child(child);
        }

        Ok(node)
    }
}

fn expect_object(element: &XmlElement) -> Result<()> {
    if element.tag == "object" {
        Ok(())
    } else {
        Err(Error::Format(format!(
            "expected <object> element, found <{}>",
            element.tag
        )))
    }
}

/// Load the document an external stub points at. Returns its root element
/// and the base path for references inside it.
fn load_external(stub: &XmlElement, external: &str, base_path: &Path) -> Result<(XmlElement, PathBuf)> {
    if stub.attributes.len() != 1 || !stub.children.is_empty() {
        return Err(Error::Format(format!(
            "external reference {external:?} must not carry other attributes or children"
        )));
    }

    let path = base_path.join(external);
    let data = fs::read(&path).map_err(|source| Error::External {
        path: path.clone(),
        source,
    })?;
    let root = XmlElement::parse_bytes(&data)?;
    Ok((root, path.with_extension("")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use dunia_common::hash::hash_str;
    use dunia_schema::{Configuration, FieldDefinition};

    fn read(config: &Configuration, xml: &str, object_def: Option<&Arc<ObjectDefinition>>) -> Result<BinaryObject> {
        let root = XmlElement::parse(xml)?;
        Transcoder::new(config).read_element(&root, object_def, Path::new("."))
    }

    #[test]
    fn test_read_schema_less() {
        let config = Configuration::new();
        let node = read(
            &config,
            r#"<object hash="0000002A">
                 <field hash="00000001" type="BinHex">CAFE</field>
                 <field name="Name" type="String">Box</field>
                 <object name="Child"/>
               </object>"#,
            None,
        )
        .unwrap();

        assert_eq!(node.type_hash(), 0x2A);
        let values: Vec<_> = node.values().iter().collect();
        assert_eq!(values, vec![(1, &[0xCA, 0xFE][..]), (0xFE11D138, &b"Box\0"[..])]);
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].type_hash(), hash_str("Child"));
    }

    #[test]
    fn test_missing_type_uses_definition() {
        let class = Arc::new(
            ClassDefinition::new(NameHash::from_name("CEntity"))
                .with_field(FieldDefinition::new(NameHash::from_name("Count"), FieldType::UInt16)),
        );
        let object = Arc::new(ObjectDefinition::new(NameHash::from_name("Entity")).with_class(class));
        let config = Configuration::new();

        let node = read(
            &config,
            r#"<object name="Entity"><field name="Count">7</field></object>"#,
            Some(&object),
        )
        .unwrap();
        assert_eq!(node.values().get(hash_str("Count")), Some(&[7, 0][..]));

        let err = read(&config, r#"<object name="Entity"><field name="Other">7</field></object>"#, Some(&object))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Schema);
    }

    #[test]
    fn test_malformed_identity() {
        let config = Configuration::new();
        let err = read(&config, r#"<object name="E"><field type="UInt8">1</field></object>"#, None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);

        let err = read(&config, r#"<object><object name="E"/></object>"#, None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);

        let err = read(&config, r#"<object hash="XYZ"/>"#, None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Format);
    }

    #[test]
    fn test_wrong_root_element() {
        let config = Configuration::new();
        let err = read(&config, r#"<objects name="E"/>"#, None).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_unknown_field_type() {
        let config = Configuration::new();
        let err = read(&config, r#"<object name="E"><field name="A" type="Int24">1</field></object>"#, None)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Schema);
    }

    #[test]
    fn test_duplicate_field() {
        let config = Configuration::new();
        let xml = format!(
            r#"<object name="E">
                 <field name="A" type="UInt8">1</field>
                 <field hash="{:08X}" type="UInt8">2</field>
               </object>"#,
            hash_str("A")
        );
        let err = read(&config, &xml, None).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Schema);
    }

    #[test]
    fn test_stub_with_extra_content() {
        let config = Configuration::new();
        let err = read(&config, r#"<object name="E"><object external="01.xml" name="X"/></object>"#, None)
            .unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_missing_external() {
        let dir = tempfile::tempdir().unwrap();
        let root = XmlElement::parse(r#"<object name="E"><object external="missing.xml"/></object>"#).unwrap();
        let config = Configuration::new();

        let err = Transcoder::new(&config)
            .read_element(&root, None, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::External { .. }));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_nested_external_base_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/part")).unwrap();
        fs::write(dir.path().join("lib.xml"), r#"<object name="Root"><object external="part.xml"/></object>"#).unwrap();
        fs::write(dir.path().join("lib/part.xml"), r#"<object name="Part"><object external="leaf.xml"/></object>"#)
            .unwrap();
        fs::write(dir.path().join("lib/part/leaf.xml"), r#"<object name="Leaf"/>"#).unwrap();

        let config = Configuration::new();
        let root = Transcoder::new(&config)
            .read_document(dir.path().join("lib.xml"), None)
            .unwrap();

        let part = &root.children()[0];
        assert_eq!(part.type_hash(), hash_str("Part"));
        assert_eq!(part.children()[0].type_hash(), hash_str("Leaf"));
    }
}
