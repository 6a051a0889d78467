//! Loading definitions from XML files.
//!
//! A definition directory holds any number of `*.xml` files (searched
//! recursively) with a `<definitions>` root:
//!
//! ```xml
//! <definitions>
//!   <enum name="EEntityType">
//!     <element name="Static" value="0"/>
//!   </enum>
//!   <class name="CEntity" dynamic="true">
//!     <class_field name="hidEntityClass"/>
//!     <inherit name="CBase"/>
//!     <field name="hidName" type="String"/>
//!     <field name="eType" type="Enum" enum="EEntityType"/>
//!     <class name="CComponent">...</class>
//!   </class>
//!   <file name="entitylibrary">
//!     <object name="EntityLibraries">
//!       <object name="EntityLibrary" class="CEntityLibrary"/>
//!     </object>
//!   </file>
//! </definitions>
//! ```
//!
//! Every `class`, `field`, `object` and `class_field` element is identified
//! by `name` or `hash`, like the converted documents themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dunia_common::hash::hash_str;
use dunia_common::{NameHash, XmlElement};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    ClassDefinition, Configuration, EnumDefinition, Error, FieldDefinition, FieldType,
    ObjectDefinition, ObjectFileDefinition, Result,
};

/// A top-level definition element and the file it came from.
struct RawDefinition {
    source: Option<PathBuf>,
    element: XmlElement,
}

impl RawDefinition {
    fn wrap(&self, error: Error) -> Error {
        match &self.source {
            Some(path) => Error::File {
                path: path.clone(),
                source: Box::new(error),
            },
            None => error,
        }
    }
}

impl Configuration {
    /// Load every definition file beneath a directory.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_xml = path
                .extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case("xml"));
            if !entry.file_type().is_file() || !is_xml {
                continue;
            }

            let root = XmlElement::open(path).map_err(|e| Error::File {
                path: path.to_path_buf(),
                source: Box::new(e.into()),
            })?;
            documents.push((Some(path.to_path_buf()), root));
        }

        let config = Self::from_documents(documents)?;
        debug!(
            classes = config.class_count(),
            enums = config.enum_count(),
            files = config.object_file_count(),
            "loaded definitions"
        );
        Ok(config)
    }

    /// Load definitions from a single XML document.
    pub fn load_str(xml: &str) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        Self::from_documents(vec![(None, root)])
    }

    fn from_documents(documents: Vec<(Option<PathBuf>, XmlElement)>) -> Result<Self> {
        let mut enums = Vec::new();
        let mut classes = Vec::new();
        let mut files = Vec::new();

        for (source, root) in documents {
            if root.tag != "definitions" {
                debug!(?source, tag = %root.tag, "skipping non-definition document");
                continue;
            }
            for element in root.children {
                let raw = RawDefinition {
                    source: source.clone(),
                    element,
                };
                match raw.element.tag.as_str() {
                    "enum" => enums.push(raw),
                    "class" => classes.push(raw),
                    "file" => files.push(raw),
                    other => warn!(?source, tag = other, "ignoring unknown definition element"),
                }
            }
        }

        let mut config = Configuration::new();

        for raw in &enums {
            let definition = read_enum(&raw.element).map_err(|e| raw.wrap(e))?;
            config.add_enum(definition).map_err(|e| raw.wrap(e))?;
        }

        let mut raw_classes = FxHashMap::default();
        for raw in &classes {
            let id = NameHash::from_element(&raw.element).map_err(|e| raw.wrap(e.into()))?;
            if raw_classes.insert(id.hash(), raw).is_some() {
                return Err(raw.wrap(Error::DuplicateDefinition {
                    kind: "class",
                    name: id.to_string(),
                }));
            }
        }

        let (built, object_files) = {
            let mut linker = ClassLinker {
                config: &config,
                raw: raw_classes,
                built: FxHashMap::default(),
                visiting: Vec::new(),
            };

            for raw in &classes {
                let id = NameHash::from_element(&raw.element).map_err(|e| raw.wrap(e.into()))?;
                linker.class(id.hash(), &id.to_string()).map_err(|e| raw.wrap(e))?;
            }

            let mut object_files = Vec::with_capacity(files.len());
            for raw in &files {
                object_files.push(linker.file(&raw.element).map_err(|e| raw.wrap(e))?);
            }

            (linker.built, object_files)
        };

        for class in built.into_values() {
            config.insert_class(class);
        }
        for file in object_files {
            config.add_object_file(file)?;
        }

        Ok(config)
    }
}

fn read_enum(element: &XmlElement) -> Result<EnumDefinition> {
    let name = required_attribute(element, "name")?;
    let mut definition = EnumDefinition::new(name);

    for child in element.children_named("element") {
        let name = required_attribute(child, "name")?;
        let text = required_attribute(child, "value")?;
        let value = text.trim().parse::<i64>().map_err(|_| {
            Error::InvalidDefinition(format!("enum element {} has invalid value {:?}", name, text))
        })?;
        definition = definition.with_element(name, value);
    }

    Ok(definition)
}

fn required_attribute<'a>(element: &'a XmlElement, key: &str) -> Result<&'a str> {
    element
        .attribute(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::InvalidDefinition(format!("<{}> requires a {} attribute", element.tag, key)))
}

fn parse_flag(element: &XmlElement, key: &str) -> Result<bool> {
    match element.attribute(key).map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(Error::InvalidDefinition(format!("invalid {} flag {:?}", key, v))),
    }
}

/// Resolves class references (`inherit`, `class=`) across all definitions.
struct ClassLinker<'a> {
    config: &'a Configuration,
    raw: FxHashMap<u32, &'a RawDefinition>,
    built: FxHashMap<u32, Arc<ClassDefinition>>,
    /// Top-level classes currently being built, for cycle detection.
    visiting: Vec<u32>,
}

impl<'a> ClassLinker<'a> {
    fn class(&mut self, hash: u32, display: &str) -> Result<Arc<ClassDefinition>> {
        if let Some(class) = self.built.get(&hash) {
            return Ok(Arc::clone(class));
        }
        if self.visiting.contains(&hash) {
            return Err(Error::InheritanceCycle(display.to_string()));
        }
        let raw = *self
            .raw
            .get(&hash)
            .ok_or_else(|| Error::UnknownClass(display.to_string()))?;

        self.visiting.push(hash);
        let class = self.build(&raw.element);
        self.visiting.pop();

        let class = Arc::new(class?);
        self.built.insert(hash, Arc::clone(&class));
        Ok(class)
    }

    fn class_by_name(&mut self, name: &str) -> Result<Arc<ClassDefinition>> {
        self.class(hash_str(name), name)
    }

    fn build(&mut self, element: &XmlElement) -> Result<ClassDefinition> {
        let id = NameHash::from_element(element)?;
        let mut class = ClassDefinition::new(id).with_dynamic_nested_classes(parse_flag(element, "dynamic")?);

        // Inherited definitions first, so the class's own entries replace them
        for inherit in element.children_named("inherit") {
            let base = self.class_by_name(required_attribute(inherit, "name")?)?;
            for field in base.fields() {
                class.insert_field(field.clone());
            }
            for nested in base.nested_classes() {
                class.insert_nested_class(Arc::clone(nested));
            }
            if class.discriminator().is_none() {
                class.set_discriminator(base.discriminator().cloned());
            }
        }

        let mut own_discriminator = false;
        for child in &element.children {
            match child.tag.as_str() {
                "class_field" => {
                    if own_discriminator {
                        return Err(Error::InvalidDefinition(format!(
                            "class {} declares more than one class_field",
                            class.id()
                        )));
                    }
                    own_discriminator = true;
                    class.set_discriminator(Some(NameHash::from_element(child)?));
                }
                "field" => class.insert_field(self.field(child)?),
                "class" => {
                    let nested = self.build(child)?;
                    class.insert_nested_class(Arc::new(nested));
                }
                "inherit" => {}
                other => warn!(class = %class.id(), tag = other, "ignoring unknown element in class"),
            }
        }

        Ok(class)
    }

    fn field(&self, element: &XmlElement) -> Result<FieldDefinition> {
        let id = NameHash::from_element(element)?;
        let field_type: FieldType = required_attribute(element, "type")?.parse()?;
        let enum_name = element.attribute("enum").filter(|v| !v.trim().is_empty());

        match (field_type, enum_name) {
            (FieldType::Enum, Some(name)) => {
                let definition = self
                    .config
                    .enum_definition(name)
                    .ok_or_else(|| Error::UnknownEnum(name.to_string()))?;
                Ok(FieldDefinition::enumeration(id, Arc::clone(definition)))
            }
            (FieldType::Enum, None) => Err(Error::InvalidDefinition(format!(
                "enum field {} requires an enum attribute",
                id
            ))),
            (_, Some(_)) => Err(Error::InvalidDefinition(format!(
                "field {} of type {} cannot reference an enum",
                id, field_type
            ))),
            (_, None) => Ok(FieldDefinition::new(id, field_type)),
        }
    }

    fn object(&mut self, element: &XmlElement) -> Result<ObjectDefinition> {
        let mut object = ObjectDefinition::new(NameHash::from_element(element)?);

        if let Some(class_name) = element.attribute("class").filter(|v| !v.trim().is_empty()) {
            object = object.with_class(self.class_by_name(class_name)?);
        }

        for child in &element.children {
            match child.tag.as_str() {
                "class_field" => object = object.with_discriminator(NameHash::from_element(child)?),
                "object" => object = object.with_nested_object(self.object(child)?),
                other => warn!(object = %object.id(), tag = other, "ignoring unknown element in object"),
            }
        }

        Ok(object)
    }

    fn file(&mut self, element: &XmlElement) -> Result<ObjectFileDefinition> {
        let name = required_attribute(element, "name")?;
        let mut objects = element.children_named("object");
        let object = objects.next().map(|o| self.object(o)).transpose()?;
        if objects.next().is_some() {
            return Err(Error::InvalidDefinition(format!(
                "file {} declares more than one root object",
                name
            )));
        }
        Ok(ObjectFileDefinition::new(name, object))
    }
}
