//! The schema registry.

use std::sync::Arc;

use dunia_common::hash::hash_str;
use rustc_hash::FxHashMap;

use crate::{ClassDefinition, EnumDefinition, Error, ObjectFileDefinition, Result};

/// Registry of every known class, enum and object file definition.
///
/// Built once, then only read. It is `Send + Sync`, so one registry can be
/// shared by conversions running in parallel.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    classes: FxHashMap<u32, Arc<ClassDefinition>>,
    enums: FxHashMap<String, Arc<EnumDefinition>>,
    object_files: FxHashMap<String, Arc<ObjectFileDefinition>>,
}

impl Configuration {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level class definition.
    pub fn add_class(&mut self, class: ClassDefinition) -> Result<Arc<ClassDefinition>> {
        let class = Arc::new(class);
        if self.classes.contains_key(&class.hash()) {
            return Err(Error::DuplicateDefinition {
                kind: "class",
                name: class.id().to_string(),
            });
        }
        self.classes.insert(class.hash(), Arc::clone(&class));
        Ok(class)
    }

    /// Register an enum definition.
    pub fn add_enum(&mut self, definition: EnumDefinition) -> Result<Arc<EnumDefinition>> {
        if self.enums.contains_key(definition.name()) {
            return Err(Error::DuplicateDefinition {
                kind: "enum",
                name: definition.name().to_string(),
            });
        }
        let definition = Arc::new(definition);
        self.enums
            .insert(definition.name().to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Register an object file definition. Names are case-insensitive.
    pub fn add_object_file(&mut self, file: ObjectFileDefinition) -> Result<Arc<ObjectFileDefinition>> {
        let key = file.name().to_lowercase();
        if self.object_files.contains_key(&key) {
            return Err(Error::DuplicateDefinition {
                kind: "file",
                name: file.name().to_string(),
            });
        }
        let file = Arc::new(file);
        self.object_files.insert(key, Arc::clone(&file));
        Ok(file)
    }

    pub(crate) fn insert_class(&mut self, class: Arc<ClassDefinition>) {
        self.classes.insert(class.hash(), class);
    }

    /// Look up a top-level class by hash.
    pub fn class_definition(&self, hash: u32) -> Option<&Arc<ClassDefinition>> {
        self.classes.get(&hash)
    }

    /// Look up a top-level class by name.
    pub fn class_definition_by_name(&self, name: &str) -> Option<&Arc<ClassDefinition>> {
        self.class_definition(hash_str(name))
    }

    /// Look up an enum by name.
    pub fn enum_definition(&self, name: &str) -> Option<&Arc<EnumDefinition>> {
        self.enums.get(name)
    }

    /// Look up an object file definition by base name, ignoring case.
    pub fn object_file_definition(&self, name: &str) -> Option<&Arc<ObjectFileDefinition>> {
        self.object_files.get(&name.to_lowercase())
    }

    /// Number of top-level classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of enums.
    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// Number of object file definitions.
    pub fn object_file_count(&self) -> usize {
        self.object_files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NameHash, ObjectDefinition};

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Configuration>();
    }

    #[test]
    fn test_class_lookup() {
        let mut config = Configuration::new();
        config
            .add_class(ClassDefinition::new(NameHash::from_name("CEntity")))
            .unwrap();

        assert!(config.class_definition_by_name("CEntity").is_some());
        assert!(config.class_definition(hash_str("CEntity")).is_some());
        assert!(config.class_definition(0).is_none());
    }

    #[test]
    fn test_duplicate_class() {
        let mut config = Configuration::new();
        config
            .add_class(ClassDefinition::new(NameHash::from_name("CEntity")))
            .unwrap();
        let result = config.add_class(ClassDefinition::new(NameHash::from_hash(hash_str("CEntity"))));
        assert!(matches!(result, Err(Error::DuplicateDefinition { kind: "class", .. })));
    }

    #[test]
    fn test_object_file_lookup_ignores_case() {
        let mut config = Configuration::new();
        config
            .add_object_file(ObjectFileDefinition::new(
                "EntityLibrary",
                Some(ObjectDefinition::new(NameHash::from_name("EntityLibraries"))),
            ))
            .unwrap();

        let file = config.object_file_definition("entitylibrary").unwrap();
        assert_eq!(file.object_definition().unwrap().name(), Some("EntityLibraries"));
        assert!(config.object_file_definition("worldsectors").is_none());
    }
}
