//! Class, field, enum and object definitions.

use std::sync::Arc;

use dunia_common::NameHash;
use rustc_hash::FxHashMap;

use crate::FieldType;

/// Symbolic names for the values of an enum-backed field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDefinition {
    name: String,
    elements: Vec<(String, i64)>,
}

impl EnumDefinition {
    /// Create an enum with no elements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Add an element.
    pub fn with_element(mut self, name: impl Into<String>, value: i64) -> Self {
        self.elements.push((name.into(), value));
        self
    }

    /// The enum's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elements in declaration order.
    pub fn elements(&self) -> &[(String, i64)] {
        &self.elements
    }

    /// The value of a named element.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.elements
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// The first element name with the given value.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.elements
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }
}

/// Definition of a single field of a class.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    id: NameHash,
    field_type: FieldType,
    enum_definition: Option<Arc<EnumDefinition>>,
}

impl FieldDefinition {
    /// Create a field definition.
    pub fn new(id: NameHash, field_type: FieldType) -> Self {
        Self {
            id,
            field_type,
            enum_definition: None,
        }
    }

    /// Create an enum-backed field definition.
    pub fn enumeration(id: NameHash, enum_definition: Arc<EnumDefinition>) -> Self {
        Self {
            id,
            field_type: FieldType::Enum,
            enum_definition: Some(enum_definition),
        }
    }

    /// The field's identity.
    pub fn id(&self) -> &NameHash {
        &self.id
    }

    /// The field's name, if known.
    pub fn name(&self) -> Option<&str> {
        self.id.name()
    }

    /// The field's hash.
    pub fn hash(&self) -> u32 {
        self.id.hash()
    }

    /// The declared value type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The enum definition of an enum-backed field.
    pub fn enum_definition(&self) -> Option<&EnumDefinition> {
        self.enum_definition.as_deref()
    }
}

/// Definition of a class: its fields, and how the types of its children are
/// found.
///
/// A class either has a fixed table of nested classes, or (when
/// `dynamic_nested_classes` is set) accepts children of any registered
/// top-level class, chosen by each child's own type hash.
///
/// A discriminator field, when present, names a field whose value is the hash
/// of the class that really governs an instance.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    id: NameHash,
    dynamic_nested_classes: bool,
    discriminator: Option<NameHash>,
    fields: FxHashMap<u32, FieldDefinition>,
    nested_classes: FxHashMap<u32, Arc<ClassDefinition>>,
}

impl ClassDefinition {
    /// Create a class with no fields.
    pub fn new(id: NameHash) -> Self {
        Self {
            id,
            dynamic_nested_classes: false,
            discriminator: None,
            fields: FxHashMap::default(),
            nested_classes: FxHashMap::default(),
        }
    }

    /// Set whether children are resolved against the global class table.
    pub fn with_dynamic_nested_classes(mut self, dynamic: bool) -> Self {
        self.dynamic_nested_classes = dynamic;
        self
    }

    /// Set the discriminator field.
    pub fn with_discriminator(mut self, field: NameHash) -> Self {
        self.discriminator = Some(field);
        self
    }

    /// Add a field definition, replacing any with the same hash.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.insert_field(field);
        self
    }

    /// Add a nested class definition, replacing any with the same hash.
    pub fn with_nested_class(mut self, class: ClassDefinition) -> Self {
        self.insert_nested_class(Arc::new(class));
        self
    }

    pub(crate) fn set_discriminator(&mut self, field: Option<NameHash>) {
        self.discriminator = field;
    }

    pub(crate) fn insert_field(&mut self, field: FieldDefinition) {
        self.fields.insert(field.hash(), field);
    }

    pub(crate) fn insert_nested_class(&mut self, class: Arc<ClassDefinition>) {
        self.nested_classes.insert(class.hash(), class);
    }

    /// The class identity.
    pub fn id(&self) -> &NameHash {
        &self.id
    }

    /// The class name, if known.
    pub fn name(&self) -> Option<&str> {
        self.id.name()
    }

    /// The class hash.
    pub fn hash(&self) -> u32 {
        self.id.hash()
    }

    /// Whether children are resolved against the global class table.
    pub fn dynamic_nested_classes(&self) -> bool {
        self.dynamic_nested_classes
    }

    /// The discriminator field, if any.
    pub fn discriminator(&self) -> Option<&NameHash> {
        self.discriminator.as_ref()
    }

    /// Look up a field definition by hash.
    pub fn field(&self, hash: u32) -> Option<&FieldDefinition> {
        self.fields.get(&hash)
    }

    /// Iterate over field definitions (unordered).
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Look up a nested class definition by hash.
    pub fn nested_class(&self, hash: u32) -> Option<&Arc<ClassDefinition>> {
        self.nested_classes.get(&hash)
    }

    /// Iterate over nested class definitions (unordered).
    pub fn nested_classes(&self) -> impl Iterator<Item = &Arc<ClassDefinition>> {
        self.nested_classes.values()
    }
}

/// Schema entry for an object in a file: optionally bound to a class, with
/// its own discriminator and table of nested objects.
///
/// When a child's schema is looked up, the class's nested classes are tried
/// before the object's nested objects.
#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    id: NameHash,
    class_definition: Option<Arc<ClassDefinition>>,
    discriminator: Option<NameHash>,
    nested_objects: FxHashMap<u32, Arc<ObjectDefinition>>,
}

impl ObjectDefinition {
    /// Create an object definition with no class.
    pub fn new(id: NameHash) -> Self {
        Self {
            id,
            class_definition: None,
            discriminator: None,
            nested_objects: FxHashMap::default(),
        }
    }

    /// A transient object definition standing for a class: same identity,
    /// no object-level discriminator or nesting.
    pub fn from_class(class: &Arc<ClassDefinition>) -> Self {
        Self {
            id: class.id().clone(),
            class_definition: Some(Arc::clone(class)),
            discriminator: None,
            nested_objects: FxHashMap::default(),
        }
    }

    /// Bind a class definition.
    pub fn with_class(mut self, class: Arc<ClassDefinition>) -> Self {
        self.class_definition = Some(class);
        self
    }

    /// Set the discriminator field.
    pub fn with_discriminator(mut self, field: NameHash) -> Self {
        self.discriminator = Some(field);
        self
    }

    /// Add a nested object definition, replacing any with the same hash.
    pub fn with_nested_object(mut self, object: ObjectDefinition) -> Self {
        self.nested_objects.insert(object.hash(), Arc::new(object));
        self
    }

    /// The object identity.
    pub fn id(&self) -> &NameHash {
        &self.id
    }

    /// The object name, if known.
    pub fn name(&self) -> Option<&str> {
        self.id.name()
    }

    /// The object hash.
    pub fn hash(&self) -> u32 {
        self.id.hash()
    }

    /// The bound class definition, if any.
    pub fn class_definition(&self) -> Option<&Arc<ClassDefinition>> {
        self.class_definition.as_ref()
    }

    /// The discriminator field, if any.
    pub fn discriminator(&self) -> Option<&NameHash> {
        self.discriminator.as_ref()
    }

    /// Look up a nested object definition by hash.
    pub fn nested_object(&self, hash: u32) -> Option<&Arc<ObjectDefinition>> {
        self.nested_objects.get(&hash)
    }
}

/// Schema for a kind of file, keyed by base name (e.g. `entitylibrary`).
#[derive(Debug, Clone)]
pub struct ObjectFileDefinition {
    name: String,
    object_definition: Option<Arc<ObjectDefinition>>,
}

impl ObjectFileDefinition {
    /// Create a file definition.
    pub fn new(name: impl Into<String>, object_definition: Option<ObjectDefinition>) -> Self {
        Self {
            name: name.into(),
            object_definition: object_definition.map(Arc::new),
        }
    }

    /// The file's base name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The root object definition.
    pub fn object_definition(&self) -> Option<&Arc<ObjectDefinition>> {
        self.object_definition.as_ref()
    }
}
