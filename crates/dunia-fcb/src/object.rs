//! Binary object tree node.

use crate::{FieldValues, Result};

/// A node in a binary object tree.
///
/// The type hash is fixed at construction. Values and children are filled in
/// once while a tree is being built; a parent exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryObject {
    type_hash: u32,
    values: FieldValues,
    children: Vec<BinaryObject>,
}

impl BinaryObject {
    /// Create an empty object of the given type.
    pub fn new(type_hash: u32) -> Self {
        Self {
            type_hash,
            values: FieldValues::new(),
            children: Vec::new(),
        }
    }

    /// The object's type hash.
    pub fn type_hash(&self) -> u32 {
        self.type_hash
    }

    /// The object's field values.
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// The object's children.
    pub fn children(&self) -> &[BinaryObject] {
        &self.children
    }

    /// Add a field value. Fails if the field is already set.
    pub fn insert_value(&mut self, hash: u32, value: Vec<u8>) -> Result<()> {
        self.values.insert(hash, value)
    }

    /// Builder-style [`insert_value`](Self::insert_value).
    pub fn with_value(mut self, hash: u32, value: impl Into<Vec<u8>>) -> Result<Self> {
        self.insert_value(hash, value.into())?;
        Ok(self)
    }

    /// Append a child object.
    pub fn push_child(&mut self, child: BinaryObject) {
        self.children.push(child);
    }

    /// Builder-style [`push_child`](Self::push_child).
    pub fn with_child(mut self, child: BinaryObject) -> Self {
        self.push_child(child);
        self
    }

    /// Number of objects in this subtree, including this one.
    pub fn total_objects(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_objects()).sum::<usize>()
    }

    /// Number of field values in this subtree.
    pub fn total_values(&self) -> usize {
        self.values.len() + self.children.iter().map(|c| c.total_values()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let tree = BinaryObject::new(1)
            .with_value(10, vec![1, 2])
            .unwrap()
            .with_child(BinaryObject::new(2).with_value(20, vec![]).unwrap())
            .with_child(BinaryObject::new(3).with_child(BinaryObject::new(4)));

        assert_eq!(tree.total_objects(), 4);
        assert_eq!(tree.total_values(), 2);
        assert_eq!(tree.children()[1].children()[0].type_hash(), 4);
    }

    #[test]
    fn test_structural_equality() {
        let a = BinaryObject::new(1).with_child(BinaryObject::new(2));
        let b = BinaryObject::new(1).with_child(BinaryObject::new(2));
        let c = BinaryObject::new(1).with_child(BinaryObject::new(3));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
