//! Insertion-ordered field value map.

use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Raw field values of an object, keyed by field-name hash.
///
/// Iteration follows insertion order, which is the order values are written
/// back out. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    entries: Vec<(u32, Vec<u8>)>,
    index: FxHashMap<u32, usize>,
}

impl FieldValues {
    /// Create an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty value map with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Append a value. Fails if the hash is already present.
    pub fn insert(&mut self, hash: u32, value: Vec<u8>) -> Result<()> {
        if self.index.contains_key(&hash) {
            return Err(Error::DuplicateField(hash));
        }
        self.index.insert(hash, self.entries.len());
        self.entries.push((hash, value));
        Ok(())
    }

    /// Look up a value by field hash.
    pub fn get(&self, hash: u32) -> Option<&[u8]> {
        self.index
            .get(&hash)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Check whether a field hash is present.
    pub fn contains(&self, hash: u32) -> bool {
        self.index.contains_key(&hash)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no values.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(hash, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.entries.iter().map(|(h, v)| (*h, v.as_slice()))
    }
}

// Equality is on the ordered pairs; the index is derived state.
impl PartialEq for FieldValues {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FieldValues {}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldValues {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldValues {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Vec::<(u32, Vec<u8>)>::deserialize(deserializer)?;
        let mut values = FieldValues::with_capacity(entries.len());
        for (hash, value) in entries {
            values.insert(hash, value).map_err(serde::de::Error::custom)?;
        }
        Ok(values)
    }
}
