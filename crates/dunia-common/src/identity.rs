//! Name-or-hash identity.

use std::fmt;

use crate::hash::{format_hash, hash_str};
use crate::{Error, Result, XmlElement};

/// The identity of a named entity: a canonical 32-bit hash plus the name it
/// was computed from, when that name is known.
///
/// XML elements carry exactly one of `name="..."` or `hash="XXXXXXXX"`. When a
/// name is given the hash is derived from it; a bare hash keeps no name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameHash {
    name: Option<String>,
    hash: u32,
}

impl NameHash {
    /// Identity derived from a symbolic name.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let hash = hash_str(&name);
        Self {
            name: Some(name),
            hash,
        }
    }

    /// Identity with no known name.
    pub const fn from_hash(hash: u32) -> Self {
        Self { name: None, hash }
    }

    /// Resolve a `name`/`hash` attribute pair.
    ///
    /// The name wins when both are present. Blank values count as absent.
    /// `element` is only used for the error message.
    pub fn resolve(name: Option<&str>, hash: Option<&str>, element: &str) -> Result<Self> {
        let name = name.filter(|n| !n.trim().is_empty());
        let hash = hash.filter(|h| !h.trim().is_empty());

        match (name, hash) {
            (Some(name), _) => Ok(Self::from_name(name)),
            (None, Some(hash)) => parse_hash(hash).map(Self::from_hash),
            (None, None) => Err(Error::MissingIdentity {
                element: element.to_string(),
            }),
        }
    }

    /// Resolve the identity of an XML element from its attributes.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        Self::resolve(
            element.attribute("name"),
            element.attribute("hash"),
            &element.tag,
        )
    }

    /// The symbolic name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The canonical hash.
    pub const fn hash(&self) -> u32 {
        self.hash
    }

    /// The hash as it is written in `hash` attributes.
    pub fn display_hash(&self) -> String {
        format_hash(self.hash)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:08X}", self.hash),
        }
    }
}

/// Parse a hexadecimal hash attribute (no `0x` prefix, at most 8 digits).
pub(crate) fn parse_hash(text: &str) -> Result<u32> {
    let text = text.trim();
    if text.is_empty() || text.len() > 8 {
        return Err(Error::InvalidHash(text.to_string()));
    }
    u32::from_str_radix(text, 16).map_err(|_| Error::InvalidHash(text.to_string()))
}
