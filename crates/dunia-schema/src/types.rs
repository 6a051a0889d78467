//! Field value types.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The type of a field value, as named in `type="..."` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    /// Raw bytes rendered as hex. Always available.
    BinHex,
    /// Boolean stored as one byte.
    Boolean,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Two 32-bit floats.
    Vector2,
    /// Three 32-bit floats.
    Vector3,
    /// Four 32-bit floats.
    Vector4,
    /// Four 32-bit floats (x, y, z, w).
    Quaternion,
    /// NUL-terminated UTF-8 string.
    String,
    /// Signed 32-bit value with symbolic names from an enum definition.
    Enum,
    /// 32-bit hash.
    Hash32,
    /// 64-bit hash.
    Hash64,
}

impl FieldType {
    /// All field types.
    pub const ALL: [FieldType; 20] = [
        Self::BinHex,
        Self::Boolean,
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::Vector2,
        Self::Vector3,
        Self::Vector4,
        Self::Quaternion,
        Self::String,
        Self::Enum,
        Self::Hash32,
        Self::Hash64,
    ];

    /// Get the string name for this field type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BinHex => "BinHex",
            Self::Boolean => "Boolean",
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Quaternion => "Quaternion",
            Self::String => "String",
            Self::Enum => "Enum",
            Self::Hash32 => "Hash32",
            Self::Hash64 => "Hash64",
        }
    }

    /// Size in bytes of a value of this type, or `None` for variable-size types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Boolean | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 | Self::Enum | Self::Hash32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::Hash64 => Some(8),
            Self::Vector2 => Some(8),
            Self::Vector3 => Some(12),
            Self::Vector4 | Self::Quaternion => Some(16),
            Self::BinHex | Self::String => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    /// Parse a field type name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownFieldType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("UInt32".parse::<FieldType>().unwrap(), FieldType::UInt32);
        assert_eq!("binhex".parse::<FieldType>().unwrap(), FieldType::BinHex);
        assert_eq!("VECTOR3".parse::<FieldType>().unwrap(), FieldType::Vector3);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!("Float128".parse::<FieldType>(), Err(Error::UnknownFieldType(_))));
        assert!(matches!("".parse::<FieldType>(), Err(Error::UnknownFieldType(_))));
    }

    #[test]
    fn test_display_parses_back() {
        for t in FieldType::ALL {
            assert_eq!(t.to_string().parse::<FieldType>().unwrap(), t);
        }
    }
}
