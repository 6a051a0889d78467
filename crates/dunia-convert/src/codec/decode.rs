use dunia_common::BinaryReader;
use dunia_schema::{EnumDefinition, FieldType};

use crate::{Error, Result};

/// Render a payload as text. The payload must have exactly the width of
/// `field_type`.
pub(super) fn decode_value(field_type: FieldType, enum_def: Option<&EnumDefinition>, bytes: &[u8]) -> Result<String> {
    let invalid = || Error::InvalidFieldPayload {
        field_type,
        size: bytes.len(),
    };

    if let Some(size) = field_type.fixed_size() {
        if bytes.len() != size {
            return Err(invalid());
        }
    }

    let mut reader = BinaryReader::new(bytes);
    let text = match field_type {
        FieldType::BinHex => hex::encode_upper(bytes),
        FieldType::Boolean => match reader.read_u8()? {
            0 => "false".to_string(),
            1 => "true".to_string(),
            _ => return Err(invalid()),
        },
        FieldType::Int8 => reader.read_i8()?.to_string(),
        FieldType::UInt8 => reader.read_u8()?.to_string(),
        FieldType::Int16 => reader.read_i16()?.to_string(),
        FieldType::UInt16 => reader.read_u16()?.to_string(),
        FieldType::Int32 => reader.read_i32()?.to_string(),
        FieldType::UInt32 => reader.read_u32()?.to_string(),
        FieldType::Int64 => reader.read_i64()?.to_string(),
        FieldType::UInt64 => reader.read_u64()?.to_string(),
        FieldType::Float32 => reader.read_f32()?.to_string(),
        FieldType::Float64 => reader.read_f64()?.to_string(),
        FieldType::Vector2 | FieldType::Vector3 | FieldType::Vector4 | FieldType::Quaternion => {
            let mut components = Vec::with_capacity(4);
            while !reader.is_empty() {
                components.push(reader.read_f32()?.to_string());
            }
            components.join(",")
        }
        FieldType::String => {
            let Some((0, body)) = bytes.split_last() else {
                return Err(invalid());
            };
            let text = std::str::from_utf8(body).map_err(|_| invalid())?;
            if text.chars().any(|c| c == '\0' || (c.is_control() && !matches!(c, '\t' | '\n' | '\r'))) {
                return Err(invalid());
            }
            text.to_string()
        }
        FieldType::Enum => {
            let value = reader.read_i32()?;
            enum_def
                .and_then(|e| e.name_of(i64::from(value)))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string())
        }
        FieldType::Hash32 => format!("{:08X}", reader.read_u32()?),
        FieldType::Hash64 => format!("{:016X}", reader.read_u64()?),
    };

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(decode_value(FieldType::Boolean, None, &[0]).unwrap(), "false");
        assert_eq!(decode_value(FieldType::Int16, None, &[0xFE, 0xFF]).unwrap(), "-2");
        assert_eq!(decode_value(FieldType::Float32, None, &1.0f32.to_le_bytes()).unwrap(), "1");
        assert_eq!(decode_value(FieldType::Hash32, None, &[0x38, 0xD1, 0x11, 0xFE]).unwrap(), "FE11D138");
        assert_eq!(
            decode_value(FieldType::Hash64, None, &1u64.to_le_bytes()).unwrap(),
            "0000000000000001"
        );
    }

    #[test]
    fn test_vectors() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.5, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(decode_value(FieldType::Vector3, None, &bytes).unwrap(), "1,-2.5,0");
        assert!(decode_value(FieldType::Vector4, None, &bytes).is_err());
    }

    #[test]
    fn test_bad_payloads() {
        assert!(matches!(
            decode_value(FieldType::UInt32, None, &[1, 2]),
            Err(Error::InvalidFieldPayload { size: 2, .. })
        ));
        assert!(decode_value(FieldType::Boolean, None, &[7]).is_err());
        // Missing terminator, embedded NUL, invalid UTF-8
        assert!(decode_value(FieldType::String, None, b"abc").is_err());
        assert!(decode_value(FieldType::String, None, b"a\0b\0").is_err());
        assert!(decode_value(FieldType::String, None, &[0xFF, 0]).is_err());
        assert_eq!(decode_value(FieldType::String, None, b"\0").unwrap(), "");
    }
}
