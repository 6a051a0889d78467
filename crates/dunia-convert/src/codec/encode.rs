use std::str::FromStr;

use dunia_schema::{EnumDefinition, FieldType};

use crate::{Error, Result};

/// Parse field text into a payload of `field_type`.
pub(super) fn encode_value(field_type: FieldType, enum_def: Option<&EnumDefinition>, text: &str) -> Result<Vec<u8>> {
    let invalid = || Error::InvalidFieldValue {
        field_type,
        text: text.to_string(),
    };
    let trimmed = text.trim();

    let bytes = match field_type {
        FieldType::BinHex => {
            let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(digits).map_err(|_| invalid())?
        }
        FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => vec![1],
            "false" | "0" => vec![0],
            _ => return Err(invalid()),
        },
        FieldType::Int8 => parse::<i8>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::UInt8 => parse::<u8>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Int16 => parse::<i16>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::UInt16 => parse::<u16>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Int32 => parse::<i32>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::UInt32 => parse::<u32>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Int64 => parse::<i64>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::UInt64 => parse::<u64>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Float32 => parse::<f32>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Float64 => parse::<f64>(trimmed).ok_or_else(invalid)?.to_le_bytes().to_vec(),
        FieldType::Vector2 | FieldType::Vector3 | FieldType::Vector4 | FieldType::Quaternion => {
            let components = trimmed
                .split(',')
                .map(|c| parse::<f32>(c.trim()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?;
            if Some(components.len() * 4) != field_type.fixed_size() {
                return Err(invalid());
            }
            components.iter().flat_map(|c| c.to_le_bytes()).collect()
        }
        FieldType::String => {
            let mut bytes = Vec::with_capacity(text.len() + 1);
            bytes.extend_from_slice(text.as_bytes());
            bytes.push(0);
            bytes
        }
        FieldType::Enum => {
            let value = match enum_def.and_then(|e| e.value_of(trimmed)) {
                Some(value) => i32::try_from(value).ok(),
                None => parse::<i32>(trimmed),
            };
            value.ok_or_else(invalid)?.to_le_bytes().to_vec()
        }
        FieldType::Hash32 => u32::from_str_radix(trimmed, 16)
            .map_err(|_| invalid())?
            .to_le_bytes()
            .to_vec(),
        FieldType::Hash64 => u64::from_str_radix(trimmed, 16)
            .map_err(|_| invalid())?
            .to_le_bytes()
            .to_vec(),
    };

    Ok(bytes)
}

fn parse<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}
