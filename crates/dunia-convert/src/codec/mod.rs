//! Field value conversion between XML text and raw bytes.

mod decode;
mod encode;

use dunia_common::XmlElement;
use dunia_schema::{FieldDefinition, FieldType};

use crate::Result;

/// Converts a single field value between its XML text form and the raw bytes
/// stored in a [`BinaryObject`](dunia_fcb::BinaryObject).
///
/// `field_def` is the schema definition when one is known. `BinHex` never
/// needs one.
pub trait FieldCodec {
    /// Produce the raw payload of a `field` element.
    fn encode(
        &self,
        field_def: Option<&FieldDefinition>,
        field_type: FieldType,
        element: &XmlElement,
    ) -> Result<Vec<u8>>;

    /// Render a raw payload as the text content of a `field` element.
    fn decode(&self, field_def: Option<&FieldDefinition>, field_type: FieldType, bytes: &[u8]) -> Result<String>;
}

/// Little-endian codec for every [`FieldType`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldCodec;

impl FieldCodec for DefaultFieldCodec {
    fn encode(
        &self,
        field_def: Option<&FieldDefinition>,
        field_type: FieldType,
        element: &XmlElement,
    ) -> Result<Vec<u8>> {
        let enum_def = field_def.and_then(|f| f.enum_definition());
        encode::encode_value(field_type, enum_def, &element.text)
    }

    fn decode(&self, field_def: Option<&FieldDefinition>, field_type: FieldType, bytes: &[u8]) -> Result<String> {
        let enum_def = field_def.and_then(|f| f.enum_definition());
        decode::decode_value(field_type, enum_def, bytes)
    }
}
