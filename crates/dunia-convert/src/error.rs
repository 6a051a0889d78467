//! Error types for conversion.

use std::path::PathBuf;

use dunia_schema::FieldType;
use thiserror::Error;

/// Errors that abort a conversion.
///
/// Missing class or field definitions are not errors; they fall back to raw
/// hashes and `BinHex`.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error (identity, XML parsing).
    #[error("{0}")]
    Common(#[from] dunia_common::Error),

    /// Binary object error.
    #[error("{0}")]
    Fcb(#[from] dunia_fcb::Error),

    /// Schema error.
    #[error("{0}")]
    Schema(#[from] dunia_schema::Error),

    /// An external reference points at a file that cannot be read.
    #[error("cannot read external object {}: {source}", .path.display())]
    External {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document structure is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// A node lacks the discriminator field its definition requires.
    #[error("object {object} has no value for discriminator field {field}")]
    MissingDiscriminator { object: String, field: String },

    /// A discriminator field does not hold a class hash.
    #[error("discriminator field {field} has invalid value {text:?}")]
    InvalidDiscriminator { field: String, text: String },

    /// Field text that cannot be parsed as its declared type.
    #[error("invalid {field_type} value {text:?}")]
    InvalidFieldValue { field_type: FieldType, text: String },

    /// Raw field bytes that do not hold a value of the declared type.
    #[error("{size} byte payload is not a valid {field_type} value")]
    InvalidFieldPayload { field_type: FieldType, size: usize },

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classes of conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed identity or document structure.
    Format,
    /// Schema information that is required could not be produced.
    Schema,
    /// File system failure.
    Io,
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io(_) | Self::External { .. } => ErrorCategory::Io,
            Self::Common(e) => match e {
                dunia_common::Error::Io(_) => ErrorCategory::Io,
                _ => ErrorCategory::Format,
            },
            Self::Fcb(e) => match e {
                dunia_fcb::Error::Io(_) => ErrorCategory::Io,
                dunia_fcb::Error::DuplicateField(_) => ErrorCategory::Schema,
                _ => ErrorCategory::Format,
            },
            Self::Schema(e) => match e {
                dunia_schema::Error::Io(_) | dunia_schema::Error::Walk(_) => ErrorCategory::Io,
                _ => ErrorCategory::Schema,
            },
            Self::MissingDiscriminator { .. }
            | Self::InvalidDiscriminator { .. }
            | Self::InvalidFieldValue { .. } => ErrorCategory::Schema,
            Self::Format(_) | Self::InvalidFieldPayload { .. } | Self::Xml(_) => ErrorCategory::Format,
        }
    }
}
