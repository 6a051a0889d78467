//! Error types for dunia-common.

use thiserror::Error;

/// Common error type for Dunia operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Invalid magic value encountered.
    #[error("invalid magic: expected {expected:#010X}, got {actual:#010X}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// An element carries neither a `name` nor a `hash` attribute.
    #[error("<{element}> element has neither a name nor a hash attribute")]
    MissingIdentity { element: String },

    /// A `hash` attribute is not a 32-bit hexadecimal number.
    #[error("invalid hash attribute {0:?}")]
    InvalidHash(String),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
