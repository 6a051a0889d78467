//! Error types for binary object files.

use thiserror::Error;

/// Errors that can occur when reading or writing binary object files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] dunia_common::Error),

    /// Unsupported container version.
    #[error("unsupported FCB version: {0} (expected 3)")]
    UnsupportedVersion(u16),

    /// A field hash occurs twice within one object.
    #[error("duplicate field {0:08X} in object")]
    DuplicateField(u32),

    /// An object back-reference points outside the objects read so far.
    #[error("object reference {index} out of bounds (objects read: {count})")]
    ObjectReferenceOutOfBounds { index: u32, count: usize },

    /// A value back-reference points before the start of the data.
    #[error("value reference {offset} at position {position} points outside the data")]
    ValueReferenceOutOfBounds { offset: u32, position: usize },

    /// A back-reference appeared where only a plain count is valid.
    #[error("unexpected reference at position {0}")]
    UnexpectedReference(usize),
}

/// Result type for binary object file operations.
pub type Result<T> = std::result::Result<T, Error>;
