//! Error types for schema definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when building or loading a schema.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] dunia_common::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Field type text that names no known field type.
    #[error("unknown field type {0:?}")]
    UnknownFieldType(String),

    /// A field references an enum that is not defined.
    #[error("unknown enum {0:?}")]
    UnknownEnum(String),

    /// A definition references a class that is not defined.
    #[error("unknown class {0:?}")]
    UnknownClass(String),

    /// A class inherits from itself, directly or indirectly.
    #[error("inheritance cycle through class {0}")]
    InheritanceCycle(String),

    /// Two top-level definitions share a key.
    #[error("duplicate {kind} definition {name}")]
    DuplicateDefinition { kind: &'static str, name: String },

    /// A definition element is malformed.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    /// Error while loading a specific definition file.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;
