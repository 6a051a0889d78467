//! Dunia - binary object file conversion library.
//!
//! This crate provides a unified interface to the Dunia library ecosystem
//! for working with FCB binary object files and their XML form.
//!
//! # Crates
//!
//! - [`dunia_common`] - Common utilities (binary reading, name hashes, XML tree)
//! - [`dunia_fcb`] - FCB binary object file reading and writing
//! - [`dunia_schema`] - Class, enum and object file definitions
//! - [`dunia_convert`] - Schema-driven conversion between object trees and XML
//!
//! # Example
//!
//! ```no_run
//! use dunia::prelude::*;
//!
//! let config = Configuration::load("definitions")?;
//! let transcoder = Transcoder::new(&config);
//! let object_def = transcoder.object_definition_for("entitylibrary");
//!
//! // Binary to XML, one file per entity under `entitylibrary/`
//! let file = BinaryObjectFile::read_file("entitylibrary.fcb")?;
//! transcoder.write_document(&file.root, object_def.as_ref(), "entitylibrary.xml", "entitylibrary")?;
//!
//! // And back
//! let root = transcoder.read_document("entitylibrary.xml", object_def.as_ref())?;
//! BinaryObjectFile::new(root).write_file("entitylibrary_converted.fcb")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use dunia_common as common;
pub use dunia_convert as convert;
pub use dunia_fcb as fcb;
pub use dunia_schema as schema;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use dunia_common::{hash, BinaryReader, NameHash, XmlElement};
    pub use dunia_convert::{DefaultFieldCodec, FieldCodec, TranscodeOptions, Transcoder};
    pub use dunia_fcb::{BinaryObject, BinaryObjectFile};
    pub use dunia_schema::{
        ClassDefinition, Configuration, EnumDefinition, FieldDefinition, FieldType, ObjectDefinition,
        ObjectFileDefinition,
    };
}

// Re-export commonly used types at the crate root
pub use dunia_convert::Transcoder;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
