//! Schema-driven conversion between binary object trees and XML.
//!
//! Binary object files only store hashes. Converting them to readable XML
//! (and back) needs a [`Configuration`](dunia_schema::Configuration) that
//! names classes and fields and says how field values are typed. This crate
//! walks a [`BinaryObject`](dunia_fcb::BinaryObject) tree or an XML document
//! and produces the other, resolving every node's class on the way:
//!
//! - [`ClassResolver`] - decides which class definition governs a node and
//!   which object definition applies to each child
//! - [`FieldCodec`] - converts typed field values between XML text and raw bytes
//! - [`Transcoder`] - the recursive XML reader and writer, including splitting
//!   large entity libraries into one file per entity
//!
//! Anything the schema does not describe still converts: unknown objects keep
//! their raw hash and unknown fields are written as `BinHex`.
//!
//! # Example
//!
//! ```no_run
//! use dunia_convert::Transcoder;
//! use dunia_fcb::BinaryObjectFile;
//! use dunia_schema::Configuration;
//!
//! let config = Configuration::load("definitions")?;
//! let transcoder = Transcoder::new(&config);
//! let object_def = transcoder.object_definition_for("entitylibrary");
//!
//! let file = BinaryObjectFile::read_file("entitylibrary.fcb")?;
//! transcoder.write_document(&file.root, object_def.as_ref(), "entitylibrary.xml", "entitylibrary")?;
//!
//! let root = transcoder.read_document("entitylibrary.xml", object_def.as_ref())?;
//! assert_eq!(root, file.root);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod error;
mod resolver;
mod transcoder;

pub use codec::{DefaultFieldCodec, FieldCodec};
pub use error::{Error, ErrorCategory, Result};
pub use resolver::{ClassResolver, DiscriminatorSource};
pub use transcoder::split::{
    is_split_candidate, ordinal_file_name, ENTITY_LIBRARIES_HASH, ENTITY_LIBRARY_HASH, NAME_FIELD_HASH,
};
pub use transcoder::{TranscodeOptions, Transcoder};
