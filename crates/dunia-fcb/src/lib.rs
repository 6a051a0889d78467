//! Binary object trees and the FCB container format.
//!
//! Dunia engine object files (`.fcb`, `.obj`, `.lib`) store a tree of
//! objects. Each object has a 32-bit type hash, an ordered set of raw field
//! values keyed by field-name hash, and an ordered list of child objects.
//! Nothing in the file says what the hashes mean or how the values are
//! typed; that knowledge lives in an external schema.
//!
//! # Example
//!
//! ```no_run
//! use dunia_fcb::BinaryObjectFile;
//!
//! let file = BinaryObjectFile::read_file("entitylibrary.fcb")?;
//! println!("root {:08X} with {} children", file.root.type_hash(), file.root.children().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod header;
mod object;
mod reader;
mod values;
mod writer;

pub use error::{Error, Result};
pub use file::BinaryObjectFile;
pub use header::FcbHeader;
pub use object::BinaryObject;
pub use values::FieldValues;
