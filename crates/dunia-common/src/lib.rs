//! Common utilities for Dunia tools.
//!
//! This crate provides the foundational pieces shared by the binary object
//! converter crates:
//!
//! - [`hash`] - CRC-32 name hashing used for every persistent identifier
//! - [`NameHash`] - the dual name-or-hash identity carried by XML elements
//! - [`BinaryReader`] - Zero-copy binary reading from byte slices
//! - [`XmlElement`] - A small owned XML element tree

mod error;
mod identity;
mod reader;
mod xml;

pub mod hash;

pub use error::{Error, Result};
pub use identity::NameHash;
pub use reader::BinaryReader;
pub use xml::XmlElement;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
