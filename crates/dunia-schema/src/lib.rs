//! Schema definitions for Dunia binary object files.
//!
//! Binary object files only carry 32-bit hashes. This crate holds the
//! human-authored knowledge that gives those hashes meaning:
//!
//! - [`ClassDefinition`] - fields, nested classes and polymorphism rules of a class
//! - [`FieldDefinition`] - name and [`FieldType`] of a field
//! - [`EnumDefinition`] - symbolic names for enum-backed fields
//! - [`ObjectDefinition`] - the schema entry point for a kind of file
//! - [`Configuration`] - the registry indexing all of the above by hash
//!
//! A [`Configuration`] is either built in code or loaded from a directory of
//! definition files with [`Configuration::load`].

mod configuration;
mod definition;
mod error;
mod loader;
mod types;

pub use configuration::Configuration;
pub use definition::{
    ClassDefinition, EnumDefinition, FieldDefinition, ObjectDefinition, ObjectFileDefinition,
};
pub use error::{Error, Result};
pub use types::FieldType;

pub use dunia_common::NameHash;
