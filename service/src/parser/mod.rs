//! Schema import handling
//!
//! Parsing of individual documents lives in [`crate::loader`]; this module
//! walks the import closure and merges it.

pub mod import_resolver;

pub use import_resolver::{ImportResolver, merge_schema};
