//! # `LinkML` Sheet Template Core
//!
//! Core types for deriving schemasheet templates from the `LinkML` metamodel.
//!
//! This crate holds the schema data model, the error type and the
//! configuration that drives the template analysis. Loading, introspection
//! and export live in the service crate.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(missing_docs)] // Documentation is covered by module-level docs

/// Core error types for `LinkML` operations
pub mod error;

/// Type definitions for `LinkML` schemas
pub mod types;

/// Configuration types for template generation
pub mod config;

// Re-export commonly used types
pub use config::{ColumnSettingsSpec, LoaderConfig, ReportStyle, TemplateConfig};
pub use error::{LinkMLError, Result};
pub use serde_json::Value;
pub use types::{ClassDefinition, Element, SchemaDefinition, SlotDefinition};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::{LinkMLError, Result};
    pub use crate::types::*;
}
