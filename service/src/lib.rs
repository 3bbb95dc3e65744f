//! # LinkML Sheet Template
//!
//! Derives a schemasheet template from the `LinkML` metamodel and populates
//! it with a source schema.
//!
//! A schemasheet is a TSV file in which each row describes a class or a slot
//! and each column a metaslot. Which metaslots can be columns depends on the
//! metamodel: a metaslot whose range is a type, an enum, or a class with an
//! identifier fits in one cell; most others do not. This crate works that
//! out and writes the populated sheet.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linkml_core::config::TemplateConfig;
//! use linkml_service::loader::{SchemaLoader, SchemaSource};
//! use linkml_service::schema_view::SchemaView;
//! use linkml_service::schemasheets::SchemaExporter;
//! use linkml_service::template::TemplateGenerator;
//!
//! # async fn example() -> linkml_core::error::Result<()> {
//! let config = TemplateConfig::default();
//! let loader = SchemaLoader::new(config.loader.clone())?;
//! let meta = SchemaView::load(&loader, &SchemaSource::parse("meta.yaml")?).await?;
//! let source = SchemaView::load(&loader, &SchemaSource::parse("person.yaml")?).await?;
//!
//! let generated = TemplateGenerator::new(config).generate(&meta, &source)?;
//! SchemaExporter::new()
//!     .export(&source, &generated.table, "person.tsv")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`loader`]: Schema documents from files and URLs
//! - [`parser`]: Import closure resolution
//! - [`schema_view`]: Class ancestry and induced slots
//! - [`template`]: Metamodel analysis and column selection
//! - [`schemasheets`]: Table configuration and TSV export
//! - [`staging`]: Local copy of the merged metamodel
//! - [`cli`]: The `linkml2schemasheets-template` command

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // LinkML, TSV, YAML are proper nouns
#![allow(clippy::missing_panics_doc)]

/// Schema loading
pub mod loader;

/// Import resolution
pub mod parser;

/// Schema introspection
pub mod schema_view;

/// Template derivation
pub mod template;

/// Schemasheet model and export
pub mod schemasheets;

/// Metamodel staging
pub mod staging;

/// Command-line interface
pub mod cli;

pub use loader::{SchemaLoader, SchemaSource};
pub use schema_view::SchemaView;
pub use schemasheets::{SchemaExporter, TableConfig};
pub use template::{GeneratedTemplate, TemplateGenerator, TemplateReport};
