//! Schemasheet support
//!
//! A schemasheet is a TSV rendering of a `LinkML` schema. The first row names
//! the columns, the second row (starting with `>`) maps each column to a
//! metaslot, and every further row describes one class, one slot of a class,
//! or one free-standing slot.
//!
//! ```text
//! slot        class   description       examples values
//! > slot      class   description       examples: {inner_key: "value", internal_separator: "|"}
//!             Person  A human being
//! id          Person  Unique identifier  P:1|P:2
//! ```
//!
//! ## Modules
//!
//! - `types`: Column and table configuration
//! - `exporter`: Writes a schema as a schemasheet
//! - `config`: Exporter settings

pub mod config;
pub mod exporter;
pub mod types;

pub use config::ExportConfig;
pub use exporter::{CLASS_ELEMENT, SLOT_ELEMENT, SchemaExporter};
pub use types::{ColumnConfig, ColumnSettings, DESCRIPTOR_MARKER, TableConfig};
