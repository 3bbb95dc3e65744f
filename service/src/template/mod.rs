//! Schemasheet template derivation
//!
//! Given the `LinkML` metamodel and a source schema, decide which metaslots
//! can be rendered as schemasheet columns and build the table configuration
//! that exports the source schema with those columns.
//!
//! The pipeline runs in four steps:
//!
//! 1. [`discover_source_usage`] collects what the source schema uses.
//! 2. [`scan_metamodel`] collects the slots of the metamodel's root classes.
//! 3. [`classify`] sorts them by whether a cell can hold their value.
//! 4. [`TemplateBuilder`] turns the result into a [`TableConfig`].

pub mod analysis;
pub mod builder;
pub mod discovery;
pub mod report;

pub use analysis::{
    Classification, SlotCategory, SlotScan, SlotScanEntry, classify, scan_metamodel,
};
pub use builder::{ANNOTATIONS_METASLOT, TemplateBuilder};
pub use discovery::{SourceUsage, discover_source_usage, tabulate_unique_values};
pub use report::{TemplateReport, UntemplateableSlot};

use linkml_core::config::TemplateConfig;
use linkml_core::error::Result;
use tracing::info;

use crate::schema_view::SchemaView;
use crate::schemasheets::TableConfig;

/// A derived table configuration and the report describing it
#[derive(Debug, Clone)]
pub struct GeneratedTemplate {
    /// Table configuration for the exporter
    pub table: TableConfig,
    /// What was discovered on the way
    pub report: TemplateReport,
}

/// Runs the whole derivation
pub struct TemplateGenerator {
    config: TemplateConfig,
}

impl TemplateGenerator {
    /// Create a generator
    #[must_use]
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// Generator configuration
    #[must_use]
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Derive the template for `source_view` from `meta_view`
    ///
    /// # Errors
    ///
    /// Returns an error if a root class is missing from the metamodel or a
    /// slot cannot be resolved in either schema.
    pub fn generate(
        &self,
        meta_view: &SchemaView,
        source_view: &SchemaView,
    ) -> Result<GeneratedTemplate> {
        let usage = discover_source_usage(source_view, &self.config)?;
        let scan = scan_metamodel(meta_view, &self.config.root_classes)?;
        let classification = classify(&scan, meta_view, &self.config)?;
        let table = TemplateBuilder::new(meta_view, &self.config).build(&classification, &usage)?;

        info!(
            columns = table.columns.len(),
            untemplateable = classification.untemplateable().len(),
            style = ?self.config.report_style,
            "derived template"
        );

        let report = TemplateReport::new(
            self.config.report_style,
            &usage,
            &scan,
            &classification,
            &table,
        );
        Ok(GeneratedTemplate { table, report })
    }
}
