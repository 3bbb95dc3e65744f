//! Summary of a template derivation

use std::path::Path;

use indexmap::IndexMap;
use linkml_core::config::ReportStyle;
use linkml_core::error::Result;
use serde::Serialize;

use super::analysis::{Classification, SlotScan};
use super::discovery::SourceUsage;
use crate::schemasheets::TableConfig;

/// A metamodel slot no column can represent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntemplateableSlot {
    /// Induced range
    pub range: Option<String>,
    /// Whether the slot is multivalued
    pub multivalued: Option<bool>,
}

/// What was discovered and decided while deriving a template
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateReport {
    /// Column selection used
    pub report_style: ReportStyle,
    /// Metaslots the source schema uses, boilerplate first
    pub discovered_metaslots: Vec<String>,
    /// Annotation tags the source schema uses
    pub discovered_annotations: Vec<String>,
    /// Range classes with an identifier slot
    pub identifiables: IndexMap<String, String>,
    /// Slots skipped because of the blacklist
    pub blacklisted: Vec<String>,
    /// Slots no column can represent
    pub untemplateables: IndexMap<String, UntemplateableSlot>,
    /// Number of metamodel slots scanned
    pub scanned_slots: usize,
    /// Header of the generated table
    pub columns: Vec<String>,
}

impl TemplateReport {
    /// Collect the report from the pipeline's intermediate results
    #[must_use]
    pub fn new(
        report_style: ReportStyle,
        usage: &SourceUsage,
        scan: &SlotScan,
        classification: &Classification,
        table: &TableConfig,
    ) -> Self {
        let untemplateables = classification
            .untemplateable()
            .into_iter()
            .filter_map(|name| {
                scan.entries.get(name).map(|entry| {
                    (
                        name.to_string(),
                        UntemplateableSlot {
                            range: entry.range.clone(),
                            multivalued: entry.multivalued,
                        },
                    )
                })
            })
            .collect();

        Self {
            report_style,
            discovered_metaslots: usage.metaslots.clone(),
            discovered_annotations: usage.annotations.clone(),
            identifiables: classification.identifiables.clone(),
            blacklisted: classification
                .blacklisted()
                .into_iter()
                .map(String::from)
                .collect(),
            untemplateables,
            scanned_slots: scan.len(),
            columns: table.header(),
        }
    }

    /// Number of generated columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The report as YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the report as YAML, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, self.to_yaml()?).await?;
        Ok(())
    }
}
