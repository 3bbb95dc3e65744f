//! Assembles the schemasheet table configuration

use linkml_core::config::{ColumnSettingsSpec, ReportStyle, TemplateConfig};
use linkml_core::error::Result;
use tracing::{debug, warn};

use super::analysis::Classification;
use super::discovery::SourceUsage;
use crate::schema_view::SchemaView;
use crate::schemasheets::{
    CLASS_ELEMENT, ColumnConfig, ColumnSettings, SLOT_ELEMENT, TableConfig,
};

/// Metamodel slot holding annotations
pub const ANNOTATIONS_METASLOT: &str = "annotations";

/// Builds a [`TableConfig`] from a classified metamodel
pub struct TemplateBuilder<'a> {
    meta_view: &'a SchemaView,
    config: &'a TemplateConfig,
    report_style: ReportStyle,
}

impl<'a> TemplateBuilder<'a> {
    /// Create a builder using the configured report style
    #[must_use]
    pub fn new(meta_view: &'a SchemaView, config: &'a TemplateConfig) -> Self {
        Self {
            meta_view,
            config,
            report_style: config.report_style,
        }
    }

    /// Override the report style
    #[must_use]
    pub fn with_report_style(mut self, report_style: ReportStyle) -> Self {
        self.report_style = report_style;
        self
    }

    /// Build the table
    ///
    /// Columns come in this order: boilerplate, columns that need settings,
    /// one per annotation tag, then templateable metaslots sorted by name.
    /// A later column with an existing key replaces the earlier one in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a metamodel slot cannot be resolved.
    pub fn build(
        &self,
        classification: &Classification,
        usage: &SourceUsage,
    ) -> Result<TableConfig> {
        let concise = self.report_style == ReportStyle::Concise;
        let mut table = TableConfig::default();

        for element in [SLOT_ELEMENT, CLASS_ELEMENT] {
            table
                .column_by_element_type
                .insert(element.to_string(), element.to_string());
        }

        for name in &self.config.boilerplate_columns {
            table
                .columns
                .insert(name.clone(), ColumnConfig::element_type(name));
        }

        for (key, spec) in &self.config.requires_column_settings {
            if concise && !usage.uses_metaslot(&spec.name) {
                debug!(column = %key, "unused by source; omitted");
                continue;
            }
            table.columns.insert(key.clone(), self.settings_column(spec)?);
        }

        for tag in &usage.annotations {
            table.columns.insert(
                tag.clone(),
                ColumnConfig::metaslot(
                    ANNOTATIONS_METASLOT,
                    ANNOTATIONS_METASLOT,
                    self.meta_view.get_slot(ANNOTATIONS_METASLOT).cloned(),
                    ColumnSettings::with_inner_key(tag.as_str()),
                ),
            );
        }

        for name in classification.templateable() {
            if concise && !usage.uses_metaslot(name) {
                continue;
            }
            let metaslot = self.meta_view.get_slot(name).cloned();
            let settings = if metaslot.as_ref().is_some_and(|m| m.is_multivalued()) {
                ColumnSettings::with_separator(self.config.default_internal_separator.as_str())
            } else {
                ColumnSettings::default()
            };
            table.columns.insert(
                name.to_string(),
                ColumnConfig::metaslot(name.replace(' ', "_"), name, metaslot, settings),
            );
        }

        debug!(columns = table.columns.len(), style = ?self.report_style, "built table");
        Ok(table)
    }

    fn settings_column(&self, spec: &ColumnSettingsSpec) -> Result<ColumnConfig> {
        let mut settings = ColumnSettings {
            internal_separator: spec.internal_separator.clone(),
            ..ColumnSettings::default()
        };
        let mut inner_key_metaslot = None;

        if let Some((slot, class)) = spec.inner_key() {
            settings.inner_key = Some(slot.to_string());
            if self.meta_view.get_class(class).is_some() {
                inner_key_metaslot = Some(self.meta_view.induced_slot(slot, class)?);
            } else {
                warn!(column = %spec.name, class, "inner key class not in metamodel");
            }
        }

        let mut column = ColumnConfig::metaslot(
            spec.name.as_str(),
            spec.name.as_str(),
            self.meta_view.get_slot(&spec.name).cloned(),
            settings,
        );
        column.inner_key_metaslot = inner_key_metaslot;
        Ok(column)
    }
}
