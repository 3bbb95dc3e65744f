//! Export of a schema into a schemasheet
//!
//! Output is a header row, the descriptor row, then one row per class, one
//! row per slot declared on that class (values from the slot as induced in
//! the class), and one row per schema slot no class uses.

use std::io::Write;
use std::path::Path;

use linkml_core::error::{LinkMLError, Result};
use linkml_core::types::{ClassDefinition, Element};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::config::ExportConfig;
use super::types::{ColumnConfig, ColumnSettings, TableConfig};
use crate::schema_view::SchemaView;

/// Element type name for class rows
pub const CLASS_ELEMENT: &str = "class";

/// Element type name for slot rows
pub const SLOT_ELEMENT: &str = "slot";

/// Writes schemas as schemasheets
#[derive(Debug, Clone, Default)]
pub struct SchemaExporter {
    config: ExportConfig,
}

// One element of a sheet row
struct RowSubject<'a> {
    class: Option<&'a str>,
    slot: Option<&'a str>,
    values: Map<String, Value>,
}

impl SchemaExporter {
    /// Exporter with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter with custom settings
    #[must_use]
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Exporter settings
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Write the schemasheet to `path`, creating parent directories
    ///
    /// Returns the number of data rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be built or the file cannot be written.
    pub async fn export(
        &self,
        view: &SchemaView,
        table: &TableConfig,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        let rows = self.export_to_writer(view, table, &mut buffer)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, buffer).await?;
        info!(path = %path.display(), rows, "wrote schemasheet");
        Ok(rows)
    }

    /// Write the schemasheet to any writer
    ///
    /// Returns the number of data rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if a row cannot be built or written.
    pub fn export_to_writer<W: Write>(
        &self,
        view: &SchemaView,
        table: &TableConfig,
        writer: W,
    ) -> Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter_byte())
            .has_headers(false)
            .from_writer(writer);

        let write_err = |e: csv::Error| LinkMLError::serialization(format!("failed to write row: {e}"));

        csv_writer.write_record(table.header()).map_err(write_err)?;
        csv_writer
            .write_record(table.descriptor_row())
            .map_err(write_err)?;

        let rows = self.rows(view, table)?;
        for row in &rows {
            csv_writer.write_record(row).map_err(write_err)?;
        }
        csv_writer.flush()?;
        Ok(rows.len())
    }

    /// Data rows, without header and descriptor
    ///
    /// # Errors
    ///
    /// Returns an error if a class slot cannot be induced.
    pub fn rows(&self, view: &SchemaView, table: &TableConfig) -> Result<Vec<Vec<String>>> {
        let root = view.root_schema();
        let mut rows = Vec::new();

        for (class_name, class) in &root.classes {
            rows.push(self.render_row(
                table,
                &RowSubject {
                    class: Some(class_name),
                    slot: None,
                    values: class.metaslot_values()?,
                },
            ));

            for slot_name in declared_slots(class) {
                let induced = view.induced_slot(slot_name, class_name)?;
                rows.push(self.render_row(
                    table,
                    &RowSubject {
                        class: Some(class_name),
                        slot: Some(slot_name),
                        values: induced.metaslot_values()?,
                    },
                ));
            }
        }

        if self.config.include_unused_slots {
            for (slot_name, slot) in &root.slots {
                let used = root
                    .classes
                    .values()
                    .any(|c| declared_slots(c).any(|s| s == slot_name));
                if used {
                    continue;
                }
                debug!(slot = %slot_name, "slot not used by any class");
                rows.push(self.render_row(
                    table,
                    &RowSubject {
                        class: None,
                        slot: Some(slot_name),
                        values: slot.metaslot_values()?,
                    },
                ));
            }
        }

        Ok(rows)
    }

    fn render_row(&self, table: &TableConfig, subject: &RowSubject<'_>) -> Vec<String> {
        let class_column = table.element_column(CLASS_ELEMENT);
        let slot_column = table.element_column(SLOT_ELEMENT);

        table
            .columns
            .iter()
            .map(|(key, column)| {
                if Some(key.as_str()) == class_column {
                    subject.class.unwrap_or_default().to_string()
                } else if Some(key.as_str()) == slot_column {
                    subject.slot.unwrap_or_default().to_string()
                } else if column.is_element_type {
                    String::new()
                } else {
                    subject
                        .values
                        .get(&column.maps_to)
                        .map(|value| self.render_cell(value, column))
                        .unwrap_or_default()
                }
            })
            .collect()
    }

    /// Render one metaslot value for a column
    #[must_use]
    pub fn render_cell(&self, value: &Value, column: &ColumnConfig) -> String {
        let settings = &column.settings;
        match value {
            Value::Array(items) => {
                let separator = settings
                    .internal_separator
                    .as_deref()
                    .unwrap_or(&self.config.default_internal_separator);
                items
                    .iter()
                    .map(|item| render_value(item, settings))
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(separator)
            }
            other => render_value(other, settings),
        }
    }
}

/// Slots declared directly on a class: `slots`, then `attributes`
fn declared_slots(class: &ClassDefinition) -> impl Iterator<Item = &String> {
    let attributes = class
        .attributes
        .keys()
        .filter(|name| !class.slots.contains(name));
    class.slots.iter().chain(attributes)
}

fn render_value(value: &Value, settings: &ColumnSettings) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => strip_prefix(s, settings),
        Value::Array(items) => items
            .iter()
            .map(|item| render_value(item, settings))
            .collect::<Vec<_>>()
            .join(settings.internal_separator.as_deref().unwrap_or("|")),
        Value::Object(map) => render_object(map, settings),
    }
}

fn render_object(map: &Map<String, Value>, settings: &ColumnSettings) -> String {
    if let Some(inner_key) = &settings.inner_key {
        return match map.get(inner_key) {
            // Annotation bodies are {tag, value}
            Some(Value::Object(inner)) if inner.contains_key("value") => {
                render_value(&inner["value"], &ColumnSettings::default())
            }
            Some(inner) => render_value(inner, &ColumnSettings::default()),
            None => String::new(),
        };
    }
    if map.contains_key("tag") {
        if let Some(value) = map.get("value") {
            return render_value(value, settings);
        }
    }
    Value::Object(map.clone()).to_string()
}

fn strip_prefix(value: &str, settings: &ColumnSettings) -> String {
    settings
        .curie_prefix
        .as_deref()
        .and_then(|prefix| value.strip_prefix(prefix))
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(value)
        .to_string()
}
