//! Table configuration for schemasheets
//!
//! A schemasheet has a header row of column names followed by a descriptor
//! row (first cell prefixed with `>`) that says which metaslot each column
//! maps to. Columns that need more than a plain value carry settings in the
//! descriptor, e.g. `examples: {inner_key: "value", internal_separator: "|"}`.

use indexmap::IndexMap;
use linkml_core::types::SlotDefinition;
use serde::{Deserialize, Serialize};

/// Marker that opens the descriptor row
pub const DESCRIPTOR_MARKER: &str = ">";

/// Per-column rendering settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSettings {
    /// Separator placed between multiple values in one cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_separator: Option<String>,

    /// Key selecting one value out of a map or object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_key: Option<String>,

    /// CURIE prefix stripped from values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curie_prefix: Option<String>,
}

impl ColumnSettings {
    /// Settings with only a separator
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            internal_separator: Some(separator.into()),
            ..Self::default()
        }
    }

    /// Settings with only an inner key
    #[must_use]
    pub fn with_inner_key(inner_key: impl Into<String>) -> Self {
        Self {
            inner_key: Some(inner_key.into()),
            ..Self::default()
        }
    }

    /// Whether no setting is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.internal_separator.is_none() && self.inner_key.is_none() && self.curie_prefix.is_none()
    }

    // Rendered as a YAML flow mapping; JSON strings are valid YAML scalars
    fn descriptor_entries(&self) -> Vec<String> {
        [
            ("inner_key", &self.inner_key),
            ("internal_separator", &self.internal_separator),
            ("curie_prefix", &self.curie_prefix),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value.as_ref().map(|v| {
                let quoted = serde_json::to_string(v).unwrap_or_else(|_| format!("\"{v}\""));
                format!("{key}: {quoted}")
            })
        })
        .collect()
    }
}

/// Configuration of one template column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Column name
    pub name: String,

    /// Metaslot (or element type) the column maps to
    pub maps_to: String,

    /// Whether the column holds element names rather than metaslot values
    #[serde(default)]
    pub is_element_type: bool,

    /// Metamodel definition of the mapped metaslot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaslot: Option<SlotDefinition>,

    /// Metamodel definition of the slot selected by `inner_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_key_metaslot: Option<SlotDefinition>,

    /// Rendering settings
    #[serde(default)]
    pub settings: ColumnSettings,
}

impl ColumnConfig {
    /// Column holding the names of one element type
    #[must_use]
    pub fn element_type(name: &str) -> Self {
        Self {
            name: name.to_string(),
            maps_to: name.to_string(),
            is_element_type: true,
            ..Self::default()
        }
    }

    /// Column holding the values of a metaslot
    #[must_use]
    pub fn metaslot(
        name: impl Into<String>,
        maps_to: impl Into<String>,
        metaslot: Option<SlotDefinition>,
        settings: ColumnSettings,
    ) -> Self {
        Self {
            name: name.into(),
            maps_to: maps_to.into(),
            is_element_type: false,
            metaslot,
            inner_key_metaslot: None,
            settings,
        }
    }

    /// Whether the mapped metaslot is multivalued in the metamodel
    #[must_use]
    pub fn is_multivalued(&self) -> bool {
        self.metaslot.as_ref().is_some_and(SlotDefinition::is_multivalued)
    }

    /// Descriptor cell for this column
    #[must_use]
    pub fn descriptor(&self) -> String {
        let entries = self.settings.descriptor_entries();
        if self.is_element_type || entries.is_empty() {
            self.maps_to.clone()
        } else {
            format!("{}: {{{}}}", self.maps_to, entries.join(", "))
        }
    }
}

/// Configuration of a whole schemasheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Element type name → key of the column holding those element names
    pub column_by_element_type: IndexMap<String, String>,

    /// Columns keyed by header text, in output order
    pub columns: IndexMap<String, ColumnConfig>,
}

impl TableConfig {
    /// Key of the column that names elements of `element_type`
    #[must_use]
    pub fn element_column(&self, element_type: &str) -> Option<&str> {
        self.column_by_element_type
            .get(element_type)
            .map(String::as_str)
    }

    /// Header row
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Descriptor row, first cell prefixed with `>`
    #[must_use]
    pub fn descriptor_row(&self) -> Vec<String> {
        self.columns
            .values()
            .enumerate()
            .map(|(i, column)| {
                let descriptor = column.descriptor();
                if i == 0 {
                    format!("{DESCRIPTOR_MARKER} {descriptor}")
                } else {
                    descriptor
                }
            })
            .collect()
    }
}
