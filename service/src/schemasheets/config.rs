//! Configuration for the schemasheet exporter

use serde::{Deserialize, Serialize};

/// Exporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter, tab for TSV
    pub delimiter: char,

    /// Separator for multivalued cells whose column sets none
    pub default_internal_separator: String,

    /// Emit rows for schema-level slots that no class uses
    pub include_unused_slots: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            default_internal_separator: "|".to_string(),
            include_unused_slots: true,
        }
    }
}

impl ExportConfig {
    /// Delimiter as the single byte the CSV writer expects
    ///
    /// Non-ASCII delimiters fall back to tab.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b'\t')
    }
}
