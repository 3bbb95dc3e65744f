//! Configuration types for template generation
//!
//! Every table the analysis depends on lives here with its stock value as
//! the default, so a YAML file only needs to name what it changes.

use crate::error::{LinkMLError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for template generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Metamodel classes whose induced slots are scanned for columns
    pub root_classes: Vec<String>,

    /// Element-type columns that lead every template
    pub boilerplate_columns: Vec<String>,

    /// Slots that never become columns even when their range is templatable
    pub blacklist: Vec<String>,

    /// Columns rescued from the untemplateable bucket by explicit settings
    pub requires_column_settings: IndexMap<String, ColumnSettingsSpec>,

    /// Separator used for multivalued cells
    pub default_internal_separator: String,

    /// Which columns to emit
    pub report_style: ReportStyle,

    /// Schema loading configuration
    pub loader: LoaderConfig,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let mut requires_column_settings = IndexMap::new();
        requires_column_settings.insert(
            "examples values".to_string(),
            ColumnSettingsSpec::with_inner_key("examples", "value", "example"),
        );
        requires_column_settings.insert(
            "structured_pattern".to_string(),
            ColumnSettingsSpec::with_inner_key("structured_pattern", "syntax", "pattern_expression"),
        );
        requires_column_settings.insert(
            "unit symbol".to_string(),
            ColumnSettingsSpec::with_inner_key("unit", "symbol", "UnitOfMeasure"),
        );

        Self {
            root_classes: vec!["slot_definition".to_string(), "class_definition".to_string()],
            boilerplate_columns: vec!["slot".to_string(), "class".to_string()],
            blacklist: ["attributes", "slot_usage", "name", "instantiates", "slots"]
                .into_iter()
                .map(String::from)
                .collect(),
            requires_column_settings,
            default_internal_separator: "|".to_string(),
            report_style: ReportStyle::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl TemplateConfig {
    /// Load a configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkMLError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded template configuration");
        Ok(config)
    }

    /// Parse a configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| LinkMLError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency
    ///
    /// # Errors
    ///
    /// Returns an error naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.root_classes.is_empty() {
            return Err(LinkMLError::config("root_classes must not be empty"));
        }
        for (key, spec) in &self.requires_column_settings {
            if spec.name.is_empty() {
                return Err(LinkMLError::config(format!(
                    "requires_column_settings '{key}' has an empty name"
                )));
            }
            if spec.inner_key_slot.is_some() != spec.inner_key_class.is_some() {
                tracing::warn!(
                    column = %key,
                    "inner key needs both a slot and a class; it will be ignored"
                );
            }
        }
        if self.loader.max_import_depth == 0 {
            return Err(LinkMLError::config("loader.max_import_depth must be at least 1"));
        }
        Ok(())
    }

    /// Whether a metamodel slot name is blacklisted
    #[must_use]
    pub fn is_blacklisted(&self, slot_name: &str) -> bool {
        self.blacklist.iter().any(|b| b == slot_name)
    }
}

/// Settings for a column whose metaslot needs an inner key or separator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSettingsSpec {
    /// Metaslot the column maps to
    pub name: String,

    /// Slot of the range class whose value fills the cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_key_slot: Option<String>,

    /// Range class holding `inner_key_slot`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_key_class: Option<String>,

    /// Separator for multiple values in one cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_separator: Option<String>,
}

impl ColumnSettingsSpec {
    /// Settings with an inner key and the stock `|` separator
    #[must_use]
    pub fn with_inner_key(name: &str, slot: &str, class: &str) -> Self {
        Self {
            name: name.to_string(),
            inner_key_slot: Some(slot.to_string()),
            inner_key_class: Some(class.to_string()),
            internal_separator: Some("|".to_string()),
        }
    }

    /// The inner key slot and class, when both are given
    #[must_use]
    pub fn inner_key(&self) -> Option<(&str, &str)> {
        match (&self.inner_key_slot, &self.inner_key_class) {
            (Some(slot), Some(class)) => Some((slot.as_str(), class.as_str())),
            _ => None,
        }
    }
}

/// Column selection strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Every templatable metamodel slot gets a column
    #[default]
    Exhaustive,
    /// Only metaslots the source schema actually uses get a column
    Concise,
}

/// Schema loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Base URL that `linkml:` imports expand against
    pub linkml_base_url: String,

    /// Timeout for fetching a remote schema
    #[serde(with = "humantime_serde")]
    pub import_timeout: Duration,

    /// Maximum import nesting
    pub max_import_depth: usize,

    /// Merge imported schemas into the loaded one
    pub merge_imports: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            linkml_base_url: "https://w3id.org/linkml/".to_string(),
            import_timeout: Duration::from_secs(30),
            max_import_depth: 32,
            merge_imports: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::default();
        assert_eq!(config.root_classes, vec!["slot_definition", "class_definition"]);
        assert_eq!(config.boilerplate_columns, vec!["slot", "class"]);
        assert!(config.is_blacklisted("slot_usage"));
        assert!(!config.is_blacklisted("range"));
        assert_eq!(
            config.requires_column_settings.keys().collect::<Vec<_>>(),
            vec!["examples values", "structured_pattern", "unit symbol"]
        );
        assert_eq!(
            config.requires_column_settings["unit symbol"].inner_key(),
            Some(("symbol", "UnitOfMeasure"))
        );
        assert_eq!(config.report_style, ReportStyle::Exhaustive);
        assert_eq!(config.loader.import_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = TemplateConfig::from_yaml_str(
            r"
report_style: concise
blacklist: [name]
loader:
  import_timeout: 5s
",
        )
        .unwrap();
        assert_eq!(config.report_style, ReportStyle::Concise);
        assert_eq!(config.blacklist, vec!["name"]);
        assert_eq!(config.loader.import_timeout, Duration::from_secs(5));
        assert_eq!(config.loader.max_import_depth, 32);
        assert_eq!(config.requires_column_settings.len(), 3);
    }

    #[test]
    fn test_validation_rejects_empty_roots() {
        let err = TemplateConfig::from_yaml_str("root_classes: []").unwrap_err();
        assert!(err.to_string().contains("root_classes"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_internal_separator: ';'").unwrap();
        let config = TemplateConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.default_internal_separator, ";");
    }
}
