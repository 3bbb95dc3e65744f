//! Metamodel slot scan and classification
//!
//! Every slot of the metamodel's root classes is sorted into one of a few
//! categories depending on whether a schemasheet cell can hold its value.

use indexmap::IndexMap;
use linkml_core::config::TemplateConfig;
use linkml_core::error::Result;
use serde::Serialize;
use tracing::{debug, info};

use super::discovery::tabulate_unique_values;
use crate::schema_view::SchemaView;

/// What the scan records about one metamodel slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotScanEntry {
    /// Induced range
    pub range: Option<String>,

    /// Whether the slot is multivalued
    pub multivalued: Option<bool>,

    /// Whether the range is a type
    pub type_range: bool,
}

/// Induced slots of the root classes, first definition of each name kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotScan {
    /// Entries in discovery order
    pub entries: IndexMap<String, SlotScanEntry>,
}

impl SlotScan {
    /// Number of scanned slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was scanned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the induced slots of each root class, in sorted class order
///
/// # Errors
///
/// Returns an error if a root class is not in the metamodel.
pub fn scan_metamodel(meta_view: &SchemaView, root_classes: &[String]) -> Result<SlotScan> {
    let mut roots = root_classes.to_vec();
    roots.sort();

    let mut scan = SlotScan::default();
    for root in &roots {
        for induced in meta_view.class_induced_slots(root)? {
            let entry = SlotScanEntry {
                type_range: induced.range.as_deref().is_some_and(|r| meta_view.is_type(r)),
                range: induced.range,
                multivalued: induced.multivalued,
            };
            if let Some(existing) = scan.entries.get(&induced.name) {
                if *existing != entry {
                    debug!(slot = %induced.name, class = %root, "keeping first definition");
                }
                continue;
            }
            scan.entries.insert(induced.name, entry);
        }
    }
    info!(roots = ?roots, slots = scan.len(), "scanned metamodel");
    Ok(scan)
}

/// How a metamodel slot fits into a schemasheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SlotCategory {
    /// Range is a type or an enum
    Direct,
    /// Range is a class referenced through its identifier
    ViaIdentifier {
        /// Range class
        range: String,
        /// Identifier slot of the range class
        identifier: String,
    },
    /// Range has an identifier but the slot is excluded
    Blacklisted {
        /// Range class
        range: String,
    },
    /// Needs an inner key or separator from configuration
    RequiresSettings,
    /// No cell can hold the value
    Untemplateable,
}

impl SlotCategory {
    /// Whether a plain column represents the slot
    #[must_use]
    pub fn is_templateable(&self) -> bool {
        matches!(self, Self::Direct | Self::ViaIdentifier { .. })
    }
}

/// Result of classifying a slot scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    /// Category of every scanned slot, in scan order
    pub categories: IndexMap<String, SlotCategory>,

    /// Non-type, non-enum ranges with their slot counts
    pub range_counts: Vec<(String, usize)>,

    /// Ranges that have an identifier slot, mapped to it
    pub identifiables: IndexMap<String, String>,
}

impl Classification {
    /// Slots with a plain column, sorted by name
    #[must_use]
    pub fn templateable(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .categories
            .iter()
            .filter(|(_, category)| category.is_templateable())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Slots in one category, in scan order
    #[must_use]
    pub fn in_category(&self, predicate: impl Fn(&SlotCategory) -> bool) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, category)| predicate(category))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Slots that cannot be templated
    #[must_use]
    pub fn untemplateable(&self) -> Vec<&str> {
        self.in_category(|c| matches!(c, SlotCategory::Untemplateable))
    }

    /// Slots skipped because of the blacklist
    #[must_use]
    pub fn blacklisted(&self) -> Vec<&str> {
        self.in_category(|c| matches!(c, SlotCategory::Blacklisted { .. }))
    }
}

/// Sort every scanned slot into a category
///
/// # Errors
///
/// Returns an error if the identifier of a range class cannot be resolved.
pub fn classify(
    scan: &SlotScan,
    meta_view: &SchemaView,
    config: &TemplateConfig,
) -> Result<Classification> {
    let is_scalar = |range: &str| meta_view.is_type(range) || meta_view.is_enum(range);

    let mut ranges: Vec<String> = scan
        .entries
        .values()
        .filter_map(|entry| entry.range.clone())
        .filter(|range| !is_scalar(range.as_str()))
        .collect();
    ranges.sort();
    let range_counts = tabulate_unique_values(&ranges);

    let mut identifiables = IndexMap::new();
    for (range, _) in &range_counts {
        if let Some(identifier) = meta_view.get_identifier_slot(range)? {
            identifiables.insert(range.clone(), identifier.name);
        }
    }

    let settings_names: Vec<&str> = config
        .requires_column_settings
        .values()
        .map(|spec| spec.name.as_str())
        .collect();

    let mut categories = IndexMap::new();
    for (name, entry) in &scan.entries {
        let range = entry.range.as_deref().unwrap_or_default();
        let category = if is_scalar(range) {
            SlotCategory::Direct
        } else if let Some(identifier) = identifiables.get(range) {
            if config.is_blacklisted(name) {
                info!(slot = %name, "skipping blacklisted slot");
                SlotCategory::Blacklisted {
                    range: range.to_string(),
                }
            } else {
                SlotCategory::ViaIdentifier {
                    range: range.to_string(),
                    identifier: identifier.clone(),
                }
            }
        } else if settings_names.contains(&name.as_str()) {
            SlotCategory::RequiresSettings
        } else {
            SlotCategory::Untemplateable
        };
        categories.insert(name.clone(), category);
    }

    Ok(Classification {
        categories,
        range_counts,
        identifiables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_schema_content;
    use pretty_assertions::assert_eq;

    const META: &str = r"
id: https://example.org/meta
name: meta
default_range: string
types:
  string:
    typeof: str
  boolean:
    typeof: bool
enums:
  pv_formula_options:
    permissible_values:
      CODE:
classes:
  element:
    slots: [name, description, annotations]
  definition:
    is_a: element
    slots: [is_a]
  slot_definition:
    is_a: definition
    slots: [range, multivalued, examples, slot_usage]
  class_definition:
    is_a: definition
    slots: [slots, slot_usage, formula]
  annotation:
    slots: [tag]
  example:
    slots: [value]
slots:
  name:
    identifier: true
  description:
  annotations:
    range: annotation
    multivalued: true
  is_a:
    range: definition
  range:
    range: element
  multivalued:
    range: boolean
  examples:
    range: example
    multivalued: true
  slots:
    range: slot_definition
    multivalued: true
  slot_usage:
    range: slot_definition
    multivalued: true
  formula:
    range: pv_formula_options
  tag:
  value:
";

    fn meta_view() -> SchemaView {
        SchemaView::new(parse_schema_content(META, "meta.yaml").unwrap())
    }

    #[test]
    fn test_scan_visits_roots_in_sorted_order() {
        let view = meta_view();
        let roots = vec!["slot_definition".to_string(), "class_definition".to_string()];
        let scan = scan_metamodel(&view, &roots).unwrap();

        let names: Vec<&str> = scan.entries.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "slots",
                "slot_usage",
                "formula",
                "is_a",
                "name",
                "description",
                "annotations",
                "range",
                "multivalued",
                "examples"
            ]
        );
        assert!(scan.entries["multivalued"].type_range);
        assert!(!scan.entries["range"].type_range);
        assert_eq!(scan.entries["examples"].multivalued, Some(true));
    }

    #[test]
    fn test_scan_unknown_root_fails() {
        let view = meta_view();
        assert!(scan_metamodel(&view, &["nothing".to_string()]).is_err());
    }

    #[test]
    fn test_classify_buckets() {
        let view = meta_view();
        let config = TemplateConfig::default();
        let roots = config.root_classes.clone();
        let scan = scan_metamodel(&view, &roots).unwrap();
        let classification = classify(&scan, &view, &config).unwrap();

        assert_eq!(classification.categories["name"], SlotCategory::Direct);
        assert_eq!(classification.categories["formula"], SlotCategory::Direct);
        assert_eq!(
            classification.categories["is_a"],
            SlotCategory::ViaIdentifier {
                range: "definition".into(),
                identifier: "name".into()
            }
        );
        assert_eq!(
            classification.categories["slot_usage"],
            SlotCategory::Blacklisted {
                range: "slot_definition".into()
            }
        );
        assert_eq!(
            classification.categories["examples"],
            SlotCategory::RequiresSettings
        );
        assert_eq!(classification.untemplateable(), vec!["annotations"]);
        assert_eq!(classification.blacklisted(), vec!["slots", "slot_usage"]);
        assert_eq!(
            classification.templateable(),
            vec!["description", "formula", "is_a", "multivalued", "name", "range"]
        );
        assert_eq!(
            classification.range_counts,
            vec![
                ("slot_definition".to_string(), 2),
                ("annotation".to_string(), 1),
                ("definition".to_string(), 1),
                ("element".to_string(), 1),
                ("example".to_string(), 1),
            ]
        );
        assert!(!classification.identifiables.contains_key("annotation"));
        assert_eq!(classification.identifiables["element"], "name");
    }
}
