//! Metaslot usage discovery in a source schema

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use linkml_core::config::TemplateConfig;
use linkml_core::error::Result;
use linkml_core::types::Element;
use serde::Serialize;
use tracing::debug;

use crate::schema_view::SchemaView;

/// Count each distinct value, most frequent first
///
/// Equal counts are ordered by value.
#[must_use]
pub fn tabulate_unique_values<T>(values: &[T]) -> Vec<(T, usize)>
where
    T: Clone + Eq + Hash + Ord,
{
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut tabulated: Vec<(T, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.clone(), count))
        .collect();
    tabulated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tabulated
}

/// Metaslots and annotation tags a source schema makes use of
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceUsage {
    /// Boilerplate columns, then used metaslots sorted with the blacklist removed
    pub metaslots: Vec<String>,

    /// Annotation tags, sorted
    pub annotations: Vec<String>,
}

impl SourceUsage {
    /// Whether the source uses a metaslot
    #[must_use]
    pub fn uses_metaslot(&self, name: &str) -> bool {
        self.metaslots.iter().any(|m| m == name)
    }
}

/// Collect the metaslots and annotation tags used by every class and every
/// slot induced in a class
///
/// # Errors
///
/// Returns an error if a class slot cannot be induced.
pub fn discover_source_usage(view: &SchemaView, config: &TemplateConfig) -> Result<SourceUsage> {
    let mut metaslots = BTreeSet::new();
    let mut annotations = BTreeSet::new();

    for (class_name, class) in view.all_classes() {
        metaslots.extend(class.used_metaslots()?);
        annotations.extend(class.annotation_tags().into_iter().map(String::from));

        for induced in view.class_induced_slots(class_name)? {
            metaslots.extend(induced.used_metaslots()?);
            annotations.extend(induced.annotation_tags().into_iter().map(String::from));
        }
    }
    debug!(
        metaslots = metaslots.len(),
        annotations = annotations.len(),
        "discovered source usage"
    );

    let used = metaslots
        .into_iter()
        .filter(|metaslot| !config.is_blacklisted(metaslot));
    Ok(SourceUsage {
        metaslots: config.boilerplate_columns.iter().cloned().chain(used).collect(),
        annotations: annotations.into_iter().collect(),
    })
}
