//! Schema navigation utilities for traversing `LinkML` schemas

use linkml_core::{
    error::{LinkMLError, Result},
    types::SlotDefinition,
};
use std::collections::HashMap;
use tracing::trace;

use super::view::SchemaView;

/// Cache for induced slots, keyed by class and slot name
#[derive(Debug, Default)]
pub struct NavigationCache {
    induced_slots: HashMap<(String, String), SlotDefinition>,
}

impl NavigationCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached induced slot for a class
    #[must_use]
    pub fn get_induced_slot(&self, class_name: &str, slot_name: &str) -> Option<SlotDefinition> {
        self.induced_slots
            .get(&(class_name.to_string(), slot_name.to_string()))
            .cloned()
    }

    /// Cache an induced slot for a class
    pub fn cache_induced_slot(&mut self, class_name: &str, slot_name: &str, slot: SlotDefinition) {
        self.induced_slots
            .insert((class_name.to_string(), slot_name.to_string()), slot);
    }

    /// Number of cached slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.induced_slots.len()
    }

    /// Whether nothing is cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.induced_slots.is_empty()
    }
}

/// Transitive closure of `parents` starting at `start`
///
/// The start element comes first when `reflexive`. Traversal is depth-first
/// from the most recently discovered element, and each name appears once, so
/// cycles terminate.
pub fn closure<F>(start: &str, reflexive: bool, mut parents: F) -> Vec<String>
where
    F: FnMut(&str) -> Vec<String>,
{
    let mut result = if reflexive {
        vec![start.to_string()]
    } else {
        Vec::new()
    };
    let mut visited: Vec<String> = Vec::new();
    let mut todo = vec![start.to_string()];

    while let Some(current) = todo.pop() {
        let found = parents(&current);
        visited.push(current);
        for parent in found {
            if !visited.contains(&parent) && !result.contains(&parent) && parent != start {
                todo.push(parent.clone());
                result.push(parent);
            }
        }
    }

    result
}

/// Resolves a slot in the context of a class
pub struct SlotResolution<'a> {
    schema_view: &'a SchemaView,
}

impl<'a> SlotResolution<'a> {
    /// Create a new slot resolution helper
    #[must_use]
    pub fn new(schema_view: &'a SchemaView) -> Self {
        Self { schema_view }
    }

    /// Resolve a slot in the context of a specific class
    ///
    /// 1. Start from the attribute declared by the class or its nearest
    ///    ancestor, or else the schema-level slot.
    /// 2. Take inheritable metaslots from the slot's own ancestors where the
    ///    slot has no truthy value, nearest first.
    /// 3. Apply `slot_usage` from the most general ancestor down to the class.
    /// 4. Default the range.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the class is unknown or nothing defines the slot.
    pub fn resolve_slot(&self, slot_name: &str, class_name: &str) -> Result<SlotDefinition> {
        let view = self.schema_view;
        let ancestors = view.class_ancestors(class_name)?;

        let base = ancestors
            .iter()
            .filter_map(|a| view.get_class(a))
            .find_map(|a| a.attributes.get(slot_name))
            .or_else(|| view.get_slot(slot_name))
            .ok_or_else(|| LinkMLError::not_found("slot", slot_name))?;

        let mut induced = base.clone();
        induced.name = slot_name.to_string();

        for parent_name in view.slot_ancestors_of(base) {
            if let Some(parent) = view.get_slot(&parent_name) {
                induced.inherit_from(parent)?;
            }
        }

        for ancestor_name in ancestors.iter().rev() {
            if let Some(usage) = view
                .get_class(ancestor_name)
                .and_then(|a| a.slot_usage.get(slot_name))
            {
                trace!(slot = slot_name, class = %ancestor_name, "applying slot_usage");
                induced.refine_with(usage)?;
            }
        }

        if induced.range.is_none() {
            induced.range = Some(view.default_range().to_string());
        }

        Ok(induced)
    }
}
