//! Main `SchemaView` API for schema introspection

use linkml_core::{
    error::{LinkMLError, Result},
    types::{ClassDefinition, SchemaDefinition, SlotDefinition},
};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::navigation::{NavigationCache, SlotResolution, closure};
use crate::loader::{SchemaLoader, SchemaSource};
use crate::parser::ImportResolver;

/// Error type for `SchemaView` operations
#[derive(Debug, thiserror::Error)]
pub enum SchemaViewError {
    /// Error accessing cached data
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<SchemaViewError> for LinkMLError {
    fn from(err: SchemaViewError) -> Self {
        LinkMLError::service(err.to_string())
    }
}

/// High-level `API` for `LinkML` schema introspection
///
/// `SchemaView` keeps the schema as written next to the schema with its
/// imports merged. Lookups go through the merged schema; callers that must
/// distinguish local definitions use [`SchemaView::root_schema`].
#[derive(Clone, Debug)]
pub struct SchemaView {
    root: Arc<SchemaDefinition>,

    /// Merged view of all imported schemas
    merged: Arc<SchemaDefinition>,

    /// Navigation cache for induced slots
    nav_cache: Arc<RwLock<NavigationCache>>,
}

impl SchemaView {
    /// Create a view of a schema that has no separate import closure
    #[must_use]
    pub fn new(schema: SchemaDefinition) -> Self {
        let schema = Arc::new(schema);
        Self {
            root: Arc::clone(&schema),
            merged: schema,
            nav_cache: Arc::new(RwLock::new(NavigationCache::new())),
        }
    }

    /// Create a view from a schema and its merged import closure
    #[must_use]
    pub fn with_imports(root: SchemaDefinition, merged: SchemaDefinition) -> Self {
        Self {
            root: Arc::new(root),
            merged: Arc::new(merged),
            nav_cache: Arc::new(RwLock::new(NavigationCache::new())),
        }
    }

    /// Load a schema and, if the loader is configured to, merge its imports
    ///
    /// # Errors
    ///
    /// Returns an error if the schema or one of its imports cannot be loaded.
    pub async fn load(loader: &SchemaLoader, source: &SchemaSource) -> Result<Self> {
        let root = loader.load_document(source).await?;
        if loader.config().merge_imports && !root.imports.is_empty() {
            let merged = ImportResolver::new(loader)
                .resolve(root.clone(), source)
                .await?;
            Ok(Self::with_imports(root, merged))
        } else {
            Ok(Self::new(root))
        }
    }

    /// The schema as written, without merged imports
    #[must_use]
    pub fn root_schema(&self) -> &SchemaDefinition {
        &self.root
    }

    /// The schema with all imports merged
    #[must_use]
    pub fn schema(&self) -> &SchemaDefinition {
        &self.merged
    }

    /// Range used for slots that declare none
    #[must_use]
    pub fn default_range(&self) -> &str {
        self.merged.default_range.as_deref().unwrap_or("string")
    }

    // === Class Operations ===

    /// All classes, imported ones included
    #[must_use]
    pub fn all_classes(&self) -> &IndexMap<String, ClassDefinition> {
        &self.merged.classes
    }

    /// Get a specific class definition
    #[must_use]
    pub fn get_class(&self, name: &str) -> Option<&ClassDefinition> {
        self.merged.classes.get(name)
    }

    /// Direct parents of a class: `is_a` first, then mixins
    #[must_use]
    pub fn class_parents(&self, name: &str) -> Vec<String> {
        self.get_class(name)
            .map(|class| {
                class
                    .is_a
                    .iter()
                    .chain(class.mixins.iter())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The class followed by all of its ancestors through `is_a` and mixins
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the class is unknown.
    pub fn class_ancestors(&self, name: &str) -> Result<Vec<String>> {
        if self.get_class(name).is_none() {
            return Err(LinkMLError::not_found("class", name));
        }
        Ok(closure(name, true, |c| self.class_parents(c)))
    }

    /// All slot names applicable to a class, inherited ones included
    ///
    /// For each ancestor (the class first) its `slots` then its `attributes`,
    /// each name once in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the class is unknown.
    pub fn class_slots(&self, class_name: &str) -> Result<Vec<String>> {
        let mut slots: Vec<String> = Vec::new();
        for ancestor in self.class_ancestors(class_name)? {
            let Some(class) = self.get_class(&ancestor) else {
                debug!(class = class_name, ancestor = %ancestor, "ancestor not defined");
                continue;
            };
            for name in class.slots.iter().chain(class.attributes.keys()) {
                if !slots.contains(name) {
                    slots.push(name.clone());
                }
            }
        }
        Ok(slots)
    }

    /// Every slot of a class, resolved in the context of that class
    ///
    /// # Errors
    ///
    /// Returns an error if the class or one of its slots is unknown.
    pub fn class_induced_slots(&self, class_name: &str) -> Result<Vec<SlotDefinition>> {
        self.class_slots(class_name)?
            .iter()
            .map(|slot_name| self.induced_slot(slot_name, class_name))
            .collect()
    }

    /// Identifier slot of a class, if it has one
    ///
    /// An unknown class has no identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the class's slots cannot be resolved.
    pub fn get_identifier_slot(&self, class_name: &str) -> Result<Option<SlotDefinition>> {
        if self.get_class(class_name).is_none() {
            debug!(class = class_name, "no such class; no identifier slot");
            return Ok(None);
        }
        Ok(self
            .class_induced_slots(class_name)?
            .into_iter()
            .find(SlotDefinition::is_identifier))
    }

    // === Slot Operations ===

    /// Get a schema-level slot definition
    #[must_use]
    pub fn get_slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.merged.slots.get(name)
    }

    /// Ancestors of a slot definition through `is_a` and mixins, nearest first
    #[must_use]
    pub fn slot_ancestors_of(&self, slot: &SlotDefinition) -> Vec<String> {
        let start = slot.name.clone();
        closure(&start, false, |name| {
            let definition = if name == start {
                Some(slot)
            } else {
                self.get_slot(name)
            };
            definition
                .map(|s| s.is_a.iter().chain(s.mixins.iter()).cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Get a fully resolved slot in the context of a specific class
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the class or the slot is unknown.
    pub fn induced_slot(&self, slot_name: &str, class_name: &str) -> Result<SlotDefinition> {
        {
            let cache = self.nav_cache.read().map_err(|_| {
                SchemaViewError::CacheError("Failed to acquire cache read lock".into())
            })?;
            if let Some(induced) = cache.get_induced_slot(class_name, slot_name) {
                return Ok(induced);
            }
        }

        let induced = SlotResolution::new(self).resolve_slot(slot_name, class_name)?;

        {
            let mut cache = self.nav_cache.write().map_err(|_| {
                SchemaViewError::CacheError("Failed to acquire cache write lock".into())
            })?;
            cache.cache_induced_slot(class_name, slot_name, induced.clone());
        }

        Ok(induced)
    }

    // === Type and Enum Operations ===

    /// Whether `name` is a type
    #[must_use]
    pub fn is_type(&self, name: &str) -> bool {
        self.merged.types.contains_key(name)
    }

    /// Whether `name` is an enum
    #[must_use]
    pub fn is_enum(&self, name: &str) -> bool {
        self.merged.enums.contains_key(name)
    }
}
