//! Import resolution for `LinkML` schemas
//!
//! Imported documents are merged into the importing schema. Elements that
//! are already present win, so the importing schema shadows its imports and
//! earlier imports shadow later ones.

use crate::loader::{SchemaLoader, SchemaSource};
use indexmap::IndexMap;
use linkml_core::error::{LinkMLError, Result};
use linkml_core::types::SchemaDefinition;
use std::collections::HashSet;
use tracing::{debug, info};

/// Resolves and merges the import closure of a schema
pub struct ImportResolver<'a> {
    loader: &'a SchemaLoader,
}

struct PendingImport {
    source: SchemaSource,
    import: String,
    depth: usize,
}

impl<'a> ImportResolver<'a> {
    /// Create a resolver that loads documents with `loader`
    #[must_use]
    pub fn new(loader: &'a SchemaLoader) -> Self {
        Self { loader }
    }

    /// Merge every schema reachable through `imports` into `schema`
    ///
    /// Each document is loaded once. An import cycle is skipped.
    ///
    /// # Errors
    ///
    /// Returns an import error naming the failing import, or when nesting
    /// exceeds the configured maximum depth.
    pub async fn resolve(
        &self,
        schema: SchemaDefinition,
        source: &SchemaSource,
    ) -> Result<SchemaDefinition> {
        let max_depth = self.loader.config().max_import_depth;
        let mut merged = schema;
        let mut visited = HashSet::from([source.key()]);
        let mut stack = self.pending_imports(source, &merged.imports, &merged.prefixes, 1)?;

        while let Some(pending) = stack.pop() {
            if !visited.insert(pending.source.key()) {
                debug!(import = %pending.import, "already merged; skipping");
                continue;
            }
            if pending.depth > max_depth {
                return Err(LinkMLError::import(
                    &pending.import,
                    format!("import nesting exceeds {max_depth} levels"),
                ));
            }

            let imported = self
                .loader
                .load_document(&pending.source)
                .await
                .map_err(|e| LinkMLError::import(&pending.import, e.to_string()))?;
            info!(import = %pending.import, source = %pending.source, "merging import");

            stack.extend(self.pending_imports(
                &pending.source,
                &imported.imports,
                &imported.prefixes,
                pending.depth + 1,
            )?);
            merge_schema(&mut merged, imported);
        }

        Ok(merged)
    }

    // Returned in reverse so that popping visits imports in declaration order
    fn pending_imports(
        &self,
        importer: &SchemaSource,
        imports: &[String],
        prefixes: &IndexMap<String, serde_json::Value>,
        depth: usize,
    ) -> Result<Vec<PendingImport>> {
        imports
            .iter()
            .rev()
            .map(|import| {
                let source = importer.resolve_import(import, prefixes, self.loader.linkml_base())?;
                Ok(PendingImport {
                    source,
                    import: import.clone(),
                    depth,
                })
            })
            .collect()
    }
}

/// Merge `source` into `target`, keeping elements `target` already defines
pub fn merge_schema(target: &mut SchemaDefinition, source: SchemaDefinition) {
    merge_missing(&mut target.prefixes, source.prefixes);
    merge_missing(&mut target.subsets, source.subsets);
    merge_missing(&mut target.types, source.types);
    merge_missing(&mut target.enums, source.enums);
    merge_missing(&mut target.slots, source.slots);
    merge_missing(&mut target.classes, source.classes);
}

fn merge_missing<T>(target: &mut IndexMap<String, T>, source: IndexMap<String, T>) {
    for (name, definition) in source {
        target.entry(name).or_insert(definition);
    }
}
