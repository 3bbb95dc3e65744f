//! Local copy of a merged schema

use std::path::Path;

use linkml_core::error::Result;
use linkml_core::types::SchemaDefinition;
use tracing::info;

/// Dump `schema` as YAML to `path`, creating parent directories
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized or written.
pub async fn stage_schema(schema: &SchemaDefinition, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(schema)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, yaml).await?;
    info!(path = %path.display(), schema = %schema.name, "staged merged schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_schema_content;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_staged_schema_reloads() {
        let schema = parse_schema_content(
            "id: https://example.org/m\nname: m\nslots:\n  range:\n    multivalued: false\n",
            "m.yaml",
        )
        .unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staging/meta_merged.yaml");

        stage_schema(&schema, &path).await.unwrap();

        let reloaded =
            parse_schema_content(&std::fs::read_to_string(&path).unwrap(), "staged").unwrap();
        assert_eq!(reloaded.name, "m");
        assert_eq!(reloaded.slots["range"].multivalued, Some(false));
    }
}
