//! Schema loading from files and URLs
//!
//! Documents are parsed as YAML first and as JSON second. Imports are merged
//! by [`crate::parser::ImportResolver`] when the loader configuration asks for
//! it.

mod source;

pub use source::SchemaSource;

use crate::parser::ImportResolver;
use linkml_core::config::LoaderConfig;
use linkml_core::error::{LinkMLError, Result};
use linkml_core::types::SchemaDefinition;
use tracing::{debug, info};
use url::Url;

/// Loads `LinkML` schema documents
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    config: LoaderConfig,
    linkml_base: Url,
    /// `HTTP` client for remote schemas
    http_client: reqwest::Client,
}

impl SchemaLoader {
    /// Create a loader
    ///
    /// # Errors
    ///
    /// Returns an error if the `linkml:` base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let linkml_base = Url::parse(&config.linkml_base_url).map_err(|e| {
            LinkMLError::config(format!(
                "invalid linkml_base_url '{}': {e}",
                config.linkml_base_url
            ))
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(config.import_timeout)
            .build()
            .map_err(|e| LinkMLError::other_with_source("cannot build HTTP client", e))?;

        Ok(Self {
            config,
            linkml_base,
            http_client,
        })
    }

    /// Loader configuration
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Base URL for `linkml:` imports
    #[must_use]
    pub fn linkml_base(&self) -> &Url {
        &self.linkml_base
    }

    /// Load a schema and, if configured, merge its imports
    ///
    /// # Errors
    ///
    /// Returns an error if the document or any import cannot be loaded.
    pub async fn load(&self, source: &SchemaSource) -> Result<SchemaDefinition> {
        info!(%source, "loading schema");
        let schema = self.load_document(source).await?;
        if self.config.merge_imports && !schema.imports.is_empty() {
            ImportResolver::new(self).resolve(schema, source).await
        } else {
            Ok(schema)
        }
    }

    /// Load a single document without touching its imports
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub async fn load_document(&self, source: &SchemaSource) -> Result<SchemaDefinition> {
        let content = match source {
            SchemaSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                LinkMLError::io_error(format!("Failed to read {}: {e}", path.display()))
            })?,
            SchemaSource::Url(url) => self.fetch(url).await?,
        };
        debug!(%source, bytes = content.len(), "read schema document");
        parse_schema_content(&content, &source.to_string())
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LinkMLError::io_error(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(LinkMLError::io_error(format!(
                "Failed to fetch {url}: HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| LinkMLError::io_error(format!("Failed to read response from {url}: {e}")))
    }
}

/// Parse schema text, trying YAML then JSON
///
/// # Errors
///
/// Returns a parse error carrying both parser messages if neither succeeds.
pub fn parse_schema_content(content: &str, location: &str) -> Result<SchemaDefinition> {
    let yaml_result = serde_yaml::from_str::<SchemaDefinition>(content);
    let mut schema = match yaml_result {
        Ok(schema) => schema,
        Err(yaml_error) => match serde_json::from_str::<SchemaDefinition>(content) {
            Ok(schema) => schema,
            Err(json_error) => {
                return Err(LinkMLError::parse_at(
                    format!(
                        "not a YAML or JSON schema.\n\
                         YAML parsing error: {yaml_error}\n\
                         JSON parsing error: {json_error}"
                    ),
                    location,
                ));
            }
        },
    };

    schema.populate_names();
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_yaml_content() {
        let schema = parse_schema_content(
            "id: https://example.org/s\nname: s\nclasses:\n  Thing:\n",
            "inline",
        )
        .unwrap();
        assert_eq!(schema.name, "s");
        assert_eq!(schema.classes["Thing"].name, "Thing");
    }

    #[test]
    fn test_parse_json_content() {
        let schema =
            parse_schema_content(r#"{"id": "x", "name": "j", "slots": {"a": {}}}"#, "inline")
                .unwrap();
        assert_eq!(schema.slots["a"].name, "a");
    }

    #[test]
    fn test_parse_failure_names_location() {
        let err = parse_schema_content("- just\n- a list\n", "broken.yaml").unwrap_err();
        match err {
            LinkMLError::ParseError { location, message } => {
                assert_eq!(location.as_deref(), Some("broken.yaml"));
                assert!(message.contains("YAML parsing error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_load_file_without_imports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id: https://example.org/s\nname: s\nslots:\n  a:\n").unwrap();

        let loader = SchemaLoader::new(LoaderConfig::default()).unwrap();
        let schema = loader
            .load(&SchemaSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert!(schema.slots.contains_key("a"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let loader = SchemaLoader::new(LoaderConfig::default()).unwrap();
        let err = loader
            .load(&SchemaSource::File("does/not/exist.yaml".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkMLError::IoError(_)));
    }
}
