//! Schema locations and import path resolution

use indexmap::IndexMap;
use linkml_core::error::{LinkMLError, Result};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Where a schema document lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaSource {
    /// Local file
    File(PathBuf),
    /// Remote document fetched over HTTP(S)
    Url(Url),
}

impl SchemaSource {
    /// Interpret a user-supplied location
    ///
    /// `http://`, `https://` and `file://` locations are URLs; everything else
    /// is a file path. A URL whose last segment has no extension gets `.yaml`,
    /// so `https://w3id.org/linkml/meta` loads `meta.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL location does not parse.
    pub fn parse(location: &str) -> Result<Self> {
        if is_url(location) {
            Ok(Self::from_url(with_yaml_extension_url(Url::parse(location)?)))
        } else {
            Ok(Self::File(PathBuf::from(location)))
        }
    }

    /// `file:` URLs become paths, other URLs are fetched
    #[must_use]
    pub fn from_url(url: Url) -> Self {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Self::File(path);
            }
        }
        Self::Url(url)
    }

    /// Resolve an `imports` entry written in the schema loaded from `self`
    ///
    /// * `linkml:<name>` expands against `linkml_base`.
    /// * Other CURIEs expand with the importing schema's `prefixes`.
    /// * Absolute URLs are used as given.
    /// * Anything else is relative to the importing document.
    ///
    /// # Errors
    ///
    /// Returns an import error if the result is not a valid location.
    pub fn resolve_import(
        &self,
        import: &str,
        prefixes: &IndexMap<String, Value>,
        linkml_base: &Url,
    ) -> Result<Self> {
        if is_url(import) {
            return Self::parse(import);
        }

        if let Some((prefix, local)) = import.split_once(':') {
            if prefix == "linkml" {
                let url = linkml_base
                    .join(&with_yaml_extension(local))
                    .map_err(|e| LinkMLError::import(import, e.to_string()))?;
                return Ok(Self::from_url(url));
            }
            if let Some(expansion) = prefixes.get(prefix).and_then(prefix_expansion) {
                return Self::parse(&format!("{expansion}{local}"));
            }
        }

        let relative = with_yaml_extension(import);
        match self {
            Self::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Self::File(dir.join(relative)))
            }
            Self::Url(url) => url
                .join(&relative)
                .map(Self::from_url)
                .map_err(|e| LinkMLError::import(import, e.to_string())),
        }
    }

    /// Stable key used to load each document once
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::File(path) => path
                .canonicalize()
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            Self::Url(url) => url.to_string(),
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

fn is_url(location: &str) -> bool {
    ["http://", "https://", "file://"]
        .iter()
        .any(|scheme| location.starts_with(scheme))
}

// Prefixes are either `prefix: expansion` or `prefix: {prefix_prefix, prefix_reference}`
fn prefix_expansion(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("prefix_reference").and_then(Value::as_str),
        _ => None,
    }
}

fn with_yaml_extension(location: &str) -> String {
    let last = location.rsplit('/').next().unwrap_or(location);
    if Path::new(last).extension().is_some() {
        location.to_string()
    } else {
        format!("{location}.yaml")
    }
}

fn with_yaml_extension_url(mut url: Url) -> Url {
    let path = url.path().to_string();
    if !path.ends_with('/') {
        url.set_path(&with_yaml_extension(&path));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn linkml_base() -> Url {
        Url::parse("https://w3id.org/linkml/").unwrap()
    }

    #[test]
    fn test_parse_url_gains_extension() {
        let source = SchemaSource::parse("https://w3id.org/linkml/meta").unwrap();
        assert_eq!(source.to_string(), "https://w3id.org/linkml/meta.yaml");

        let source = SchemaSource::parse("https://example.org/schema.json").unwrap();
        assert_eq!(source.to_string(), "https://example.org/schema.json");
    }

    #[test]
    fn test_parse_file() {
        let source = SchemaSource::parse("schemas/meta.yaml").unwrap();
        assert_eq!(source, SchemaSource::File(PathBuf::from("schemas/meta.yaml")));
    }

    #[test]
    fn test_resolve_linkml_import() {
        let source = SchemaSource::parse("schemas/meta.yaml").unwrap();
        let resolved = source
            .resolve_import("linkml:types", &IndexMap::new(), &linkml_base())
            .unwrap();
        assert_eq!(resolved.to_string(), "https://w3id.org/linkml/types.yaml");
    }

    #[test]
    fn test_file_linkml_base_resolves_to_path() {
        let dir = std::env::temp_dir();
        let base = Url::from_directory_path(&dir).unwrap();
        let source = SchemaSource::File(PathBuf::from("meta.yaml"));
        let resolved = source
            .resolve_import("linkml:types", &IndexMap::new(), &base)
            .unwrap();
        assert_eq!(resolved, SchemaSource::File(dir.join("types.yaml")));
    }

    #[test]
    fn test_resolve_relative_file_import() {
        let source = SchemaSource::File(PathBuf::from("schemas/meta.yaml"));
        let resolved = source
            .resolve_import("units", &IndexMap::new(), &linkml_base())
            .unwrap();
        assert_eq!(
            resolved,
            SchemaSource::File(PathBuf::from("schemas").join("units.yaml"))
        );
    }

    #[test]
    fn test_resolve_relative_url_import() {
        let source = SchemaSource::parse("https://w3id.org/linkml/meta").unwrap();
        let resolved = source
            .resolve_import("mappings", &IndexMap::new(), &linkml_base())
            .unwrap();
        assert_eq!(resolved.to_string(), "https://w3id.org/linkml/mappings.yaml");
    }

    #[test]
    fn test_resolve_prefixed_import() {
        let mut prefixes = IndexMap::new();
        prefixes.insert(
            "ext".to_string(),
            Value::String("https://example.org/schemas/".to_string()),
        );
        let source = SchemaSource::File(PathBuf::from("local.yaml"));
        let resolved = source
            .resolve_import("ext:core", &prefixes, &linkml_base())
            .unwrap();
        assert_eq!(resolved.to_string(), "https://example.org/schemas/core.yaml");
    }
}
