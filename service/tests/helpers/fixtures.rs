//! Paths to the test metamodel and source schema, and loaders for them

use linkml_core::config::{LoaderConfig, TemplateConfig};
use linkml_service::loader::{SchemaLoader, SchemaSource};
use linkml_service::schema_view::SchemaView;
use std::path::{Path, PathBuf};
use url::Url;

/// Root of the fixture tree
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The reduced metamodel
pub fn meta_path() -> PathBuf {
    fixtures_dir().join("meta/meta.yaml")
}

/// The source schema
pub fn source_path() -> PathBuf {
    fixtures_dir().join("source/person.yaml")
}

/// `linkml:` imports resolve next to the test metamodel
pub fn offline_loader_config() -> LoaderConfig {
    let base = Url::from_directory_path(fixtures_dir().join("meta"))
        .expect("fixture directory is absolute");
    LoaderConfig {
        linkml_base_url: base.to_string(),
        ..LoaderConfig::default()
    }
}

/// Default template configuration with the offline loader
pub fn offline_template_config() -> TemplateConfig {
    TemplateConfig {
        loader: offline_loader_config(),
        ..TemplateConfig::default()
    }
}

/// Load a schema with imports merged
pub async fn load_view(path: &Path) -> SchemaView {
    let loader = SchemaLoader::new(offline_loader_config()).expect("loader");
    SchemaView::load(&loader, &SchemaSource::File(path.to_path_buf()))
        .await
        .expect("fixture loads")
}

/// Both fixture schemas
pub async fn load_fixtures() -> (SchemaView, SchemaView) {
    (load_view(&meta_path()).await, load_view(&source_path()).await)
}
