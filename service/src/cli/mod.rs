//! Command-line interface for schemasheet template generation

mod app;
mod types;

pub use app::{RunSummary, TemplateApp};
pub use types::{DEFAULT_META_PATH, ReportStyleArg, TemplateCli};

/// Main entry point for the CLI
///
/// # Errors
/// Returns error if template generation fails.
pub async fn run() -> linkml_core::error::Result<()> {
    TemplateApp::from_args().run().await
}
