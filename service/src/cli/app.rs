//! `linkml2schemasheets-template` application

use super::types::TemplateCli;
use crate::loader::{SchemaLoader, SchemaSource};
use crate::schema_view::SchemaView;
use crate::schemasheets::{ExportConfig, SchemaExporter};
use crate::staging::stage_schema;
use crate::template::{TemplateGenerator, TemplateReport};
use clap::Parser;
use colored::Colorize;
use linkml_core::config::TemplateConfig;
use linkml_core::error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Data rows written to the schemasheet
    pub rows: usize,
    /// Derivation report
    pub report: TemplateReport,
}

/// Template generation application
pub struct TemplateApp {
    cli: TemplateCli,
}

impl TemplateApp {
    /// Create the application from command line arguments
    #[must_use]
    pub fn from_args() -> Self {
        Self {
            cli: TemplateCli::parse(),
        }
    }

    /// Create the application from parsed arguments
    #[must_use]
    pub fn new(cli: TemplateCli) -> Self {
        Self { cli }
    }

    /// Run the application, printing a summary
    ///
    /// # Errors
    ///
    /// Returns an error if any step of the generation fails.
    pub async fn run(self) -> Result<()> {
        self.init_logging();

        match self.execute().await {
            Ok(summary) => {
                if !self.cli.quiet {
                    self.print_summary(&summary);
                }
                Ok(())
            }
            Err(err) => {
                error!("Template generation failed: {}", err);
                eprintln!("Error: {err}");
                Err(err)
            }
        }
    }

    /// Configure tracing from `RUST_LOG`, falling back to the CLI flags
    fn init_logging(&self) {
        let level = if self.cli.quiet {
            "error"
        } else if self.cli.verbose {
            "debug"
        } else {
            "info"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        // A subscriber may already be installed when embedded
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load both schemas, derive the template and write the outputs
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading, derivation or writing fails.
    pub async fn execute(&self) -> Result<RunSummary> {
        let config = self.load_config()?;
        let loader = SchemaLoader::new(config.loader.clone())?;

        info!(meta = %self.cli.meta_path, "loading metamodel");
        let meta_view =
            SchemaView::load(&loader, &SchemaSource::parse(&self.cli.meta_path)?).await?;
        if !self.cli.no_staging {
            stage_schema(meta_view.schema(), &self.cli.meta_staging_path).await?;
        }

        info!(source = %self.cli.source_path, "loading source schema");
        let source_view =
            SchemaView::load(&loader, &SchemaSource::parse(&self.cli.source_path)?).await?;

        let exporter = SchemaExporter::with_config(ExportConfig {
            default_internal_separator: config.default_internal_separator.clone(),
            ..ExportConfig::default()
        });
        let generated = TemplateGenerator::new(config).generate(&meta_view, &source_view)?;
        let rows = exporter
            .export(&source_view, &generated.table, &self.cli.output_path)
            .await?;

        if let Some(report_path) = &self.cli.report_path {
            generated.report.write(report_path).await?;
            info!(path = %report_path.display(), "wrote report");
        }

        Ok(RunSummary {
            rows,
            report: generated.report,
        })
    }

    fn load_config(&self) -> Result<TemplateConfig> {
        let mut config = match &self.cli.config {
            Some(path) => TemplateConfig::from_yaml_file(path)?,
            None => TemplateConfig::default(),
        };
        if let Some(style) = self.cli.report_style {
            config.report_style = style.into();
        }
        config.validate()?;
        Ok(config)
    }

    fn print_summary(&self, summary: &RunSummary) {
        let report = &summary.report;
        println!("{}", "Schemasheet template".bold().blue());
        println!("  {} {}", "Metamodel:".cyan(), self.cli.meta_path);
        println!("  {} {}", "Source:".cyan(), self.cli.source_path);
        println!(
            "  {} {} ({} columns, {} rows)",
            "Output:".cyan(),
            self.cli.output_path.display(),
            report.column_count(),
            summary.rows
        );

        if !report.blacklisted.is_empty() {
            println!(
                "  {} {}",
                "Blacklisted:".yellow(),
                report.blacklisted.join(", ")
            );
        }
        if !report.untemplateables.is_empty() {
            println!("  {}", "Untemplateable slots:".yellow());
            for (name, slot) in &report.untemplateables {
                println!(
                    "    {name}: range {}, multivalued {}",
                    slot.range.as_deref().unwrap_or("-"),
                    slot.multivalued.unwrap_or(false)
                );
            }
        }
        println!("{}", "✓ Done".green().bold());
    }
}
