//! CLI type definitions

use clap::{Parser, ValueEnum};
use linkml_core::config::ReportStyle;
use std::path::PathBuf;

/// Default location of the `LinkML` metamodel
pub const DEFAULT_META_PATH: &str = "https://w3id.org/linkml/meta";

/// Generate a schemasheet template from the `LinkML` metamodel and populate
/// it with a source schema
#[derive(Parser, Debug, Clone)]
#[command(name = "linkml2schemasheets-template", version, about)]
pub struct TemplateCli {
    /// A filesystem or URL path to the `LinkML` metamodel schema
    #[arg(short = 'm', long, default_value = DEFAULT_META_PATH)]
    pub meta_path: String,

    /// A filesystem path for saving the merged `LinkML` metamodel locally
    #[arg(short = 's', long, default_value = "meta_merged.yaml")]
    pub meta_staging_path: PathBuf,

    /// A filesystem or URL path to the schema that should be reported on
    #[arg(short = 'i', long)]
    pub source_path: String,

    /// Where to write the populated schemasheet
    #[arg(short = 'o', long, default_value = "populated_with_generated_spec.tsv")]
    pub output_path: PathBuf,

    /// Column selection; overrides the configuration file
    #[arg(long, value_enum)]
    pub report_style: Option<ReportStyleArg>,

    /// Template configuration file (YAML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Also write the derivation report (YAML) here
    #[arg(long)]
    pub report_path: Option<PathBuf>,

    /// Do not save the merged metamodel
    #[arg(long)]
    pub no_staging: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode - only errors are shown
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Report styles accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportStyleArg {
    /// A column for every templatable metaslot
    Exhaustive,
    /// Only columns the source schema uses
    Concise,
}

impl From<ReportStyleArg> for ReportStyle {
    fn from(arg: ReportStyleArg) -> Self {
        match arg {
            ReportStyleArg::Exhaustive => ReportStyle::Exhaustive,
            ReportStyleArg::Concise => ReportStyle::Concise,
        }
    }
}
