//! `linkml2schemasheets-template` command-line tool
//!
//! Derives a schemasheet template from the `LinkML` metamodel and populates
//! it with a source schema.

use linkml_core::error::Result;
use linkml_service::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
