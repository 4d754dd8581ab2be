//! Folio CLI binary.
//!
//! This binary provides command-line access to Folio:
//! - List and inspect built-in document types
//! - Validate custom TOML document definitions
//! - Generate a document and save its archive

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate, list_documents, show_document, validate_document};

    let cli = Cli::parse();

    let format = if cli.json_logs {
        folio::LogFormat::Json
    } else {
        folio::LogFormat::Pretty
    };
    folio::init_logging(cli.verbose, format).map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Documents => list_documents()?,
        Commands::Show { document } => show_document(&document)?,
        Commands::Validate { path } => validate_document(&path)?,
        Commands::Generate(args) => {
            let config = match &cli.config {
                Some(path) => folio::FolioConfig::from_file(path)?,
                None => folio::FolioConfig::load()?,
            };
            generate(&config, args).await?;
        }
    }

    Ok(())
}
