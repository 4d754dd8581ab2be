//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Folio - generate comic books, game plans and marketing campaigns as ZIP archives
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Generate comic books, game plans and marketing campaigns as ZIP archives", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file to use instead of the standard search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in document types
    Documents,

    /// Print the steps of a built-in document type
    Show {
        /// Document identifier (e.g. comic_book)
        document: String,
    },

    /// Load and validate a TOML document definition
    Validate {
        /// Path to the definition
        path: PathBuf,
    },

    /// Generate a document and save the archive
    Generate(GenerateArgs),
}

/// Arguments for `folio generate`
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["document", "spec"])))]
pub struct GenerateArgs {
    /// Built-in document identifier
    pub document: Option<String>,

    /// Custom TOML document definition
    #[arg(long)]
    pub spec: Option<PathBuf>,

    /// Topic or keywords for the document
    #[arg(short, long)]
    pub prompt: String,

    /// Where to save the archive (defaults to `<document id>.zip`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
