//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the folio binary.

mod commands;
mod documents;
mod generate;

pub use commands::{Cli, Commands, GenerateArgs};
pub use documents::{list_documents, show_document, validate_document};
pub use generate::generate;
