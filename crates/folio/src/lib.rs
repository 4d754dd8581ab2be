//! Folio: generate comic books, game plans and marketing campaigns.
//!
//! This is the facade crate. It re-exports the workspace crates and adds the
//! layered [`FolioConfig`] and logging setup used by the `folio` binary.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio::{DocumentRegistry, FolioConfig, OpenAiClient, PipelineRunner, RunOutcome, spawn_run};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FolioConfig::load()?;
//! let client = OpenAiClient::new(config.openai_config(config.api_key()?)?)?;
//! let runner = Arc::new(PipelineRunner::with_config(client, config.runner_config()));
//!
//! let spec = DocumentRegistry::builtin()?.get("comic_book")?.clone();
//! let mut handle = spawn_run(runner, spec, "a lighthouse keeper");
//! while let Some(event) = handle.next_progress().await {
//!     eprintln!("{}", event);
//! }
//! if let RunOutcome::Completed { archive, file_name } = handle.outcome().await {
//!     folio::write_archive(&file_name, &archive).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use config::{FolioConfig, ProviderSettings, RunnerSettings};
pub use observability::{LogFormat, init_logging};

pub use folio_archive::{archive_digest, entry_names, pack, write_archive};
pub use folio_core::{
    Artifact, ArtifactGroup, Dimensions, GroupMember, MASTER_DOCUMENT_KEY, ProgressEvent, Role,
    RunContext, RunOutcome, USER_PROMPT_KEY,
};
pub use folio_error::{
    ArchiveError, ArchiveErrorKind, ConfigError, ConfigErrorKind, DocumentError,
    DocumentErrorKind, FolioError, FolioErrorKind, FolioResult, GenerationError,
    GenerationErrorKind, PipelineError, PipelineErrorKind,
};
pub use folio_interface::GenerationDriver;
pub use folio_models::{OpenAiClient, OpenAiConfig};
pub use folio_pipeline::{
    BuiltinDocument, CancellationToken, DocumentRegistry, DocumentSpec, ImageSlot,
    PipelineRunner, ProgressReporter, RunHandle, RunnerConfig, Step, StepKind, TableSpec,
    TextSlot, spawn_run,
};
