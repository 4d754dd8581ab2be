//! Document pipeline execution engine for Folio.
//!
//! A [`DocumentSpec`] is an ordered list of [`Step`]s. The [`PipelineRunner`]
//! executes it against a fresh [`RunContext`](folio_core::RunContext):
//!
//! 1. the context is seeded with the user prompt under `user_prompt`
//! 2. each step resolves its `{key}` placeholders against earlier outputs and
//!    calls the [`GenerationDriver`](folio_interface::GenerationDriver)
//! 3. a master document listing every output is appended
//! 4. [`PipelineRunner::generate`] packages the context into a ZIP archive
//!
//! Text failures are fatal. Image slot failures leave an empty member and the
//! batch continues.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use folio_pipeline::{DocumentRegistry, PipelineRunner, spawn_run};
//!
//! let registry = DocumentRegistry::builtin()?;
//! let runner = Arc::new(PipelineRunner::new(client));
//! let mut handle = spawn_run(runner, registry.get("comic_book")?.clone(), "a lighthouse keeper");
//!
//! while let Some(event) = handle.next_progress().await {
//!     println!("{}", event);
//! }
//! let outcome = handle.outcome().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod manifest;
mod progress;
mod registry;
mod runner;
mod step;
mod table;
mod task;
mod template;
mod toml_parser;

pub use document::{DocumentSpec, default_system_role};
pub use manifest::master_document;
pub use progress::ProgressReporter;
pub use registry::{BuiltinDocument, DocumentRegistry};
pub use runner::{PipelineRunner, RunnerConfig};
pub use step::{ImageSlot, Step, StepKind, TableSpec, TextSlot, key_label};
pub use table::render_csv;
pub use task::{RunHandle, spawn_run};
pub use template::{is_placeholder_key, placeholders, placeholders_all, resolve};

pub use folio_error::{
    DocumentError, DocumentErrorKind, PipelineError, PipelineErrorKind, PipelineResult,
};
pub use tokio_util::sync::CancellationToken;
