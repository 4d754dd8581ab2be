//! Error types for the Folio document generator.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use folio_error::{FolioResult, GenerationError};
//!
//! fn complete() -> FolioResult<String> {
//!     Err(GenerationError::protocol("missing choices"))?
//! }
//!
//! match complete() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod config;
mod document;
mod error;
mod generation;
mod pipeline;

pub use archive::{ArchiveError, ArchiveErrorKind, ArchiveResult};
pub use config::{ConfigError, ConfigErrorKind};
pub use document::{DocumentError, DocumentErrorKind};
pub use error::{FolioError, FolioErrorKind, FolioResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult};
pub use pipeline::{PipelineError, PipelineErrorKind, PipelineResult};
