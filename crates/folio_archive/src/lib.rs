//! Deterministic archive packaging for Folio runs.
//!
//! A completed [`RunContext`](folio_core::RunContext) is flattened into a ZIP
//! container:
//!
//! - text artifacts become `{key}.txt`
//! - binary artifacts become `{key}` (the key carries its own extension)
//! - artifact groups become one entry per member under `{key}/`, with the
//!   same text/binary rule applied to each member
//!
//! The seeded user prompt is never packaged. Entry timestamps are pinned to the
//! ZIP epoch so the same context always produces the same bytes.
//!
//! # Example
//!
//! ```rust
//! use folio_archive::{archive_digest, pack};
//! use folio_core::{Artifact, RunContext};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut context = RunContext::new("a lighthouse keeper");
//! context.insert("concept", Artifact::Text("Alone at sea".to_string()));
//!
//! let first = pack(&context)?;
//! let second = pack(&context)?;
//! assert_eq!(archive_digest(&first), archive_digest(&second));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod packer;

pub use filesystem::write_archive;
pub use folio_error::{ArchiveError, ArchiveErrorKind, ArchiveResult};
pub use packer::{archive_digest, entry_names, pack};
