//! Core data types for the Folio document generator.
//!
//! This crate provides the data model shared by the generation client, the
//! pipeline runner and the archive packager: artifacts, the per-run context
//! that accumulates them, image dimensions, progress events and run outcomes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod context;
mod dimensions;
mod outcome;
mod progress;
mod role;

pub use artifact::{Artifact, ArtifactGroup, GroupMember};
pub use context::{MASTER_DOCUMENT_KEY, RunContext, USER_PROMPT_KEY, is_reserved_key};
pub use dimensions::Dimensions;
pub use outcome::RunOutcome;
pub use progress::ProgressEvent;
pub use role::Role;
