//! Trait definitions for the Folio document generator.
//!
//! The pipeline runner only ever talks to remote services through
//! [`GenerationDriver`], so any provider (or a scripted test double) can sit
//! behind it.

mod traits;

pub use traits::GenerationDriver;
