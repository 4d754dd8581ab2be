//! Test utilities for pipeline tests.
//!
//! This module provides a scripted in-process generation driver.

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{DriverCall, ScriptedDriver};

use folio_core::Dimensions;
use folio_pipeline::{DocumentSpec, Step};

/// The three-step lighthouse document used across runner tests.
#[allow(dead_code)]
pub fn lighthouse_spec() -> DocumentSpec {
    DocumentSpec::new(
        "lighthouse",
        "Lighthouse",
        vec![
            Step::text("concept", "Summarize: {user_prompt}"),
            Step::text("plot", "Plot from: {concept}"),
            Step::image_batch("cover", "Cover for: {plot}", 1, Dimensions::SQUARE),
        ],
    )
    .expect("lighthouse spec is valid")
}
