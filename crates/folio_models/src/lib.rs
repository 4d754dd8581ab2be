//! Generation provider integrations for Folio.
//!
//! This crate provides concrete [`GenerationDriver`](folio_interface::GenerationDriver)
//! implementations. The only provider today is the OpenAI-compatible HTTP API
//! (chat completions for text, image generations for pictures).
//!
//! # Example
//!
//! ```no_run
//! use folio_core::Dimensions;
//! use folio_interface::GenerationDriver;
//! use folio_models::{OpenAiClient, OpenAiConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(OpenAiConfig::new(std::env::var("OPENAI_API_KEY")?))?;
//! let concept = client
//!     .complete_text("You are a helpful assistant.", "Invent a comic book hero")
//!     .await?;
//! let url = client.generate_image(&concept, Dimensions::SQUARE).await?;
//! let png = client.fetch_bytes(&url).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{OpenAiClient, OpenAiConfig, OpenAiConfigBuilder, OpenAiConfigBuilderError};
