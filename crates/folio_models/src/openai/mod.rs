//! OpenAI-compatible chat completion and image generation client.

mod client;
mod config;
mod dto;

pub use client::OpenAiClient;
pub use config::{OpenAiConfig, OpenAiConfigBuilder, OpenAiConfigBuilderError};
