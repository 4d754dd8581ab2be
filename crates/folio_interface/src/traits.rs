//! Generation client contract.

use async_trait::async_trait;
use folio_core::Dimensions;
use folio_error::GenerationResult;
use std::sync::Arc;

/// Request/response access to a text-completion and an image-generation service.
///
/// Implementations hold only immutable configuration and must be safe to share
/// across concurrent runs. Each method performs exactly one remote call and
/// never retries; errors are returned to the caller, which decides whether
/// they are fatal.
#[async_trait]
pub trait GenerationDriver: Send + Sync {
    /// Complete a single chat turn made of a system instruction and a user message.
    async fn complete_text(&self, system_role: &str, user_prompt: &str)
    -> GenerationResult<String>;

    /// Request one image and return the URL it can be fetched from.
    async fn generate_image(&self, prompt: &str, size: Dimensions) -> GenerationResult<String>;

    /// Download raw bytes from a URL returned by [`generate_image`](Self::generate_image).
    async fn fetch_bytes(&self, url: &str) -> GenerationResult<Vec<u8>>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<D: GenerationDriver + ?Sized> GenerationDriver for Arc<D> {
    async fn complete_text(
        &self,
        system_role: &str,
        user_prompt: &str,
    ) -> GenerationResult<String> {
        (**self).complete_text(system_role, user_prompt).await
    }

    async fn generate_image(&self, prompt: &str, size: Dimensions) -> GenerationResult<String> {
        (**self).generate_image(prompt, size).await
    }

    async fn fetch_bytes(&self, url: &str) -> GenerationResult<Vec<u8>> {
        (**self).fetch_bytes(url).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
