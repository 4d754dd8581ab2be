//! Scripted generation driver for testing.

use async_trait::async_trait;
use folio_core::Dimensions;
use folio_error::{GenerationError, GenerationErrorKind, GenerationResult};
use folio_interface::GenerationDriver;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Text { system_role: String, prompt: String },
    Image { prompt: String, size: Dimensions },
    Fetch { url: String },
}

#[derive(Debug, Default)]
struct Script {
    fail_text: Vec<(String, GenerationErrorKind)>,
    fail_image: Vec<String>,
    delay_image: Vec<(String, Duration)>,
    fail_fetch: Vec<usize>,
    cancel_after_text: Option<(usize, CancellationToken)>,
}

/// Mock driver that answers deterministically and records every call.
///
/// - text calls return `"text for: {prompt}"`
/// - image calls return `mock://image/{n}` with `n` counting from 1
/// - fetches return four bytes of `n`
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    calls: Arc<Mutex<Vec<DriverCall>>>,
    script: Arc<Mutex<Script>>,
    images: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail text calls whose prompt contains `needle`.
    pub fn fail_text_containing(self, needle: &str, kind: GenerationErrorKind) -> Self {
        self.script
            .lock()
            .unwrap()
            .fail_text
            .push((needle.to_string(), kind));
        self
    }

    /// Fail image generation for prompts containing `needle`.
    pub fn fail_image_containing(self, needle: &str) -> Self {
        self.script.lock().unwrap().fail_image.push(needle.to_string());
        self
    }

    /// Hold image generation for prompts containing `needle` for `delay`.
    pub fn delay_image_containing(self, needle: &str, delay: Duration) -> Self {
        self.script
            .lock()
            .unwrap()
            .delay_image
            .push((needle.to_string(), delay));
        self
    }

    /// Fail the fetch of the `n`th generated image URL.
    pub fn fail_fetch_of(self, n: usize) -> Self {
        self.script.lock().unwrap().fail_fetch.push(n);
        self
    }

    /// Cancel `token` once `count` text calls have completed.
    pub fn cancel_after_text_calls(self, count: usize, token: CancellationToken) -> Self {
        self.script.lock().unwrap().cancel_after_text = Some((count, token));
        self
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn text_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Text { prompt, .. } => Some(prompt),
                _ => None,
            })
            .collect()
    }

    /// URLs fetched, in completion order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Fetch { url } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn image_calls(&self) -> Vec<(String, Dimensions)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Image { prompt, size } => Some((prompt, size)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GenerationDriver for ScriptedDriver {
    async fn complete_text(&self, system_role: &str, user_prompt: &str) -> GenerationResult<String> {
        let text_calls = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(DriverCall::Text {
                system_role: system_role.to_string(),
                prompt: user_prompt.to_string(),
            });
            calls
                .iter()
                .filter(|call| matches!(call, DriverCall::Text { .. }))
                .count()
        };

        let script = self.script.lock().unwrap();
        if let Some((count, token)) = &script.cancel_after_text {
            if text_calls >= *count {
                token.cancel();
            }
        }
        if let Some((_, kind)) = script
            .fail_text
            .iter()
            .find(|(needle, _)| user_prompt.contains(needle.as_str()))
        {
            return Err(GenerationError::new(kind.clone()));
        }

        Ok(format!("text for: {}", user_prompt))
    }

    async fn generate_image(&self, prompt: &str, size: Dimensions) -> GenerationResult<String> {
        self.calls.lock().unwrap().push(DriverCall::Image {
            prompt: prompt.to_string(),
            size,
        });

        let n = {
            let mut images = self.images.lock().unwrap();
            *images += 1;
            *images
        };

        let (fails, delay) = {
            let script = self.script.lock().unwrap();
            let fails = script
                .fail_image
                .iter()
                .any(|needle| prompt.contains(needle.as_str()));
            let delay = script
                .delay_image
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, delay)| *delay);
            (fails, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fails {
            return Err(GenerationError::provider(400, "content policy violation"));
        }

        Ok(format!("mock://image/{}", n))
    }

    async fn fetch_bytes(&self, url: &str) -> GenerationResult<Vec<u8>> {
        self.calls.lock().unwrap().push(DriverCall::Fetch {
            url: url.to_string(),
        });

        let n: usize = url
            .rsplit('/')
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| GenerationError::protocol("bad mock url"))?;

        if self.script.lock().unwrap().fail_fetch.contains(&n) {
            return Err(GenerationError::transport("connection reset"));
        }

        Ok(vec![n as u8; 4])
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
