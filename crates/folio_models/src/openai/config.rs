//! Immutable client configuration.

use derive_builder::Builder;

/// Default API root for OpenAI.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection and model settings for [`OpenAiClient`](crate::OpenAiClient).
///
/// The API key is opaque: it is sent as a bearer token and never printed.
///
/// # Examples
///
/// ```
/// use folio_models::OpenAiConfig;
///
/// let config = OpenAiConfig::builder()
///     .api_key("sk-secret")
///     .text_model("gpt-4o")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.text_model(), "gpt-4o");
/// assert_eq!(config.image_model(), "dall-e-3");
/// assert!(!format!("{:?}", config).contains("sk-secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct OpenAiConfig {
    /// Bearer credential
    #[getter(skip)]
    api_key: String,
    /// API root, without trailing slash
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Chat completion model
    #[builder(default = "\"gpt-4\".to_string()")]
    text_model: String,
    /// Image generation model
    #[builder(default = "\"dall-e-3\".to_string()")]
    image_model: String,
    /// Image quality hint
    #[builder(default = "\"hd\".to_string()")]
    image_quality: String,
    /// Image style hint
    #[builder(default = "\"vivid\".to_string()")]
    image_style: String,
    /// Per-request timeout in seconds
    #[builder(default = "120")]
    timeout_secs: u64,
}

impl OpenAiConfig {
    /// Configuration with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "gpt-4".to_string(),
            image_model: "dall-e-3".to_string(),
            image_quality: "hd".to_string(),
            image_style: "vivid".to_string(),
            timeout_secs: 120,
        }
    }

    /// Start a builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("image_quality", &self.image_quality)
            .field("image_style", &self.image_style)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
