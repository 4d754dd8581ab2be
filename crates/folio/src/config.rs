//! Layered configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Bundled defaults (`include_str!` of the workspace `folio.toml`)
//! 2. `~/.config/folio/folio.toml` (optional)
//! 3. `./folio.toml` (optional)
//! 4. `FOLIO__SECTION__KEY` environment variables
//!
//! The API key never lives in a configuration file. It is read from the
//! environment variable named by `provider.api_key_env`, after loading `.env`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use folio_error::{ConfigError, ConfigErrorKind};
use folio_models::OpenAiConfig;
use folio_pipeline::RunnerConfig;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../folio.toml");

/// Remote provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct ProviderSettings {
    /// API root
    base_url: String,
    /// Chat completion model
    text_model: String,
    /// Image generation model
    image_model: String,
    /// Image quality hint
    image_quality: String,
    /// Image style hint
    image_style: String,
    /// Per-request timeout in seconds
    timeout_secs: u64,
    /// Environment variable holding the API key
    api_key_env: String,
}

/// Pipeline runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct RunnerSettings {
    /// Image slots generated at the same time within one batch
    image_concurrency: usize,
}

/// Complete application configuration.
///
/// # Examples
///
/// ```
/// use folio::FolioConfig;
///
/// let config = FolioConfig::from_toml_str("[runner]\nimage_concurrency = 4").unwrap();
/// assert_eq!(*config.runner().image_concurrency(), 4);
/// assert_eq!(config.provider().text_model(), "gpt-4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct FolioConfig {
    /// `[provider]` section
    provider: ProviderSettings,
    /// `[runner]` section
    runner: RunnerSettings,
}

impl FolioConfig {
    /// Load with the standard precedence.
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut files = Vec::new();
        if let Some(home) = dirs::home_dir() {
            files.push(home.join(".config/folio/folio.toml"));
        }
        files.push(PathBuf::from("folio.toml"));

        Self::assemble(&files, false, None)
    }

    /// Load bundled defaults overlaid by one explicit file and the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or does not parse.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::assemble(&[path.as_ref().to_path_buf()], true, None)
    }

    /// Bundled defaults overlaid by TOML text. No files or environment are read.
    pub fn from_toml_str(overrides: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        Self::finish(config)
    }

    fn assemble(
        files: &[PathBuf],
        required: bool,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        for file in files {
            builder = builder.add_source(
                File::from(file.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| {
            ConfigError::new(ConfigErrorKind::InvalidField {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };
        if self.provider.base_url.trim().is_empty() {
            return Err(invalid("provider.base_url", "must not be empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(invalid("provider.timeout_secs", "must be at least 1"));
        }
        if self.provider.api_key_env.trim().is_empty() {
            return Err(invalid("provider.api_key_env", "must name a variable"));
        }
        Ok(())
    }

    /// Read the API key from the process environment (after loading `.env`).
    ///
    /// # Errors
    ///
    /// [`ConfigErrorKind::MissingApiKey`] when the variable is unset or blank.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let _ = dotenvy::dotenv();
        self.api_key_from(|name| std::env::var(name).ok())
    }

    /// Read the API key through `lookup`, which maps a variable name to its value.
    pub fn api_key_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        let name = &self.provider.api_key_env;
        lookup(name)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingApiKey(name.clone())))
    }

    /// Client settings for the OpenAI provider.
    pub fn openai_config(&self, api_key: String) -> Result<OpenAiConfig, ConfigError> {
        let provider = &self.provider;
        OpenAiConfig::builder()
            .api_key(api_key)
            .base_url(provider.base_url.clone())
            .text_model(provider.text_model.clone())
            .image_model(provider.image_model.clone())
            .image_quality(provider.image_quality.clone())
            .image_style(provider.image_style.clone())
            .timeout_secs(provider.timeout_secs)
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidField {
                    field: "provider".to_string(),
                    reason: e.to_string(),
                })
            })
    }

    /// Runner settings.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::new(self.runner.image_concurrency)
    }
}
