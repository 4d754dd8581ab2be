//! Configuration error types.

/// Specific configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// The merged configuration does not match the expected shape
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// The credential environment variable is unset or empty
    #[display("API key not found in environment variable {}", _0)]
    MissingApiKey(String),
    /// The HTTP client could not be constructed
    #[display("Failed to initialize HTTP client: {}", _0)]
    Client(String),
    /// A field holds an unusable value
    #[display("Invalid value for '{}': {}", field, reason)]
    InvalidField {
        /// Field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use folio_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific error condition
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
