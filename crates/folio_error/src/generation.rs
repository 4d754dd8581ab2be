//! Generation client error types.

/// Failure classes for a single remote generation call.
///
/// Every variant carries the human-readable reason that ends up in progress
/// messages and terminal failure messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Network or connectivity failure talking to a remote service
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Well-formed response signaling a remote-side failure (quota, content policy, etc.)
    #[display("Provider error (HTTP {}): {}", status, message)]
    Provider {
        /// HTTP status code of the response
        status: u16,
        /// Message reported by the provider, or the raw body when it had none
        message: String,
    },
    /// Response did not have the expected shape
    #[display("Protocol error: {}", _0)]
    Protocol(String),
}

/// Error returned by a generation client call.
///
/// # Examples
///
/// ```
/// use folio_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Provider {
///     status: 429,
///     message: "Rate limit reached".to_string(),
/// });
/// assert!(err.reason().contains("Rate limit reached"));
/// assert!(err.is_provider());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a transport failure.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Transport(message.into()))
    }

    /// Shorthand for a provider-reported failure.
    #[track_caller]
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Provider {
            status,
            message: message.into(),
        })
    }

    /// Shorthand for a malformed response.
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Protocol(message.into()))
    }

    /// Human-readable reason without the source location suffix.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }

    /// Whether the failure happened before a response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, GenerationErrorKind::Transport(_))
    }

    /// Whether the provider answered with an error.
    pub fn is_provider(&self) -> bool {
        matches!(self.kind, GenerationErrorKind::Provider { .. })
    }

    /// Whether the response could not be understood.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, GenerationErrorKind::Protocol(_))
    }
}

/// Result type for generation client calls.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
