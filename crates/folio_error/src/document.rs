//! Document definition error types.

/// Specific error conditions for loading and validating document definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DocumentErrorKind {
    /// Failed to read document definition file
    #[display("Failed to read document file: {}", _0)]
    FileRead(String),
    /// Failed to parse TOML content
    #[display("Failed to parse TOML: {}", _0)]
    TomlParse(String),
    /// Document has no steps
    #[display("Document '{}' has no steps", _0)]
    EmptySteps(String),
    /// Two steps share a key
    #[display("Step key '{}' is defined more than once", _0)]
    DuplicateKey(String),
    /// Step key or member name cannot be used as an archive path
    #[display("Invalid name '{}': {}", name, reason)]
    InvalidName {
        /// Offending key or `key/member`
        name: String,
        /// What is wrong with it
        reason: String,
    },
    /// Two outputs would flatten to the same archive entry
    #[display("Archive entry '{}' would be written more than once", _0)]
    EntryCollision(String),
    /// Step uses a key reserved by the runner
    #[display("Step key '{}' is reserved", _0)]
    ReservedKey(String),
    /// Step prompt is empty or contains only whitespace
    #[display("Step '{}' has an empty prompt", _0)]
    EmptyPrompt(String),
    /// Batch step declares no slots
    #[display("Step '{}' declares no slots", _0)]
    EmptyBatch(String),
    /// Template references itself, a later step, or an unknown key
    #[display("Step '{}' references '{}' which is not an earlier step", step, key)]
    ForwardReference {
        /// Step whose template holds the reference
        step: String,
        /// Referenced key
        key: String,
    },
    /// Image size could not be parsed
    #[display("Invalid image dimensions: {}", _0)]
    InvalidDimensions(String),
    /// Table step is malformed
    #[display("Invalid table in step '{}': {}", step, message)]
    InvalidTable {
        /// Step key
        step: String,
        /// What is wrong with the table
        message: String,
    },
    /// No document with this identifier is registered
    #[display("Unknown document type: {}", _0)]
    UnknownDocument(String),
}

/// Error type for document definitions.
///
/// # Examples
///
/// ```
/// use folio_error::{DocumentError, DocumentErrorKind};
///
/// let err = DocumentError::new(DocumentErrorKind::DuplicateKey("plot".to_string()));
/// assert!(format!("{}", err).contains("more than once"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Document Error: {} at line {} in {}", kind, line, file)]
pub struct DocumentError {
    /// The specific error condition
    pub kind: DocumentErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl DocumentError {
    /// Create a new DocumentError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DocumentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
