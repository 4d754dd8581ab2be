//! Archive error types.

/// Kinds of archive errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ArchiveErrorKind {
    /// The container encoder rejected an entry
    #[display("Failed to encode archive: {}", _0)]
    Zip(String),
    /// Failed to create the destination directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write the archive file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
}

/// Archive error with location tracking.
///
/// # Examples
///
/// ```
/// use folio_error::{ArchiveError, ArchiveErrorKind};
///
/// let err = ArchiveError::new(ArchiveErrorKind::FileWrite("/tmp/out.zip: denied".to_string()));
/// assert!(format!("{}", err).contains("Failed to write"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Archive Error: {} at line {} in {}", kind, line, file)]
pub struct ArchiveError {
    /// The kind of error that occurred
    pub kind: ArchiveErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ArchiveError {
    /// Create a new archive error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ArchiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for archive operations.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
