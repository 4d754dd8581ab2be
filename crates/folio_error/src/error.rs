//! Top-level error wrapper types.

use crate::{ArchiveError, ConfigError, DocumentError, GenerationError, PipelineError};

/// Every error a folio operation can surface.
///
/// # Examples
///
/// ```
/// use folio_error::{FolioError, GenerationError};
///
/// let err: FolioError = GenerationError::transport("connection refused").into();
/// assert!(format!("{}", err).contains("Transport error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FolioErrorKind {
    /// Remote generation call failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Document definition could not be loaded or validated
    #[from(DocumentError)]
    Document(DocumentError),
    /// Pipeline run terminated
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Archive could not be built or written
    #[from(ArchiveError)]
    Archive(ArchiveError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Folio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use folio_error::{ConfigError, ConfigErrorKind, FolioResult};
///
/// fn might_fail() -> FolioResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Load("missing file".to_string())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Folio Error: {}", _0)]
pub struct FolioError(Box<FolioErrorKind>);

impl FolioError {
    /// Create a new error from a kind.
    pub fn new(kind: FolioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FolioErrorKind {
        &self.0
    }
}

impl<T> From<T> for FolioError
where
    T: Into<FolioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for folio operations.
pub type FolioResult<T> = std::result::Result<T, FolioError>;
