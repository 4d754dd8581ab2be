//! Pipeline execution error types.

/// Specific error conditions that terminate a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Template placeholder names a key not present in the run context
    #[display("Step '{}' references unknown or later key '{}'", step, key)]
    UnresolvedPlaceholder {
        /// Step being resolved
        step: String,
        /// Placeholder key
        key: String,
    },
    /// A fatal generation failure
    #[display("Step '{}' failed: {}", step, reason)]
    StepFailed {
        /// Step that failed
        step: String,
        /// Underlying reason
        reason: String,
    },
    /// Cooperative cancellation was honored
    #[display("Run cancelled")]
    Cancelled,
    /// The finished context could not be packaged
    #[display("Packaging failed: {}", _0)]
    Packaging(String),
    /// A background run ended with a failure outcome
    #[display("Run failed: {}", _0)]
    RunFailed(String),
}

/// Error type for pipeline runs.
///
/// # Examples
///
/// ```
/// use folio_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::StepFailed {
///     step: "plot".to_string(),
///     reason: "Transport error: connection reset".to_string(),
/// });
/// assert_eq!(
///     err.kind.to_string(),
///     "Step 'plot' failed: Transport error: connection reset"
/// );
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether this error records a honored cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, PipelineErrorKind::Cancelled)
    }
}

/// Result type for pipeline runs.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
