//! Terminal results of a submitted run.

/// How a run ended. Exactly one outcome is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step ran and the context was packaged
    Completed {
        /// Packaged archive bytes
        archive: Vec<u8>,
        /// File name suggested for saving the archive
        file_name: String,
    },
    /// A fatal error ended the run; nothing was packaged
    Failed(String),
    /// The run honored a cancellation request; nothing was packaged
    Cancelled,
}

impl RunOutcome {
    /// Whether the run produced an archive.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    /// Whether the run failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed(_))
    }

    /// Whether the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }
}
