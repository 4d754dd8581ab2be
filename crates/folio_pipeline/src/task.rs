//! Background execution with progress, cancellation and a single outcome.

use std::sync::Arc;

use crate::{DocumentSpec, PipelineRunner, ProgressReporter};
use folio_core::{ProgressEvent, RunOutcome};
use folio_interface::GenerationDriver;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info_span};

/// Handle to a run started with [`spawn_run`].
///
/// Drain [`next_progress`](Self::next_progress) until it returns `None` (the
/// run has finished), then await [`outcome`](Self::outcome).
#[derive(Debug)]
pub struct RunHandle {
    progress: UnboundedReceiver<ProgressEvent>,
    cancel: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Progress receiver, for use in `select!` loops.
    pub fn progress(&mut self) -> &mut UnboundedReceiver<ProgressEvent> {
        &mut self.progress
    }

    /// Next progress event, or `None` once the run has ended.
    pub async fn next_progress(&mut self) -> Option<ProgressEvent> {
        self.progress.recv().await
    }

    /// Request cooperative cancellation. Takes effect before the next step.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the run immediately, dropping any in-flight remote call.
    ///
    /// The outcome becomes [`RunOutcome::Cancelled`] unless the run had
    /// already finished.
    pub fn abort(&self) {
        self.cancel.cancel();
        self.task.abort();
    }

    /// Whether the run has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the terminal outcome.
    pub async fn outcome(self) -> RunOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => RunOutcome::Cancelled,
            Err(e) => {
                error!(error = %e, "Run task did not complete");
                RunOutcome::Failed(format!("Run task did not complete: {}", e))
            }
        }
    }
}

/// Start `spec` on a tokio task and return a handle to it.
///
/// The runner is shared; each run gets its own context, progress channel and
/// cancellation token.
pub fn spawn_run<D>(
    runner: Arc<PipelineRunner<D>>,
    spec: DocumentSpec,
    user_prompt: impl Into<String>,
) -> RunHandle
where
    D: GenerationDriver + 'static,
{
    let user_prompt = user_prompt.into();
    let (sender, receiver) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let span = info_span!("run_task", document = %spec.id());

    let task = tokio::spawn(
        async move {
            let reporter = ProgressReporter::new(sender);
            runner.generate(&spec, &user_prompt, &reporter, &token).await
        }
        .instrument(span),
    );

    RunHandle {
        progress: receiver,
        cancel,
        task,
    }
}
