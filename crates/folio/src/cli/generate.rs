//! `folio generate` handler.

use std::path::PathBuf;
use std::sync::Arc;

use super::GenerateArgs;
use folio::{
    DocumentRegistry, DocumentSpec, FolioConfig, FolioResult, OpenAiClient, PipelineError,
    PipelineErrorKind, PipelineRunner, RunOutcome, archive_digest, spawn_run, write_archive,
};
use tracing::{info, warn};

/// Run a document to completion, printing progress to stderr.
///
/// Ctrl-C requests cancellation; the run stops before its next step. A second
/// Ctrl-C aborts the run without waiting for the current step. On success
/// the archive path and SHA-256 digest are printed to stdout.
#[tracing::instrument(skip_all)]
pub async fn generate(config: &FolioConfig, args: GenerateArgs) -> FolioResult<()> {
    let spec = match &args.spec {
        Some(path) => DocumentSpec::from_file(path)?,
        None => {
            let id = args.document.as_deref().unwrap_or_default();
            DocumentRegistry::builtin()?.get(id)?.clone()
        }
    };

    let client = OpenAiClient::new(config.openai_config(config.api_key()?)?)?;
    let runner = Arc::new(PipelineRunner::with_config(client, config.runner_config()));

    info!(document = %spec.id(), "Starting generation");
    let mut handle = spawn_run(runner, spec, args.prompt);

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupts = 0;
    loop {
        tokio::select! {
            event = handle.next_progress() => match event {
                Some(event) => eprintln!("{}", event),
                None => break,
            },
            _ = &mut interrupt => {
                interrupts += 1;
                if interrupts == 1 {
                    warn!("Interrupt received, cancelling after the current step");
                    eprintln!("Cancelling... press Ctrl-C again to stop immediately");
                    handle.cancel();
                    interrupt.set(tokio::signal::ctrl_c());
                } else {
                    warn!("Second interrupt received, aborting run");
                    handle.abort();
                    break;
                }
            }
        }
    }

    match handle.outcome().await {
        RunOutcome::Completed { archive, file_name } => {
            let path = args.output.unwrap_or_else(|| PathBuf::from(file_name));
            write_archive(&path, &archive).await?;
            println!("{}", path.display());
            println!("sha256 {}", archive_digest(&archive));
            Ok(())
        }
        RunOutcome::Failed(message) => {
            Err(PipelineError::new(PipelineErrorKind::RunFailed(message)).into())
        }
        RunOutcome::Cancelled => Err(PipelineError::new(PipelineErrorKind::Cancelled).into()),
    }
}
