//! Pipeline execution.
//!
//! [`PipelineRunner`] executes any [`DocumentSpec`] against a fresh
//! [`RunContext`], calling its [`GenerationDriver`] once per text step, once per
//! text batch member and twice per image slot (generate, then fetch).

use crate::{DocumentSpec, ImageSlot, ProgressReporter, Step, StepKind, TextSlot, manifest, table, template};
use folio_core::{Artifact, ArtifactGroup, Dimensions, GroupMember, MASTER_DOCUMENT_KEY, RunContext, RunOutcome};
use folio_error::{GenerationError, PipelineError, PipelineErrorKind, PipelineResult};
use folio_interface::GenerationDriver;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Percent reported when all steps have finished.
const STEPS_DONE_PERCENT: u8 = 91;
/// Percent reported while synthesizing the master document.
const MASTER_DOCUMENT_PERCENT: u8 = 92;
/// Percent reported while packaging.
const PACKAGING_PERCENT: u8 = 96;

/// Tunables for a [`PipelineRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct RunnerConfig {
    /// Image slots generated at the same time within one batch
    image_concurrency: usize,
}

impl RunnerConfig {
    /// Create a config; zero concurrency is raised to one.
    pub fn new(image_concurrency: usize) -> Self {
        Self {
            image_concurrency: image_concurrency.max(1),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Executes document specs using a generation driver.
///
/// The runner holds no per-run state; one instance can serve many concurrent
/// runs, each with its own context.
#[derive(Debug, Clone)]
pub struct PipelineRunner<D: GenerationDriver> {
    driver: D,
    config: RunnerConfig,
}

/// Maps finished generation units onto 1..=91 percent.
struct StepProgress<'a> {
    reporter: &'a ProgressReporter,
    total: usize,
    done: usize,
}

impl StepProgress<'_> {
    fn percent(&self) -> u8 {
        let span = usize::from(STEPS_DONE_PERCENT - 1);
        let scaled = self.done.min(self.total) * span / self.total.max(1);
        1 + u8::try_from(scaled).unwrap_or(STEPS_DONE_PERCENT - 1)
    }

    fn report(&self, message: impl Into<String>) {
        self.reporter.report(self.percent(), message);
    }

    fn advance(&mut self, units: usize, message: impl Into<String>) {
        self.done += units;
        self.report(message);
    }
}

impl<D: GenerationDriver> PipelineRunner<D> {
    /// Create a runner with default settings.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, RunnerConfig::default())
    }

    /// Create a runner with explicit settings.
    pub fn with_config(driver: D, config: RunnerConfig) -> Self {
        Self { driver, config }
    }

    /// The generation driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Active settings.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every step of `spec` and append the master document.
    ///
    /// Cancellation is checked before each step. Any text failure or template
    /// violation ends the run; the partial context is dropped.
    ///
    /// # Errors
    ///
    /// - [`PipelineErrorKind::Cancelled`] when `cancel` fired before a step
    /// - [`PipelineErrorKind::UnresolvedPlaceholder`] for a template naming an
    ///   unknown or later key, raised before the step makes any remote call
    /// - [`PipelineErrorKind::StepFailed`] for a failed text completion or table
    #[instrument(
        name = "pipeline_execute",
        skip_all,
        fields(
            document = %spec.id(),
            run_id = %uuid::Uuid::new_v4(),
            provider = self.driver.provider_name(),
            steps = spec.steps().len(),
        )
    )]
    pub async fn execute(
        &self,
        spec: &DocumentSpec,
        user_prompt: &str,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> PipelineResult<RunContext> {
        let mut context = RunContext::new(user_prompt);
        let total = spec.steps().iter().map(|step| step.unit_count().max(1)).sum();
        let mut tracker = StepProgress {
            reporter: progress,
            total,
            done: 0,
        };

        info!("Starting pipeline run");

        for step in spec.steps() {
            if cancel.is_cancelled() {
                warn!(step = %step.key(), "Run cancelled before step");
                return Err(PipelineError::new(PipelineErrorKind::Cancelled));
            }

            tracker.report(format!("Generating {}...", step.label()));
            let artifact = self.run_step(spec, step, &context, &mut tracker).await?;
            if step.unit_count() == 0 {
                tracker.advance(1, format!("Finished {}", step.label()));
            }
            context.insert(step.key().clone(), artifact);
            debug!(step = %step.key(), "Step complete");
        }

        progress.report(MASTER_DOCUMENT_PERCENT, "Generating master document...");
        let master = manifest::master_document(spec, &context);
        context.insert(MASTER_DOCUMENT_KEY, Artifact::Text(master));

        info!(artifacts = context.len(), "Pipeline run complete");
        Ok(context)
    }

    /// Execute `spec` and package the result, producing a terminal outcome.
    ///
    /// Reports 100 percent only after the archive is built.
    #[instrument(name = "pipeline_generate", skip_all, fields(document = %spec.id()))]
    pub async fn generate(
        &self,
        spec: &DocumentSpec,
        user_prompt: &str,
        progress: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        let context = match self.execute(spec, user_prompt, progress, cancel).await {
            Ok(context) => context,
            Err(e) if e.is_cancelled() => return RunOutcome::Cancelled,
            Err(e) => {
                error!(error = %e, "Pipeline run failed");
                return RunOutcome::Failed(e.kind.to_string());
            }
        };

        if cancel.is_cancelled() {
            warn!("Run cancelled before packaging");
            return RunOutcome::Cancelled;
        }

        progress.report(PACKAGING_PERCENT, "Packaging into ZIP...");
        match folio_archive::pack(&context) {
            Ok(archive) => {
                progress.report(100, "ZIP package created.");
                info!(
                    bytes = archive.len(),
                    digest = %folio_archive::archive_digest(&archive),
                    "Archive packaged"
                );
                RunOutcome::Completed {
                    archive,
                    file_name: format!("{}.zip", spec.id()),
                }
            }
            Err(e) => {
                let err = PipelineError::new(PipelineErrorKind::Packaging(e.kind.to_string()));
                error!(error = %err, "Packaging failed");
                RunOutcome::Failed(err.kind.to_string())
            }
        }
    }

    async fn run_step(
        &self,
        spec: &DocumentSpec,
        step: &Step,
        context: &RunContext,
        tracker: &mut StepProgress<'_>,
    ) -> PipelineResult<Artifact> {
        let key = step.key();
        match step.kind() {
            StepKind::Text { prompt } => {
                let prompt = template::resolve(prompt, context, key)?;
                let text = self
                    .driver
                    .complete_text(spec.system_role_for(step), &prompt)
                    .await
                    .map_err(|e| step_failed(key, &e))?;
                tracker.advance(1, format!("Finished {}", step.label()));
                Ok(Artifact::Text(text))
            }
            StepKind::ImageBatch { prompt, slots } => {
                let group = self.run_images(key, prompt, slots, context, tracker).await?;
                Ok(Artifact::Group(group))
            }
            StepKind::TextBatch { members } => {
                let group = self
                    .run_text_batch(spec, step, members, context, tracker)
                    .await?;
                Ok(Artifact::Group(group))
            }
            StepKind::Table { table } => {
                let csv = table::render_csv(table, context, key)?;
                Ok(Artifact::Binary(csv))
            }
        }
    }

    async fn run_images(
        &self,
        key: &str,
        shared_prompt: &str,
        slots: &[ImageSlot],
        context: &RunContext,
        tracker: &mut StepProgress<'_>,
    ) -> PipelineResult<ArtifactGroup> {
        // Resolve everything up front so a bad template fails before any remote call.
        let mut shared: Option<String> = None;
        let mut requests = Vec::with_capacity(slots.len());
        for slot in slots {
            let body = match slot.prompt() {
                Some(own) => template::resolve(own, context, key)?,
                None => match &shared {
                    Some(resolved) => resolved.clone(),
                    None => shared
                        .insert(template::resolve(shared_prompt, context, key)?)
                        .clone(),
                },
            };
            requests.push((format!("{}{}", slot.prefix(), body), *slot.size()));
        }

        let count = slots.len();
        let mut results = stream::iter(requests)
            .map(|(prompt, size)| async move { self.fetch_image(&prompt, size).await })
            .buffered(*self.config.image_concurrency());

        let mut group = ArtifactGroup::new();
        for (position, slot) in slots.iter().enumerate() {
            let Some(result) = results.next().await else {
                break;
            };
            let index = position + 1;
            match result {
                Ok(bytes) => {
                    group.insert(slot.name().clone(), GroupMember::Binary(bytes));
                    tracker.advance(1, format!("Image {} of {} ready", index, count));
                }
                Err(e) => {
                    warn!(step = %key, slot = %slot.name(), error = %e, "Image slot failed");
                    group.insert(slot.name().clone(), GroupMember::Binary(Vec::new()));
                    tracker.advance(1, format!("Error generating image {}: {}", index, e.reason()));
                }
            }
        }

        Ok(group)
    }

    async fn fetch_image(&self, prompt: &str, size: Dimensions) -> Result<Vec<u8>, GenerationError> {
        let url = self.driver.generate_image(prompt, size).await?;
        self.driver.fetch_bytes(&url).await
    }

    async fn run_text_batch(
        &self,
        spec: &DocumentSpec,
        step: &Step,
        members: &[TextSlot],
        context: &RunContext,
        tracker: &mut StepProgress<'_>,
    ) -> PipelineResult<ArtifactGroup> {
        let key = step.key();
        let prompts = members
            .iter()
            .map(|member| template::resolve(member.prompt(), context, key))
            .collect::<PipelineResult<Vec<_>>>()?;

        let role = spec.system_role_for(step);
        let count = members.len();
        let mut group = ArtifactGroup::new();
        for (index, (member, prompt)) in members.iter().zip(prompts).enumerate() {
            let text = self
                .driver
                .complete_text(role, &prompt)
                .await
                .map_err(|e| {
                    PipelineError::new(PipelineErrorKind::StepFailed {
                        step: key.clone(),
                        reason: format!("{}: {}", member.name(), e.reason()),
                    })
                })?;
            group.insert(member.name().clone(), GroupMember::Text(text));
            tracker.advance(1, format!("{} {} of {} ready", step.label(), index + 1, count));
        }
        Ok(group)
    }
}

#[track_caller]
fn step_failed(step: &str, error: &GenerationError) -> PipelineError {
    PipelineError::new(PipelineErrorKind::StepFailed {
        step: step.to_string(),
        reason: error.reason(),
    })
}
