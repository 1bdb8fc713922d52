/*!
 * Pipeline orchestrator.
 *
 * Drives sourcing, narration, rendering, and assembly in dependency order
 * over a content-addressed working area. Per-page narration and rendering
 * run concurrently up to a configured limit; assembly is a single barrier
 * that waits for every page's scene.
 */

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::assembler::SequenceAssembler;
use crate::capabilities::Capabilities;
use crate::errors::SceneRenderError;
use crate::file_utils::{DocumentKind, FileManager};
use crate::narration::{AudioAsset, NarrationSynthesizer};
use crate::page_source::{Page, PageSource};
use crate::scene::{Scene, SceneRenderer};
use crate::speech::gtts::GoogleSpeech;

use super::manifest::{Manifest, ManifestEntry};
use super::working_area::WorkingArea;

/// Run states, entered strictly in order; `Failed` is absorbing and
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Working area prepared, nothing sourced yet
    Init,
    /// Page images and texts exist for every page
    Sourced,
    /// Audio assets exist for every page
    Narrated,
    /// Scenes exist for every page
    Rendered,
    /// The final artifact has been concatenated
    Assembled,
    /// Run finished successfully
    Done,
    /// Run aborted on an unrecovered error
    Failed,
}

impl RunState {
    /// The linear successor state, if any
    pub fn next(self) -> Option<RunState> {
        match self {
            RunState::Init => Some(RunState::Sourced),
            RunState::Sourced => Some(RunState::Narrated),
            RunState::Narrated => Some(RunState::Rendered),
            RunState::Rendered => Some(RunState::Assembled),
            RunState::Assembled => Some(RunState::Done),
            RunState::Done | RunState::Failed => None,
        }
    }

    /// Whether a transition to `next` is legal
    pub fn can_advance_to(self, next: RunState) -> bool {
        if next == RunState::Failed {
            return self != RunState::Done;
        }
        self.next() == Some(next)
    }

    /// Whether the run has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// Summary of a successful run
#[derive(Debug)]
pub struct RunOutcome {
    /// Path of the final artifact
    pub output_path: PathBuf,

    /// Number of pages in the output
    pub pages: usize,

    /// Sum of all scene durations in seconds
    pub total_duration_secs: f64,
}

/// Drives the stages in dependency order and decides what is cached
/// versus rebuilt.
pub struct PipelineOrchestrator {
    /// Application configuration
    config: Config,

    /// Capability record probed at startup
    capabilities: Capabilities,

    /// Current run state
    state: RunState,
}

impl PipelineOrchestrator {
    /// Create an orchestrator for one run
    pub fn new(config: Config, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
            state: RunState::Init,
        }
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the whole pipeline.
    ///
    /// On any unrecovered error the run transitions to `Failed` and partial
    /// artifacts are left in the working area for inspection.
    pub async fn run(&mut self, clean: bool) -> Result<RunOutcome> {
        match self.run_inner(clean).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let stage = self.state;
                self.state = RunState::Failed;
                error!("Pipeline failed after reaching {:?}: {}", stage, e);
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, clean: bool) -> Result<RunOutcome> {
        // Startup-time fatal checks, before any stage runs
        self.capabilities.ensure_required()?;

        let input = self.config.input_path();
        if !FileManager::file_exists(&input) {
            return Err(anyhow!("Input document not found: {:?}", input));
        }

        let kind = FileManager::detect_document_kind(&input);
        if kind == DocumentKind::Unknown {
            return Err(anyhow!(
                "Unsupported input format: {:?} (expected a PDF or slide deck)",
                input
            ));
        }

        let strategy = self
            .capabilities
            .select_strategy(kind, self.config.run.allow_composition_fallback)?;

        let area = WorkingArea::new(&self.config.work_dir);
        area.prepare(clean)?;
        FileManager::ensure_dir(&self.config.output_dir)?;

        info!("Processing {:?} with strategy {:?}", input, strategy);

        // Sourcing
        let pages = self.source_pages(&input, &area, strategy, clean).await?;
        self.advance(RunState::Sourced)?;

        // Narration, concurrent per page
        let audios = self.narrate_pages(&pages, &area, clean).await?;
        self.advance(RunState::Narrated)?;

        // Rendering, concurrent per page
        let mut manifest = Manifest::new(
            area.concat_list_path(),
            self.output_path(&input),
        );
        let scenes = self
            .render_scenes(&pages, &audios, &area, clean, &mut manifest)
            .await?;
        self.advance(RunState::Rendered)?;

        // Assembly barrier: every page must have reached Rendered
        manifest.verify_complete(pages.len())?;

        let output_path = SequenceAssembler::assemble(
            &scenes,
            &manifest.concat_list_path,
            &manifest.output_path,
        )
        .await?;
        self.advance(RunState::Assembled)?;

        let total_duration_secs = scenes.iter().map(|s| s.duration_secs).sum();
        self.advance(RunState::Done)?;

        Ok(RunOutcome {
            output_path,
            pages: pages.len(),
            total_duration_secs,
        })
    }

    /// Resolved path of the final artifact, named after the input document
    fn output_path(&self, input: &std::path::Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        self.config.output_dir.join(format!("{}.mp4", stem))
    }

    /// Legal state transition, logged; an illegal transition is a bug
    fn advance(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(anyhow!(
                "Illegal state transition {:?} -> {:?}",
                self.state,
                next
            ));
        }
        debug!("Pipeline state {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Source the page sequence, reusing cached page images when possible
    async fn source_pages(
        &self,
        input: &std::path::Path,
        area: &WorkingArea,
        strategy: crate::capabilities::RenderStrategy,
        clean: bool,
    ) -> Result<Vec<Page>> {
        let source = PageSource::new(
            strategy,
            self.config.video.dpi,
            (self.config.video.width, self.config.video.height),
            self.capabilities.text_extractor,
            self.config.run.text_mismatch_policy,
        );

        if !clean && area.has_cached_pages() {
            info!("Reusing cached page images from {:?}", area.pages_dir());
            source
                .source_cached_pages(input, area.root(), &area.pages_dir())
                .await
        } else {
            source.source_pages(input, area.root(), &area.pages_dir()).await
        }
    }

    /// Narrate all pages concurrently, returning assets in page order.
    ///
    /// Synthesis failures are recovered inside the synthesizer via the
    /// silent fallback; an error here means even the fallback could not be
    /// produced, which is fatal.
    async fn narrate_pages(
        &self,
        pages: &[Page],
        area: &WorkingArea,
        clean: bool,
    ) -> Result<Vec<AudioAsset>> {
        let backend = Arc::new(GoogleSpeech::new(
            self.config.narration.timeout_secs,
            self.config.narration.max_chars_per_request,
        ));
        let synthesizer = Arc::new(NarrationSynthesizer::new(
            backend,
            &self.config.language,
            self.config.narration.silence_secs,
        ));

        let progress = self.page_progress(pages.len(), "narrating");

        let results = stream::iter(pages.iter().map(|page| {
            let synthesizer = synthesizer.clone();
            let area = area.clone();
            let progress = progress.clone();
            let index = page.index;
            let text = page.narration_text.clone();

            async move {
                let path = area.audio_path(index);

                let result = if !clean && FileManager::file_exists(&path) {
                    match synthesizer.from_cached(index, &path).await {
                        Ok(asset) => {
                            debug!("Page {}: reusing cached audio", index);
                            Ok(asset)
                        }
                        Err(e) => {
                            warn!("Page {}: cached audio unusable ({}), resynthesizing", index, e);
                            synthesizer.synthesize_page(index, &text, &path).await
                        }
                    }
                } else {
                    synthesizer.synthesize_page(index, &text, &path).await
                };

                progress.inc(1);
                (index, result)
            }
        }))
        .buffer_unordered(self.config.run.concurrency)
        .collect::<Vec<_>>()
        .await;

        progress.finish_and_clear();

        // Completion order is arbitrary, output order is page order
        let mut sorted = results;
        sorted.sort_by_key(|(index, _)| *index);

        let mut audios = Vec::with_capacity(sorted.len());
        for (index, result) in sorted {
            let asset =
                result.with_context(|| format!("Page {}: narration could not be produced", index))?;
            audios.push(asset);
        }

        Ok(audios)
    }

    /// Render all scenes concurrently, recording manifest entries in page
    /// order.
    ///
    /// A page's render failure is fatal for the run, but sibling pages are
    /// allowed to finish first so their artifacts remain for inspection.
    async fn render_scenes(
        &self,
        pages: &[Page],
        audios: &[AudioAsset],
        area: &WorkingArea,
        clean: bool,
        manifest: &mut Manifest,
    ) -> Result<Vec<Scene>> {
        let renderer = Arc::new(SceneRenderer::new(
            self.config.video.width,
            self.config.video.height,
            self.config.video.fps,
            self.config.background.clone(),
        ));

        let progress = self.page_progress(pages.len(), "rendering");

        let results = stream::iter(pages.iter().zip(audios.iter()).map(|(page, audio)| {
            let renderer = renderer.clone();
            let area = area.clone();
            let progress = progress.clone();
            let image_path = page.image_path.clone();
            let audio = audio.clone();

            async move {
                let index = audio.index;
                let path = area.scene_path(index);

                let result: Result<Scene, SceneRenderError> =
                    if !clean && FileManager::file_exists(&path) {
                        debug!("Page {}: reusing cached scene", index);
                        Ok(Scene {
                            index,
                            path,
                            duration_secs: audio.duration_secs,
                        })
                    } else {
                        renderer.render(&image_path, &audio, &path).await
                    };

                progress.inc(1);
                (index, result)
            }
        }))
        .buffer_unordered(self.config.run.concurrency)
        .collect::<Vec<_>>()
        .await;

        progress.finish_and_clear();

        let mut sorted = results;
        sorted.sort_by_key(|(index, _)| *index);

        let mut scenes = Vec::with_capacity(sorted.len());
        let mut failures = Vec::new();

        for ((index, result), page) in sorted.into_iter().zip(pages) {
            match result {
                Ok(scene) => {
                    manifest.record(ManifestEntry {
                        index,
                        image_path: page.image_path.clone(),
                        audio_path: area.audio_path(index),
                        scene_path: scene.path.clone(),
                    });
                    scenes.push(scene);
                }
                Err(e) => {
                    error!("{}", e);
                    failures.push(index);
                }
            }
        }

        if !failures.is_empty() {
            return Err(anyhow!(
                "Scene rendering failed for page(s) {:?}, assembly skipped",
                failures
            ));
        }

        Ok(scenes)
    }

    /// Progress bar over pages for one concurrent phase
    fn page_progress(&self, total: usize, phase: &str) -> ProgressBar {
        let progress = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));
        progress.set_message(phase.to_string());
        progress
    }
}
