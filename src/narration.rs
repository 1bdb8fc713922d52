use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::SynthesisError;
use crate::file_utils::FileManager;
use crate::media_utils;
use crate::speech::SpeechBackend;

// @module: Per-page narration synthesis with silent fallback

/// How an audio asset was produced, recorded for diagnostics only.
///
/// Callers must not branch on this: a silent fallback asset is consumed
/// exactly like a synthesized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioProvenance {
    /// Produced by the speech backend in this run
    Synthesized,
    /// Produced by the deterministic silent fallback
    SilentFallback,
    /// Rehydrated from a previous run's artifact; whether that run used the
    /// backend or the fallback is not recorded on disk
    Cached,
}

/// A timed audio asset for one page
#[derive(Debug, Clone)]
pub struct AudioAsset {
    /// 1-based page index this asset belongs to
    pub index: usize,

    /// Path of the encoded audio file
    pub path: PathBuf,

    /// Measured duration in seconds, always positive
    pub duration_secs: f64,

    /// Whether this asset came from the backend or the fallback
    pub provenance: AudioProvenance,
}

/// Turns narration text for one page into a timed audio asset.
///
/// Synthesis goes through the configured speech backend; on any backend
/// failure (timeout, offline, bad status, malformed audio) the synthesizer
/// falls back to a silent asset of fixed nominal duration instead of failing
/// the page. A whole run can therefore complete with zero network access.
pub struct NarrationSynthesizer {
    /// Speech backend, swappable for tests
    backend: Arc<dyn SpeechBackend>,

    /// Narration language code
    language: String,

    /// Duration of the silent fallback in seconds
    silence_secs: f64,
}

impl NarrationSynthesizer {
    /// Create a new synthesizer over the given backend
    pub fn new(backend: Arc<dyn SpeechBackend>, language: &str, silence_secs: f64) -> Self {
        Self {
            backend,
            language: language.to_string(),
            silence_secs,
        }
    }

    /// Deterministic default utterance for a page without narration text
    pub fn default_utterance(index: usize) -> String {
        format!("Slide {}", index)
    }

    /// Replace empty or whitespace-only text with the default utterance so
    /// every page always yields audio
    pub fn prepare_text(text: &str, index: usize) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::default_utterance(index)
        } else {
            trimmed.to_string()
        }
    }

    /// Synthesize narration for one page into `output_path`
    pub async fn synthesize_page(
        &self,
        index: usize,
        text: &str,
        output_path: &Path,
    ) -> Result<AudioAsset> {
        let utterance = Self::prepare_text(text, index);

        match self.try_backend(index, &utterance, output_path).await {
            Ok(asset) => Ok(asset),
            Err(e) => {
                warn!(
                    "Page {}: speech synthesis failed ({}), using silent fallback",
                    index, e
                );
                self.silent_fallback(index, output_path).await
            }
        }
    }

    /// Attempt backend synthesis, verifying the result is playable audio
    async fn try_backend(
        &self,
        index: usize,
        utterance: &str,
        output_path: &Path,
    ) -> Result<AudioAsset, SynthesisError> {
        let bytes = self.backend.synthesize(utterance, &self.language).await?;

        FileManager::write_bytes(output_path, &bytes)
            .map_err(|e| SynthesisError::RequestFailed(e.to_string()))?;

        // A backend can return 200 with an unplayable body; treat an
        // unprobeable file as a malformed response.
        let duration = media_utils::probe_duration(output_path)
            .await
            .map_err(|_| SynthesisError::EmptyResponse)?;

        debug!(
            "Page {}: synthesized {:.2}s of narration via {}",
            index,
            duration,
            self.backend.name()
        );

        Ok(AudioAsset {
            index,
            path: output_path.to_path_buf(),
            duration_secs: duration,
            provenance: AudioProvenance::Synthesized,
        })
    }

    /// Generate the deterministic silent asset
    async fn silent_fallback(&self, index: usize, output_path: &Path) -> Result<AudioAsset> {
        media_utils::create_silent_audio(output_path, self.silence_secs)
            .await
            .with_context(|| format!("Page {}: silent fallback generation failed", index))?;

        // The fallback duration is the configured constant, not a probe
        // result: it must be identical across runs.
        Ok(AudioAsset {
            index,
            path: output_path.to_path_buf(),
            duration_secs: self.silence_secs,
            provenance: AudioProvenance::SilentFallback,
        })
    }

    /// Rehydrate an asset from a cached audio file left by a previous run
    pub async fn from_cached(&self, index: usize, path: &Path) -> Result<AudioAsset> {
        let duration = media_utils::probe_duration(path)
            .await
            .with_context(|| format!("Page {}: cached audio is unreadable", index))?;

        Ok(AudioAsset {
            index,
            path: path.to_path_buf(),
            duration_secs: duration,
            provenance: AudioProvenance::Cached,
        })
    }
}
