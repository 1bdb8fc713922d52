/*!
 * Startup capability probe for external tools.
 *
 * The pipeline delegates all heavy work (rasterization, conversion, text
 * extraction, encoding) to external programs. Availability is probed exactly
 * once at orchestrator startup; the stages consult the resulting record
 * instead of performing ad hoc runtime checks.
 */

use log::{debug, warn};
use tokio::process::Command;

use crate::errors::MissingDependency;
use crate::file_utils::DocumentKind;

/// Record of which external tools are available on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// ffmpeg, the audio/video encoder (required)
    pub encoder: bool,
    /// ffprobe, the stream inspector (required)
    pub prober: bool,
    /// pdftoppm, the document rasterizer
    pub rasterizer: bool,
    /// soffice, the deck-to-document converter (optional)
    pub converter: bool,
    /// pdftotext, the per-page text extractor (optional)
    pub text_extractor: bool,
}

impl Capabilities {
    /// Probe the execution path for every external tool the pipeline may use
    pub async fn detect() -> Self {
        let capabilities = Self {
            encoder: tool_present("ffmpeg", "-version").await,
            prober: tool_present("ffprobe", "-version").await,
            rasterizer: tool_present("pdftoppm", "-v").await,
            converter: tool_present("soffice", "--version").await,
            text_extractor: tool_present("pdftotext", "-v").await,
        };

        debug!("Detected capabilities: {:?}", capabilities);

        if !capabilities.converter {
            warn!("LibreOffice (soffice) not found, deck inputs need the composition fallback");
        }
        if !capabilities.text_extractor {
            warn!("pdftotext not found, pages will be narrated with default utterances");
        }

        capabilities
    }

    /// Verify the tools every run depends on, regardless of input kind.
    ///
    /// Absence of a required tool is a startup-time fatal check, not a
    /// per-page failure.
    pub fn ensure_required(&self) -> Result<(), MissingDependency> {
        if !self.encoder {
            return Err(MissingDependency::RequiredTool {
                tool: "ffmpeg".to_string(),
                hint: "install FFmpeg from https://ffmpeg.org/download.html".to_string(),
            });
        }

        if !self.prober {
            return Err(MissingDependency::RequiredTool {
                tool: "ffprobe".to_string(),
                hint: "ffprobe ships with FFmpeg, install it from https://ffmpeg.org/download.html"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Select the rendering strategy for this run based on the input kind.
    ///
    /// The fallback chain (preferred tool, then degraded in-process
    /// composition) is resolved here once per run, not branched per page.
    pub fn select_strategy(
        &self,
        kind: DocumentKind,
        allow_composition_fallback: bool,
    ) -> Result<RenderStrategy, MissingDependency> {
        match kind {
            DocumentKind::Paginated => {
                if self.rasterizer {
                    Ok(RenderStrategy::Rasterize)
                } else {
                    Err(MissingDependency::RequiredTool {
                        tool: "pdftoppm".to_string(),
                        hint: "install poppler-utils".to_string(),
                    })
                }
            }
            DocumentKind::Deck => {
                if self.converter && self.rasterizer {
                    Ok(RenderStrategy::ConvertThenRasterize)
                } else if allow_composition_fallback {
                    warn!("Deck converter unavailable, using low-fidelity in-process composition");
                    Ok(RenderStrategy::ComposeInProcess)
                } else if self.converter {
                    Err(MissingDependency::RequiredTool {
                        tool: "pdftoppm".to_string(),
                        hint: "install poppler-utils".to_string(),
                    })
                } else {
                    Err(MissingDependency::ConverterUnavailable {
                        tool: "soffice".to_string(),
                    })
                }
            }
            DocumentKind::Unknown => Err(MissingDependency::RequiredTool {
                tool: "none".to_string(),
                hint: "unsupported input format, expected a PDF or slide deck".to_string(),
            }),
        }
    }
}

/// Check whether an executable can be spawned at all.
///
/// The exit status is ignored on purpose: some tools print their version to
/// stderr with a non-zero status, and all that matters here is presence.
async fn tool_present(program: &str, version_arg: &str) -> bool {
    Command::new(program)
        .arg(version_arg)
        .output()
        .await
        .is_ok()
}

/// Rendering strategy selected once per run from the capability record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Rasterize the paginated input directly at the configured DPI
    Rasterize,
    /// Convert the deck to a paginated document first, then rasterize
    ConvertThenRasterize,
    /// Degraded in-process composition at a fixed output resolution
    ComposeInProcess,
}
