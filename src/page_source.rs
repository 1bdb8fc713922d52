use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_config::TextMismatchPolicy;
use crate::capabilities::RenderStrategy;
use crate::deck_reader;
use crate::errors::PageExtractionError;
use crate::file_utils::FileManager;
use crate::media_utils::{self, TOOL_TIMEOUT};

// @module: Input document normalization into an ordered page sequence

/// One unit of output: a page image plus its narration text
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page ordinal, dense and gap-free
    pub index: usize,

    /// Path of the rasterized page image
    pub image_path: PathBuf,

    /// Extracted narration text, possibly empty
    pub narration_text: String,
}

/// Normalizes an input document into an ordered page sequence.
///
/// Depending on the strategy selected at startup the input is rasterized
/// directly, converted to a paginated document first, or composed in-process
/// at reduced fidelity. Text extraction runs independently of rasterization
/// and the two are reconciled by the configured mismatch policy.
pub struct PageSource {
    /// Rendering strategy selected once per run
    strategy: RenderStrategy,

    /// Rasterization resolution for document-derived images
    dpi: u32,

    /// Output frame size for the composition fallback
    compose_size: (u32, u32),

    /// Whether the external text extractor is available
    has_text_extractor: bool,

    /// Policy applied on a text/image page-count disagreement
    mismatch_policy: TextMismatchPolicy,
}

impl PageSource {
    /// Create a new page source for one run
    pub fn new(
        strategy: RenderStrategy,
        dpi: u32,
        compose_size: (u32, u32),
        has_text_extractor: bool,
        mismatch_policy: TextMismatchPolicy,
    ) -> Self {
        Self {
            strategy,
            dpi,
            compose_size,
            has_text_extractor,
            mismatch_policy,
        }
    }

    /// Produce the ordered page sequence for the input document.
    ///
    /// Page images land in `pages_dir` under deterministic names
    /// (`page-NNN.png`); `work_dir` receives the converted document when the
    /// input is a deck.
    pub async fn source_pages(
        &self,
        input: &Path,
        work_dir: &Path,
        pages_dir: &Path,
    ) -> Result<Vec<Page>> {
        if !input.exists() {
            return Err(PageExtractionError::UnreadableDocument {
                path: input.to_path_buf(),
                reason: "file not found".to_string(),
            }
            .into());
        }

        FileManager::ensure_dir(pages_dir)?;

        let (images, texts) = match self.strategy {
            RenderStrategy::Rasterize => {
                let images = self.rasterize(input, pages_dir).await?;
                let texts = self.extract_texts(input).await;
                (images, texts)
            }
            RenderStrategy::ConvertThenRasterize => {
                let document = self.convert_deck(input, work_dir).await?;
                let images = self.rasterize(&document, pages_dir).await?;
                let texts = self.extract_texts(&document).await;
                (images, texts)
            }
            RenderStrategy::ComposeInProcess => self.compose(input, pages_dir)?,
        };

        if images.is_empty() {
            return Err(PageExtractionError::NoPages {
                path: input.to_path_buf(),
            }
            .into());
        }

        let pages = Self::pair_pages(images, texts, self.mismatch_policy)?;
        info!("Sourced {} page(s) from {:?}", pages.len(), input);
        Ok(pages)
    }

    /// Reload pages from images cached by a previous run, re-extracting text
    pub async fn source_cached_pages(
        &self,
        input: &Path,
        work_dir: &Path,
        pages_dir: &Path,
    ) -> Result<Vec<Page>> {
        let images = FileManager::collect_page_images(pages_dir)?;
        if images.is_empty() {
            return Err(anyhow!("No cached page images in {:?}", pages_dir));
        }

        let texts = match self.strategy {
            RenderStrategy::Rasterize => self.extract_texts(input).await,
            RenderStrategy::ConvertThenRasterize => {
                let document = Self::converted_document_path(input, work_dir);
                if document.exists() {
                    self.extract_texts(&document).await
                } else {
                    Vec::new()
                }
            }
            RenderStrategy::ComposeInProcess => {
                deck_reader::read_slide_texts(input).unwrap_or_default()
            }
        };

        Self::pair_pages(images, texts, self.mismatch_policy)
    }

    /// Rasterize a paginated document at the configured DPI.
    ///
    /// The rasterizer's own output numbering is renamed to zero-padded
    /// `page-NNN.png` as the final step, so only a fully rasterized set ever
    /// carries the names the page cache recognizes.
    async fn rasterize(&self, document: &Path, pages_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = pages_dir.join("raster");
        let dpi = self.dpi.to_string();

        let output = media_utils::run_tool(
            "pdftoppm",
            &[
                "-png",
                "-r", &dpi,
                document.to_str().unwrap_or_default(),
                prefix.to_str().unwrap_or_default(),
            ],
            TOOL_TIMEOUT,
        )
        .await?;

        if !output.status.success() {
            // A failed rasterization can leave a partial raster set behind;
            // remove it so the next run rebuilds from scratch
            for leftover in FileManager::collect_raster_outputs(pages_dir).unwrap_or_default() {
                let _ = fs::remove_file(leftover);
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageExtractionError::RasterizerFailed {
                path: document.to_path_buf(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let raw = FileManager::collect_raster_outputs(pages_dir)?;
        let mut renamed = Vec::with_capacity(raw.len());
        for (i, path) in raw.iter().enumerate() {
            let target = pages_dir.join(format!("page-{:03}.png", i + 1));
            fs::rename(path, &target)?;
            renamed.push(target);
        }

        debug!("Rasterized {} page(s) at {} DPI", renamed.len(), self.dpi);
        Ok(renamed)
    }

    /// Convert a slide deck to a paginated document via the external converter
    async fn convert_deck(&self, deck: &Path, work_dir: &Path) -> Result<PathBuf> {
        let output = media_utils::run_tool(
            "soffice",
            &[
                "--headless",
                "--convert-to", "pdf",
                "--outdir", work_dir.to_str().unwrap_or_default(),
                deck.to_str().unwrap_or_default(),
            ],
            TOOL_TIMEOUT,
        )
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PageExtractionError::ConversionFailed {
                path: deck.to_path_buf(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let converted = Self::converted_document_path(deck, work_dir);
        if !converted.exists() {
            return Err(PageExtractionError::ConversionFailed {
                path: deck.to_path_buf(),
                stderr: format!("converter reported success but {:?} is missing", converted),
            }
            .into());
        }

        debug!("Converted deck to {:?}", converted);
        Ok(converted)
    }

    /// Path the converter writes its output to
    fn converted_document_path(deck: &Path, work_dir: &Path) -> PathBuf {
        let stem = deck.file_stem().unwrap_or_default().to_string_lossy();
        work_dir.join(format!("{}.pdf", stem))
    }

    /// Extract per-page narration text, one entry per page.
    ///
    /// Text extraction failures are non-fatal: downstream narration defaults
    /// apply wherever text is missing.
    async fn extract_texts(&self, document: &Path) -> Vec<String> {
        if !self.has_text_extractor {
            return Vec::new();
        }

        let output = match media_utils::run_tool(
            "pdftotext",
            &[
                "-layout",
                document.to_str().unwrap_or_default(),
                "-",
            ],
            TOOL_TIMEOUT,
        )
        .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Text extraction failed: {}", e);
                return Vec::new();
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Text extraction failed: {}", stderr.trim());
            return Vec::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        Self::split_pages(&stdout)
    }

    /// Split extractor output into per-page strings on form feeds.
    ///
    /// The extractor terminates every page with a form feed, so a trailing
    /// empty fragment is dropped rather than counted as a page.
    pub fn split_pages(text: &str) -> Vec<String> {
        let mut pages: Vec<String> = text
            .split('\u{c}')
            .map(|page| page.trim().to_string())
            .collect();

        if pages.last().is_some_and(|last| last.is_empty()) {
            pages.pop();
        }

        pages
    }

    /// Degraded composition fallback: plain frames at the output resolution,
    /// with page count and narration text read from the deck in-process
    fn compose(&self, deck: &Path, pages_dir: &Path) -> Result<(Vec<PathBuf>, Vec<String>)> {
        let texts = deck_reader::read_slide_texts(deck).map_err(|e| {
            PageExtractionError::UnreadableDocument {
                path: deck.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let (width, height) = self.compose_size;
        let frame = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));

        let mut images = Vec::with_capacity(texts.len());
        for index in 1..=texts.len() {
            let path = pages_dir.join(format!("page-{:03}.png", index));
            frame
                .save(&path)
                .map_err(|e| anyhow!("Failed to write composed page {}: {}", index, e))?;
            images.push(path);
        }

        warn!(
            "Composed {} low-fidelity page(s) at {}x{}",
            images.len(),
            width,
            height
        );
        Ok((images, texts))
    }

    /// Pair page images with narration texts, reconciling count mismatches.
    ///
    /// The output always has exactly one entry per image, in image order,
    /// with `Page[i].index == i + 1`.
    pub fn pair_pages(
        images: Vec<PathBuf>,
        mut texts: Vec<String>,
        policy: TextMismatchPolicy,
    ) -> Result<Vec<Page>> {
        if texts.len() != images.len() {
            match policy {
                TextMismatchPolicy::TruncatePad => {
                    if !texts.is_empty() {
                        warn!(
                            "Page count mismatch: {} image(s) vs {} text entrie(s), {}",
                            images.len(),
                            texts.len(),
                            if texts.len() > images.len() {
                                "truncating text"
                            } else {
                                "padding with empty text"
                            }
                        );
                    }
                    texts.resize(images.len(), String::new());
                }
                TextMismatchPolicy::Fail => {
                    return Err(PageExtractionError::PageCountMismatch {
                        texts: texts.len(),
                        images: images.len(),
                    }
                    .into());
                }
            }
        }

        let pages = images
            .into_iter()
            .zip(texts)
            .enumerate()
            .map(|(i, (image_path, narration_text))| Page {
                index: i + 1,
                image_path,
                narration_text,
            })
            .collect();

        Ok(pages)
    }
}
