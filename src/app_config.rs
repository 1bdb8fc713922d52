use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory containing the input document
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving the final video
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Working directory for intermediate stage outputs
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Input document filename inside the input directory
    #[serde(default = "default_input_file")]
    pub input_file: String,

    /// Narration language code (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional background image the slide is overlaid on
    #[serde(default)]
    pub background: Option<PathBuf>,

    /// Video output settings
    #[serde(default)]
    pub video: VideoConfig,

    /// Narration settings
    #[serde(default)]
    pub narration: NarrationConfig,

    /// Pipeline behavior settings
    #[serde(default)]
    pub run: RunConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output video parameters.
///
/// Every scene is encoded with these exact parameters so the final
/// concatenation can stream-copy without re-encoding.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoConfig {
    /// Output frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Output frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Output frame rate, identical across all scenes
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Rasterization resolution for paginated documents
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            dpi: default_dpi(),
        }
    }
}

/// Narration synthesis parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NarrationConfig {
    /// Request timeout in seconds for the speech backend
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Duration of the silent fallback audio in seconds
    #[serde(default = "default_silence_secs")]
    pub silence_secs: f64,

    /// Maximum characters per speech request, longer text is chunked
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            silence_secs: default_silence_secs(),
            max_chars_per_request: default_max_chars_per_request(),
        }
    }
}

/// Pipeline behavior parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunConfig {
    /// Maximum number of pages narrated/rendered concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Policy applied when text extraction disagrees with the image count
    #[serde(default)]
    pub text_mismatch_policy: TextMismatchPolicy,

    /// Allow in-process slide composition when the deck converter is absent
    #[serde(default)]
    pub allow_composition_fallback: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            text_mismatch_policy: TextMismatchPolicy::default(),
            allow_composition_fallback: false,
        }
    }
}

/// Policy for reconciling a text/image page-count disagreement
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextMismatchPolicy {
    /// Truncate or pad the text list to the image count, warn and continue
    #[default]
    TruncatePad,
    /// Treat the disagreement as a fatal page extraction error
    Fail,
}

/// Log level for application logging
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            work_dir: default_work_dir(),
            input_file: default_input_file(),
            language: default_language(),
            background: None,
            video: VideoConfig::default(),
            narration: NarrationConfig::default(),
            run: RunConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and CLI overrides
    pub fn validate(&self) -> Result<()> {
        if self.input_file.trim().is_empty() {
            return Err(anyhow!("Input filename must not be empty"));
        }

        if isolang::Language::from_639_1(&self.language.to_lowercase()).is_none() {
            return Err(anyhow!(
                "Invalid language code '{}', expected an ISO 639-1 code like 'en' or 'id'",
                self.language
            ));
        }

        // yuv420p requires even frame dimensions
        if self.video.width == 0 || self.video.height == 0 {
            return Err(anyhow!("Video dimensions must be non-zero"));
        }
        if self.video.width % 2 != 0 || self.video.height % 2 != 0 {
            return Err(anyhow!(
                "Video dimensions must be even, got {}x{}",
                self.video.width,
                self.video.height
            ));
        }

        if self.video.fps == 0 {
            return Err(anyhow!("Frame rate must be at least 1"));
        }

        if self.video.dpi == 0 {
            return Err(anyhow!("Rasterization DPI must be at least 1"));
        }

        if self.narration.silence_secs <= 0.0 {
            return Err(anyhow!("Silent fallback duration must be positive"));
        }

        if self.narration.max_chars_per_request == 0 {
            return Err(anyhow!("Max characters per speech request must be at least 1"));
        }

        if self.run.concurrency == 0 {
            return Err(anyhow!("Concurrency must be at least 1"));
        }

        Ok(())
    }

    /// Resolved path of the input document
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(&self.input_file)
    }
}

// Default value functions for serde

fn default_input_dir() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("work")
}

fn default_input_file() -> String {
    "slides.pptx".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_fps() -> u32 {
    30
}

fn default_dpi() -> u32 {
    300
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_silence_secs() -> f64 {
    3.0
}

fn default_max_chars_per_request() -> usize {
    200
}

fn default_concurrency() -> usize {
    4
}
