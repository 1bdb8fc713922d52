/*!
 * Error types for the deckcast application.
 *
 * This module contains custom error types for the different pipeline stages,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the startup capability probe
#[derive(Error, Debug)]
pub enum MissingDependency {
    /// A tool the whole pipeline depends on is absent
    #[error("Required tool '{tool}' was not found on PATH: {hint}")]
    RequiredTool {
        /// Name of the missing executable
        tool: String,
        /// Installation hint shown to the user
        hint: String,
    },

    /// The deck-to-document converter is absent and no fallback is enabled
    #[error("Deck input requires '{tool}' which was not found, and the composition fallback is disabled")]
    ConverterUnavailable {
        /// Name of the missing converter executable
        tool: String,
    },
}

/// Errors that can occur while sourcing pages from the input document
#[derive(Error, Debug)]
pub enum PageExtractionError {
    /// The input document could not be read at all
    #[error("Input document is unreadable: {path:?}: {reason}")]
    UnreadableDocument {
        /// Path to the offending document
        path: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// Rasterization produced no page images
    #[error("Rasterization of {path:?} produced no page images")]
    NoPages {
        /// Path to the rasterized document
        path: PathBuf,
    },

    /// The external rasterizer exited with an error
    #[error("Rasterizer failed for {path:?}: {stderr}")]
    RasterizerFailed {
        /// Path to the rasterized document
        path: PathBuf,
        /// Filtered stderr of the rasterizer
        stderr: String,
    },

    /// Deck-to-document conversion failed
    #[error("Conversion of {path:?} to a paginated document failed: {stderr}")]
    ConversionFailed {
        /// Path to the deck
        path: PathBuf,
        /// Filtered stderr of the converter
        stderr: String,
    },

    /// The extracted text page count disagrees with the image count and the
    /// strict mismatch policy is active
    #[error("Text extraction yielded {texts} entries for {images} page images")]
    PageCountMismatch {
        /// Number of extracted text entries
        texts: usize,
        /// Number of rasterized page images
        images: usize,
    },
}

/// Errors from the speech synthesis backend.
///
/// These are always recovered locally with the silent-audio fallback and
/// never surface as a run failure; they exist so the fallback site can log
/// what went wrong.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The HTTP request failed outright (offline, DNS, connection refused)
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    /// The backend responded with a non-success status
    #[error("Speech backend responded with status {status}")]
    BackendStatus {
        /// HTTP status code
        status: u16,
    },

    /// The backend returned an empty or unusable body
    #[error("Speech backend returned an empty response")]
    EmptyResponse,

    /// The bounded request timeout elapsed
    #[error("Speech request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },
}

/// Errors that fail a single page's scene render.
///
/// Unlike synthesis failures these are never recovered with a default,
/// because a scene of the wrong content or length would corrupt the output.
#[derive(Error, Debug)]
pub enum SceneRenderError {
    /// The encoder exited with an error
    #[error("Page {page}: scene encode failed: {stderr}")]
    EncodeFailed {
        /// 1-based page index
        page: usize,
        /// Filtered stderr of the encoder
        stderr: String,
    },
}

/// Errors that fail the final concatenation
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// No scenes were provided
    #[error("Cannot assemble an empty scene list")]
    EmptyList,

    /// A scene referenced by the manifest is missing on disk
    #[error("Scene file for page {page} is missing: {path:?}")]
    MissingScene {
        /// 1-based page index
        page: usize,
        /// Expected scene path
        path: PathBuf,
    },

    /// Two scenes disagree on stream parameters, stream copy would corrupt
    #[error("Scene stream parameters differ: page {page} has {found}, expected {expected}")]
    StreamMismatch {
        /// 1-based page index of the offending scene
        page: usize,
        /// Parameters found on that scene
        found: String,
        /// Parameters of the first scene
        expected: String,
    },

    /// A scene could not be probed during the defensive parameter check
    #[error("Could not probe scene for page {page}: {reason}")]
    ProbeFailed {
        /// 1-based page index
        page: usize,
        /// Underlying failure description
        reason: String,
    },

    /// The external concatenator exited with an error
    #[error("Concatenation failed: {stderr}")]
    ConcatFailed {
        /// Filtered stderr of the concatenator
        stderr: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// A required external tool is absent
    #[error("Missing dependency: {0}")]
    Dependency(#[from] MissingDependency),

    /// Error while sourcing pages
    #[error("Page extraction error: {0}")]
    PageExtraction(#[from] PageExtractionError),

    /// Error rendering a scene
    #[error("Scene render error: {0}")]
    SceneRender(#[from] SceneRenderError),

    /// Error assembling the final artifact
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
