/*!
 * # deckcast - narrated videos from slide decks and PDFs
 *
 * A Rust library for converting a document (slide deck or PDF) into a
 * narrated video: per-page content is extracted, speech is synthesized,
 * each page is rendered into a timed video scene, and the scenes are
 * concatenated into a single output file.
 *
 * ## Features
 *
 * - PDF and slide deck inputs (decks are converted via LibreOffice)
 * - Per-page narration synthesized from extracted text
 * - Deterministic silent fallback so fully offline runs still complete
 * - Cache-aware, resumable builds over a per-run working area
 * - Stream-copy concatenation (no re-encoding of finished scenes)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `capabilities`: Startup probe of external tools and strategy selection
 * - `page_source`: Input normalization into an ordered page sequence
 * - `deck_reader`: In-process deck reading for the composition fallback
 * - `narration`: Per-page speech synthesis with silent fallback
 * - `speech`: Speech backend implementations:
 *   - `speech::gtts`: Google Translate TTS client
 * - `scene`: Per-page scene rendering
 * - `assembler`: Final scene concatenation
 * - `pipeline`: Orchestration, working area, and manifest
 * - `media_utils`: Shared ffmpeg/ffprobe subprocess helpers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assembler;
pub mod capabilities;
pub mod deck_reader;
pub mod errors;
pub mod file_utils;
pub mod media_utils;
pub mod narration;
pub mod page_source;
pub mod pipeline;
pub mod scene;
pub mod speech;

// Re-export main types for easier usage
pub use app_config::Config;
pub use assembler::SequenceAssembler;
pub use capabilities::{Capabilities, RenderStrategy};
pub use errors::{AppError, AssemblyError, MissingDependency, PageExtractionError, SceneRenderError, SynthesisError};
pub use narration::{AudioAsset, AudioProvenance, NarrationSynthesizer};
pub use page_source::{Page, PageSource};
pub use pipeline::{Manifest, PipelineOrchestrator, RunOutcome, RunState, WorkingArea};
pub use scene::{Scene, SceneRenderer};
