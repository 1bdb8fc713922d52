/*!
 * Pipeline orchestration.
 *
 * This module sequences the heterogeneous external operations of a run
 * (rasterization, speech synthesis, scene encoding, concatenation) into a
 * single deterministic, resumable, cache-aware build:
 * - `working_area`: the directory tree holding intermediate stage outputs
 * - `manifest`: the ordered per-page artifact record driving assembly
 * - `orchestrator`: the state machine that drives the stages
 */

pub mod manifest;
pub mod orchestrator;
pub mod working_area;

pub use manifest::{Manifest, ManifestEntry};
pub use orchestrator::{PipelineOrchestrator, RunOutcome, RunState};
pub use working_area::WorkingArea;
