use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AssemblyError;
use crate::file_utils::FileManager;
use crate::media_utils::{self, TOOL_TIMEOUT};
use crate::scene::Scene;

// @module: Final scene concatenation into the output artifact

/// Concatenates an ordered list of scenes into the final output file.
///
/// Concatenation is stream-copy, no re-encode: valid only because every
/// scene shares identical codec parameters, resolution, and frame rate,
/// which is verified defensively before the concatenator is invoked.
pub struct SequenceAssembler;

impl SequenceAssembler {
    /// Render the concatenation list consumed by the external concatenator.
    ///
    /// One `file` directive per scene, in the given order. Single quotes in
    /// paths are escaped the way the concat demuxer expects.
    pub fn concat_list_content(paths: &[PathBuf]) -> String {
        let mut content = String::new();
        for path in paths {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            content.push_str(&format!("file '{}'\n", escaped));
        }
        content
    }

    /// Concatenate the scenes into `output_path`.
    ///
    /// `scenes` must already be in page order; the caller's manifest is the
    /// source of truth for ordering.
    pub async fn assemble(
        scenes: &[Scene],
        list_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, AssemblyError> {
        if scenes.is_empty() {
            return Err(AssemblyError::EmptyList);
        }

        // Resolve to absolute paths, which doubles as the existence check
        let mut absolute = Vec::with_capacity(scenes.len());
        for scene in scenes {
            let path = fs::canonicalize(&scene.path).map_err(|_| AssemblyError::MissingScene {
                page: scene.index,
                path: scene.path.clone(),
            })?;
            absolute.push(path);
        }

        Self::verify_stream_parameters(scenes).await?;

        let content = Self::concat_list_content(&absolute);
        FileManager::write_to_file(list_path, &content)
            .map_err(|e| AssemblyError::ConcatFailed { stderr: e.to_string() })?;

        debug!("Wrote concat list with {} entries to {:?}", scenes.len(), list_path);

        let output = media_utils::run_tool(
            "ffmpeg",
            &[
                "-f", "concat",
                "-safe", "0",
                "-i", list_path.to_str().unwrap_or_default(),
                "-c", "copy",
                "-y",
                output_path.to_str().unwrap_or_default(),
            ],
            TOOL_TIMEOUT,
        )
        .await
        .map_err(|e| AssemblyError::ConcatFailed { stderr: e.to_string() })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssemblyError::ConcatFailed {
                stderr: media_utils::filter_ffmpeg_stderr(&stderr),
            });
        }

        info!("Assembled {} scene(s) into {:?}", scenes.len(), output_path);
        Ok(output_path.to_path_buf())
    }

    /// Verify all scenes share the first scene's stream signature.
    ///
    /// Stream copy would silently produce a corrupt file on mismatch, so
    /// this is checked before the concatenator runs.
    async fn verify_stream_parameters(scenes: &[Scene]) -> Result<(), AssemblyError> {
        let mut expected: Option<String> = None;

        for scene in scenes {
            let signature = media_utils::probe_stream_signature(&scene.path)
                .await
                .map_err(|e| AssemblyError::ProbeFailed {
                    page: scene.index,
                    reason: e.to_string(),
                })?;

            match &expected {
                None => expected = Some(signature),
                Some(first) if *first != signature => {
                    return Err(AssemblyError::StreamMismatch {
                        page: scene.index,
                        found: signature,
                        expected: first.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
