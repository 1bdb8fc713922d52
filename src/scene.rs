use log::debug;
use std::path::{Path, PathBuf};

use crate::errors::SceneRenderError;
use crate::media_utils::{self, TOOL_TIMEOUT};
use crate::narration::AudioAsset;

// @module: Per-page scene rendering (image + audio into a timed video)

/// The rendered audio+video unit corresponding to one page
#[derive(Debug, Clone)]
pub struct Scene {
    /// 1-based page index
    pub index: usize,

    /// Path of the encoded scene file
    pub path: PathBuf,

    /// Duration in seconds, always equal to the paired audio's duration
    pub duration_secs: f64,
}

/// Combines one page's raster image and audio asset into a video scene.
///
/// The scene's length is driven by the audio: the image is looped for
/// exactly the audio's measured duration. Every scene is scaled and padded
/// to the same frame size and encoded with the same codec parameters, which
/// is what makes the final stream-copy concatenation valid.
pub struct SceneRenderer {
    /// Output frame width
    width: u32,

    /// Output frame height
    height: u32,

    /// Output frame rate, identical across scenes
    fps: u32,

    /// Optional background image the page is overlaid on
    background: Option<PathBuf>,
}

/// Audio encode parameters, pinned so every scene carries the same stream
/// layout as the silent fallback source (44.1 kHz stereo). Without the
/// explicit rate and channel count the encoder preserves whatever the input
/// audio happened to use, and a mixed synthesized/fallback run would produce
/// scenes the final stream copy cannot splice.
const AUDIO_ARGS: [&str; 8] = ["-c:a", "aac", "-b:a", "192k", "-ar", "44100", "-ac", "2"];

impl SceneRenderer {
    /// Create a renderer with the pipeline-wide output parameters
    pub fn new(width: u32, height: u32, fps: u32, background: Option<PathBuf>) -> Self {
        Self {
            width,
            height,
            fps,
            background,
        }
    }

    /// Scale-and-pad filter producing identical output dimensions for any
    /// source aspect ratio
    fn letterbox_filter(&self) -> String {
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black",
            w = self.width,
            h = self.height
        )
    }

    /// Overlay filter graph used when a background image is configured: the
    /// background fills the frame, the page is scaled down and centered on it
    fn overlay_filter(&self) -> String {
        format!(
            "[0:v]scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black[bg];\
             [1:v]scale={w}:{h}:force_original_aspect_ratio=decrease[fg];\
             [bg][fg]overlay=(W-w)/2:(H-h)/2[outv]",
            w = self.width,
            h = self.height
        )
    }

    /// Render one page's scene into `output_path`.
    ///
    /// The output duration is taken from the audio asset's recorded
    /// duration, never assumed or defaulted.
    pub async fn render(
        &self,
        image_path: &Path,
        audio: &AudioAsset,
        output_path: &Path,
    ) -> Result<Scene, SceneRenderError> {
        let duration = format!("{}", audio.duration_secs);
        let fps = self.fps.to_string();
        let letterbox = self.letterbox_filter();
        let overlay = self.overlay_filter();

        let image = image_path.to_str().unwrap_or_default();
        let audio_file = audio.path.to_str().unwrap_or_default();
        let output = output_path.to_str().unwrap_or_default();

        let mut args: Vec<&str> = match &self.background {
            Some(background) => vec![
                "-loop", "1",
                "-i", background.to_str().unwrap_or_default(),
                "-loop", "1",
                "-i", image,
                "-i", audio_file,
                "-filter_complex", &overlay,
                "-map", "[outv]",
                "-map", "2:a",
                "-t", &duration,
                "-r", &fps,
                "-c:v", "libx264",
                "-tune", "stillimage",
            ],
            None => vec![
                "-loop", "1",
                "-i", image,
                "-i", audio_file,
                "-vf", &letterbox,
                "-t", &duration,
                "-r", &fps,
                "-c:v", "libx264",
                "-tune", "stillimage",
            ],
        };
        args.extend(AUDIO_ARGS);
        args.extend(["-pix_fmt", "yuv420p", "-y", output]);

        let result = media_utils::run_tool("ffmpeg", &args, TOOL_TIMEOUT)
            .await
            .map_err(|e| SceneRenderError::EncodeFailed {
                page: audio.index,
                stderr: e.to_string(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SceneRenderError::EncodeFailed {
                page: audio.index,
                stderr: media_utils::filter_ffmpeg_stderr(&stderr),
            });
        }

        debug!(
            "Page {}: rendered {:.2}s scene at {}x{}@{}fps",
            audio.index, audio.duration_secs, self.width, self.height, self.fps
        );

        Ok(Scene {
            index: audio.index,
            path: output_path.to_path_buf(),
            duration_secs: audio.duration_secs,
        })
    }
}
