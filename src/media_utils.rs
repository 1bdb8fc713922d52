use anyhow::{anyhow, Context, Result};
use log::debug;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

// @module: Shared ffmpeg/ffprobe subprocess helpers

/// Upper bound for a single external tool invocation. Encoding a still-image
/// scene or rasterizing a document should never take longer than this.
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Run an external tool with a bounded timeout and collect its output
pub async fn run_tool(program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
    debug!("Running {} {}", program, args.join(" "));

    let future = Command::new(program).args(args).output();

    let output = tokio::select! {
        result = future => {
            result.map_err(|e| anyhow!("Failed to execute '{}': {}", program, e))?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(anyhow!("'{}' timed out after {:?}", program, timeout));
        }
    };

    Ok(output)
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Stream mapping:",
        "Output #",
        "Press [q]",
        "frame=",
        "size=",
        "video:",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Probe the duration of a media file in seconds using ffprobe
pub async fn probe_duration<P: AsRef<Path>>(path: P) -> Result<f64> {
    let path = path.as_ref();

    let output = run_tool(
        "ffprobe",
        &[
            "-v", "error",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
            path.to_str().unwrap_or_default(),
        ],
        TOOL_TIMEOUT,
    )
    .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "ffprobe failed for {:?}: {}",
            path,
            filter_ffmpeg_stderr(&stderr)
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration: f64 = stdout
        .trim()
        .parse()
        .with_context(|| format!("Unparseable duration '{}' for {:?}", stdout.trim(), path))?;

    if duration <= 0.0 {
        return Err(anyhow!("Non-positive duration {} for {:?}", duration, path));
    }

    Ok(duration)
}

/// Probe the stream parameters of a scene file.
///
/// Returns a compact "WIDTHxHEIGHT@FPS|CODEC/RATE/CHANNELS" signature
/// covering both the video and the audio stream. The assembler compares
/// these across scenes to verify that stream copy is safe: a silent-fallback
/// page and a synthesized page must agree on every parameter the concat
/// demuxer splices together, the audio ones included.
pub async fn probe_stream_signature<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    let video = probe_stream_entries(path, "v:0", "stream=width,height,r_frame_rate").await?;
    if video.is_empty() {
        return Err(anyhow!("No video stream found in {:?}", path));
    }

    let audio = probe_stream_entries(path, "a:0", "stream=codec_name,sample_rate,channels").await?;
    if audio.is_empty() {
        return Err(anyhow!("No audio stream found in {:?}", path));
    }

    Ok(format!(
        "{}|{}",
        normalize_video_signature(&video),
        audio.replace(',', "/")
    ))
}

/// Run ffprobe for one stream's entries, returning the raw csv line
async fn probe_stream_entries(path: &Path, stream: &str, entries: &str) -> Result<String> {
    let output = run_tool(
        "ffprobe",
        &[
            "-v", "error",
            "-select_streams", stream,
            "-show_entries", entries,
            "-of", "csv=p=0",
            path.to_str().unwrap_or_default(),
        ],
        TOOL_TIMEOUT,
    )
    .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "ffprobe failed for {:?}: {}",
            path,
            filter_ffmpeg_stderr(&stderr)
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// csv output is WIDTH,HEIGHT,NUM/DEN; normalize to WIDTHxHEIGHT@NUM/DEN
fn normalize_video_signature(raw: &str) -> String {
    match raw.rsplit_once(',') {
        Some((dims, fps)) => format!("{}@{}", dims.replace(',', "x"), fps),
        None => raw.to_string(),
    }
}

/// Create a deterministic silent audio file of the given duration.
///
/// The anullsrc source with fixed sample rate, channel layout, and encoder
/// settings yields byte-identical output across runs, which keeps repeated
/// offline runs idempotent.
pub async fn create_silent_audio<P: AsRef<Path>>(path: P, duration_secs: f64) -> Result<()> {
    let path = path.as_ref();
    let duration = format!("{}", duration_secs);

    let output = run_tool(
        "ffmpeg",
        &[
            "-f", "lavfi",
            "-i", "anullsrc=r=44100:cl=stereo",
            "-t", &duration,
            "-q:a", "9",
            "-acodec", "libmp3lame",
            "-y",
            path.to_str().unwrap_or_default(),
        ],
        TOOL_TIMEOUT,
    )
    .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "Silent audio generation failed: {}",
            filter_ffmpeg_stderr(&stderr)
        ));
    }

    Ok(())
}
