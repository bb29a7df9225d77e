use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{error, warn, debug};
use serde_json::{Value, from_str};
use tokio::process::Command;
use crate::caption_layout::FrameGeometry;

// @module: Media probing and audio extraction via ffprobe/ffmpeg

// @const: WxH frame size regex
static FRAME_SIZE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)[xX](\d+)$").unwrap()
});

/// Parse a `WxH` string such as `1080x1920` into a frame geometry
pub fn parse_frame_size(value: &str) -> Result<FrameGeometry> {
    let caps = FRAME_SIZE_REGEX
        .captures(value.trim())
        .ok_or_else(|| anyhow!("Invalid frame size '{}', expected WIDTHxHEIGHT", value))?;

    let width: f64 = caps[1].parse().context("Failed to parse frame width")?;
    let height: f64 = caps[2].parse().context("Failed to parse frame height")?;

    if width <= 0.0 || height <= 0.0 {
        return Err(anyhow!("Frame dimensions must be positive: {}", value));
    }

    Ok(FrameGeometry::new(width, height))
}

/// Probe a video file's frame dimensions with ffprobe
pub async fn probe_frame_geometry<P: AsRef<Path>>(video_path: P) -> Result<FrameGeometry> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file not found: {:?}", video_path));
    }

    // Add timeout to prevent hanging on problematic files
    let ffprobe_future = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_streams",
            "-select_streams", "v:0",
            video_path.to_str().unwrap_or(""),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(60); // 1 minute timeout
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffprobe command timed out after 60 seconds"));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr);
        return Err(anyhow!("ffprobe command failed: {}", stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = from_str(&stdout)
        .context("Failed to parse ffprobe JSON output")?;

    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
        .ok_or_else(|| anyhow!("No video stream found in {:?}", video_path))?;

    let width = stream
        .get("width")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| anyhow!("Video stream missing width"))?;
    let height = stream
        .get("height")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| anyhow!("Video stream missing height"))?;

    if width <= 0.0 || height <= 0.0 {
        return Err(anyhow!("ffprobe reported empty frame dimensions for {:?}", video_path));
    }

    debug!("Probed frame geometry {}x{} for {:?}", width, height, video_path);
    Ok(FrameGeometry::new(width, height))
}

/// Extract the audio track next to the video for the external transcriber.
///
/// Writes `<video stem>.mp3` beside the input and returns its path.
pub async fn extract_audio<P: AsRef<Path>>(video_path: P) -> Result<PathBuf> {
    let video_path = video_path.as_ref();

    if !video_path.exists() {
        return Err(anyhow!("Video file does not exist: {:?}", video_path));
    }

    let audio_path = video_path.with_extension("mp3");

    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-y",                       // Overwrite existing file
            "-i", video_path.to_str().unwrap_or_default(),
            "-vn",
            audio_path.to_str().unwrap_or_default(),
        ])
        .output();

    let timeout_duration = std::time::Duration::from_secs(120); // 2 minute timeout for ffmpeg
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| anyhow!("Failed to execute ffmpeg command for audio extraction: {}", e))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(anyhow!("ffmpeg command timed out after 2 minutes"));
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Audio extraction failed: {}", filtered);
        return Err(anyhow!("ffmpeg extraction failed: {}", filtered));
    }

    let file_size = std::fs::metadata(&audio_path)?.len();
    if file_size == 0 {
        return Err(anyhow!("Extracted audio file is empty: {:?}", audio_path));
    }

    debug!("Extracted audio to {:?}", audio_path);
    Ok(audio_path)
}

/// Delete a temporary extracted audio file if it exists
pub fn delete_temp_audio<P: AsRef<Path>>(audio_path: P) -> Result<()> {
    let audio_path = audio_path.as_ref();
    if audio_path.exists() {
        std::fs::remove_file(audio_path)
            .with_context(|| format!("Failed to delete temporary file: {:?}", audio_path))?;
        debug!("Deleted temporary file: {:?}", audio_path);
    } else {
        warn!("File not found: {:?}", audio_path);
    }
    Ok(())
}

/// Keep only the meaningful lines of ffmpeg stderr, dropping the version
/// banner, build flags, and stream metadata chatter.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p) || trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
