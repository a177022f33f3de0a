/*!
 * External media tool plumbing.
 *
 * Every subprocess (ffmpeg, ffprobe, recognizer, converter) goes through
 * `run_with_timeout`, which kills the child when the wait is exceeded.
 * Extracted audio lives in a temporary directory removed on drop.
 */

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use hound::WavReader;
use log::{debug, warn};
use tempfile::TempDir;
use tokio::process::Command;

use crate::errors::MediaError;

/// Sample rate expected by the recognizer
pub const ASR_SAMPLE_RATE: u32 = 16_000;

/// Run a command, failing when it exits non-zero or outlives `timeout`
pub async fn run_with_timeout(
    mut command: Command,
    tool: &str,
    timeout: Duration,
) -> Result<Output, MediaError> {
    command.kill_on_drop(true);
    let child_future = command.output();

    let output = tokio::select! {
        result = child_future => {
            result.map_err(|e| match e.kind() {
                ErrorKind::NotFound => MediaError::ToolMissing(tool.to_string()),
                _ => MediaError::Io(e),
            })?
        },
        _ = tokio::time::sleep(timeout) => {
            return Err(MediaError::Timeout {
                tool: tool.to_string(),
                secs: timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::CommandFailed {
            tool: tool.to_string(),
            message: filter_ffmpeg_stderr(&stderr),
        });
    }

    Ok(output)
}

/// Mono 16 kHz PCM audio extracted from a video; deleted on drop
#[derive(Debug)]
pub struct ExtractedAudio {
    _dir: TempDir,
    path: PathBuf,
}

impl ExtractedAudio {
    /// Path of the WAV file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Extract the audio track of `video` as mono 16 kHz 16-bit PCM WAV
pub async fn extract_audio(
    ffmpeg: &str,
    video: &Path,
    timeout: Duration,
) -> Result<ExtractedAudio, MediaError> {
    if !video.exists() {
        return Err(MediaError::Probe(format!(
            "Video file does not exist: {}",
            video.display()
        )));
    }

    let dir = tempfile::Builder::new().prefix("scriptcue-audio-").tempdir()?;
    let path = dir.path().join("narration.wav");

    let mut command = Command::new(ffmpeg);
    command
        .arg("-y")
        .arg("-i")
        .arg(video)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar"])
        .arg(ASR_SAMPLE_RATE.to_string())
        .args(["-ac", "1"])
        .arg(&path);

    run_with_timeout(command, "ffmpeg", timeout).await?;

    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(MediaError::CommandFailed {
            tool: "ffmpeg".to_string(),
            message: format!("no audio extracted from {}", video.display()),
        });
    }

    debug!("Extracted audio from {} to {}", video.display(), path.display());
    Ok(ExtractedAudio { _dir: dir, path })
}

/// Duration of a media file in seconds.
///
/// Uses ffprobe; a WAV file whose probe fails is measured from its header.
pub async fn probe_duration(
    ffprobe: &str,
    path: &Path,
    timeout: Duration,
) -> Result<f64, MediaError> {
    match probe_with_ffprobe(ffprobe, path, timeout).await {
        Ok(duration) => Ok(duration),
        Err(e) if is_wav(path) => {
            warn!("ffprobe failed ({}), reading WAV header instead", e);
            wav_duration_seconds(path)
        }
        Err(e) => Err(e),
    }
}

async fn probe_with_ffprobe(
    ffprobe: &str,
    path: &Path,
    timeout: Duration,
) -> Result<f64, MediaError> {
    let mut command = Command::new(ffprobe);
    command
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "csv=p=0"])
        .arg(path);

    let output = run_with_timeout(command, "ffprobe", timeout).await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration: f64 = stdout
        .trim()
        .parse()
        .map_err(|_| MediaError::Probe(format!("unexpected ffprobe output: {:?}", stdout.trim())))?;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(MediaError::Probe(format!(
            "non-positive duration {} for {}",
            duration,
            path.display()
        )));
    }
    Ok(duration)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Duration of a WAV file computed from its header
pub fn wav_duration_seconds(path: &Path) -> Result<f64, MediaError> {
    let reader = WavReader::open(path)
        .map_err(|e| MediaError::Probe(format!("{}: {}", path.display(), e)))?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    Ok(frames / spec.sample_rate as f64)
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "encoder",
        "handler_name",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
