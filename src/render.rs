/*!
 * Burn-in rendering through ffmpeg with a fallback ladder.
 *
 * Each rung is a materially different command:
 * 1. `FullStyle`: subtitles filter with the full ASS style including the font
 * 2. `SimplifiedStyle`: subtitles filter with size, colour and outline only
 * 3. `PlainBurnIn`: subtitles filter without styling
 * 4. `SoftTrackMux`: subtitle stream muxed into the container, no re-encode
 *
 * Output goes to a temporary file beside the target and is moved into place
 * only after a rung succeeds.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::app_config::RenderConfig;
use crate::errors::RenderError;
use crate::media;

/// Named style presets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// White text with a black outline
    #[default]
    Default,
    /// Yellow text with a black outline
    Yellow,
    /// White text on an opaque box
    WhiteBox,
}

/// ASS style parameters passed to the subtitles filter
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleStyle {
    /// Font family; the full-style rung is skipped without one
    pub font_name: Option<String>,
    /// Font size
    pub font_size: u32,
    /// Outline width
    pub outline: u32,
    /// Text colour in ASS `&HBBGGRR` form
    pub primary_colour: String,
    /// Background colour in ASS `&HAABBGGRR` form
    pub back_colour: String,
    /// 1 = outline and shadow, 3 = opaque box
    pub border_style: u8,
}

impl SubtitleStyle {
    /// Style for a preset, with the default size and outline and no font
    pub fn preset(preset: StylePreset) -> Self {
        let base = Self {
            font_name: None,
            font_size: 18,
            outline: 2,
            primary_colour: "&Hffffff".to_string(),
            back_colour: "&H80000000".to_string(),
            border_style: 1,
        };

        match preset {
            StylePreset::Default => base,
            StylePreset::Yellow => Self {
                primary_colour: "&H00ffff".to_string(),
                ..base
            },
            StylePreset::WhiteBox => Self {
                back_colour: "&H60000000".to_string(),
                border_style: 3,
                outline: 1,
                ..base
            },
        }
    }

    /// Style from the render configuration; the font is detected when unset
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut style = Self::preset(config.style);
        style.font_size = config.font_size;
        style.outline = config.outline;
        style.font_name = config.font_name.clone().or_else(detect_font_name);
        style
    }

    /// Set the font family
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Full `force_style` value, font included when known
    pub fn force_style(&self) -> String {
        let font = self
            .font_name
            .as_ref()
            .map(|name| format!("FontName={},", name))
            .unwrap_or_default();

        format!(
            "{}FontSize={},PrimaryColour={},SecondaryColour={},OutlineColour=&H0,BackColour={},\
             Bold=1,Italic=0,Underline=0,StrikeOut=0,ScaleX=100,ScaleY=100,Spacing=0,Angle=0,\
             BorderStyle={},Outline={},Shadow=0,Alignment=2,MarginL=10,MarginR=10,MarginV=10",
            font,
            self.font_size,
            self.primary_colour,
            self.primary_colour,
            self.back_colour,
            self.border_style,
            self.outline
        )
    }

    /// Reduced `force_style` value without the font
    pub fn simplified_force_style(&self) -> String {
        format!(
            "FontSize={},PrimaryColour={},OutlineColour=&H0,Bold=1,Outline={},Alignment=2,BorderStyle={}",
            self.font_size, self.primary_colour, self.outline, self.border_style
        )
    }
}

/// CJK-capable font family for the current platform
pub fn detect_font_name() -> Option<String> {
    if cfg!(target_os = "windows") {
        Some("Microsoft YaHei".to_string())
    } else if cfg!(target_os = "macos") {
        Some("PingFang SC".to_string())
    } else {
        let noto_paths = [
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
        ];
        if noto_paths.iter().any(|p| Path::new(p).exists()) {
            Some("Noto Sans CJK SC".to_string())
        } else {
            debug!("No CJK font found, rendering with the default font");
            None
        }
    }
}

/// Escape a path for use inside an ffmpeg filter argument
pub fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Subtitle codec for muxing into a container, chosen by extension
pub fn soft_subtitle_codec(video_out: &Path) -> &'static str {
    let ext = video_out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mkv" => "srt",
        "webm" => "webvtt",
        _ => "mov_text",
    }
}

/// One rung of the fallback ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAttempt {
    /// Burn-in with the full style and font
    FullStyle,
    /// Burn-in with a reduced style
    SimplifiedStyle,
    /// Burn-in without styling
    PlainBurnIn,
    /// Soft subtitle track
    SoftTrackMux,
}

impl RenderAttempt {
    /// First rung
    pub fn first() -> Self {
        Self::FullStyle
    }

    /// Next rung, `None` after the last
    pub fn next(self) -> Option<Self> {
        match self {
            Self::FullStyle => Some(Self::SimplifiedStyle),
            Self::SimplifiedStyle => Some(Self::PlainBurnIn),
            Self::PlainBurnIn => Some(Self::SoftTrackMux),
            Self::SoftTrackMux => None,
        }
    }

    /// Log label
    pub fn label(self) -> &'static str {
        match self {
            Self::FullStyle => "full style",
            Self::SimplifiedStyle => "simplified style",
            Self::PlainBurnIn => "plain burn-in",
            Self::SoftTrackMux => "soft subtitle track",
        }
    }

    /// Whether the subtitles are composited into the picture
    pub fn is_burn_in(self) -> bool {
        self != Self::SoftTrackMux
    }
}

/// Outcome of a successful render
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// Rung that succeeded
    pub attempt: RenderAttempt,
    /// Commands run, including the successful one
    pub attempts_made: usize,
    /// Final output path
    pub output: PathBuf,
    /// Messages of the rungs that failed
    pub failures: Vec<String>,
}

/// Runs the ffmpeg fallback ladder
#[derive(Debug, Clone)]
pub struct RenderDispatcher {
    ffmpeg: String,
    ffprobe: String,
    style: SubtitleStyle,
    base_timeout: Duration,
    timeout_per_video_sec: f64,
}

impl RenderDispatcher {
    /// Dispatcher for the render configuration
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg_program.clone(),
            ffprobe: config.ffprobe_program.clone(),
            style: SubtitleStyle::from_config(config),
            base_timeout: Duration::from_secs(config.timeout_secs),
            timeout_per_video_sec: config.timeout_per_video_sec,
        }
    }

    /// Style built from the configuration
    pub fn default_style(&self) -> &SubtitleStyle {
        &self.style
    }

    /// Per-command timeout: base plus a share of the video length
    pub fn timeout_for(&self, video_secs: Option<f64>) -> Duration {
        let extra = video_secs
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(|secs| secs * self.timeout_per_video_sec)
            .unwrap_or(0.0);
        self.base_timeout
            .saturating_add(Duration::try_from_secs_f64(extra).unwrap_or_default())
    }

    fn build_command(
        &self,
        attempt: RenderAttempt,
        video_in: &Path,
        subtitle_file: &Path,
        output: &Path,
        style: &SubtitleStyle,
    ) -> Command {
        let mut command = Command::new(&self.ffmpeg);
        command.arg("-y").arg("-i").arg(video_in);

        let filter_source = format!("subtitles='{}'", escape_filter_path(subtitle_file));
        match attempt {
            RenderAttempt::FullStyle => {
                command.arg("-vf").arg(format!("{}:force_style='{}'", filter_source, style.force_style()));
            }
            RenderAttempt::SimplifiedStyle => {
                command
                    .arg("-vf")
                    .arg(format!("{}:force_style='{}'", filter_source, style.simplified_force_style()));
            }
            RenderAttempt::PlainBurnIn => {
                command.arg("-vf").arg(filter_source);
            }
            RenderAttempt::SoftTrackMux => {
                command
                    .arg("-i")
                    .arg(subtitle_file)
                    .args(["-c", "copy", "-c:s", soft_subtitle_codec(output)]);
            }
        }

        if attempt.is_burn_in() {
            command.args(["-c:a", "copy"]);
        }
        command.arg(output);
        command
    }

    fn validate_inputs(video_in: &Path, subtitle_file: &Path) -> Result<(), RenderError> {
        if !video_in.is_file() {
            return Err(RenderError::InvalidInput(format!(
                "video not found: {}",
                video_in.display()
            )));
        }
        let srt_size = std::fs::metadata(subtitle_file).map(|m| m.len()).unwrap_or(0);
        if srt_size == 0 {
            return Err(RenderError::InvalidInput(format!(
                "subtitle file missing or empty: {}",
                subtitle_file.display()
            )));
        }
        Ok(())
    }

    /// Render `subtitle_file` onto `video_in`, writing `video_out`.
    ///
    /// Only exhaustion of every rung is an error. On any error no file is
    /// left at `video_out` by this call.
    pub async fn burn_in(
        &self,
        video_in: &Path,
        subtitle_file: &Path,
        video_out: &Path,
        style: &SubtitleStyle,
    ) -> Result<RenderReport, RenderError> {
        Self::validate_inputs(video_in, subtitle_file)?;

        let out_dir = match video_out.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&out_dir)?;

        let extension = video_out
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| ".mp4".to_string());
        let staging = tempfile::Builder::new()
            .prefix(".scriptcue-render-")
            .suffix(&extension)
            .tempfile_in(&out_dir)?;

        let video_secs = match media::probe_duration(&self.ffprobe, video_in, self.base_timeout).await {
            Ok(secs) => Some(secs),
            Err(e) => {
                debug!("Could not probe video duration: {}", e);
                None
            }
        };
        let timeout = self.timeout_for(video_secs);

        let mut failures: Vec<String> = Vec::new();
        let mut attempt = Some(RenderAttempt::first());

        while let Some(current) = attempt {
            attempt = current.next();

            if current == RenderAttempt::FullStyle && style.font_name.is_none() {
                debug!("Skipping {} render: no font available", current.label());
                continue;
            }

            info!("Rendering subtitles ({})", current.label());
            let command = self.build_command(current, video_in, subtitle_file, staging.path(), style);

            match media::run_with_timeout(command, "ffmpeg", timeout).await {
                Ok(_) => {
                    let size = std::fs::metadata(staging.path()).map(|m| m.len()).unwrap_or(0);
                    if size == 0 {
                        let message = format!("{}: ffmpeg produced an empty file", current.label());
                        warn!("Render attempt failed: {}", message);
                        failures.push(message);
                        continue;
                    }

                    staging
                        .persist(video_out)
                        .map_err(|e| RenderError::Io(e.error))?;
                    info!("Rendered {} using {}", video_out.display(), current.label());

                    return Ok(RenderReport {
                        attempt: current,
                        attempts_made: failures.len() + 1,
                        output: video_out.to_path_buf(),
                        failures,
                    });
                }
                Err(e) => {
                    let message = format!("{}: {}", current.label(), e);
                    warn!("Render attempt failed: {}", message);
                    failures.push(message);
                }
            }
        }

        Err(RenderError::Exhausted {
            attempts: failures.len(),
            last_error: failures.pop().unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }
}
