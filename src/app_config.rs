use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::formatter::LengthProfile;
use crate::render::StylePreset;
use crate::timing::TimingStrategy;

/// Application configuration module
/// This module handles the engine configuration including loading,
/// validating and saving configuration settings.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Cue length and layout
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Timestamp strategy
    #[serde(default)]
    pub timing: TimingConfig,

    /// Speech recognition engine
    #[serde(default)]
    pub asr: AsrConfig,

    /// Simplified to traditional conversion
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Burn-in rendering
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Display density presets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    // @mode: Standard limits
    #[default]
    Auto,
    // @mode: Short lines, long display
    Compact,
    // @mode: Balanced
    Standard,
    // @mode: Long lines, short display
    Relaxed,
}

impl LengthMode {
    // @returns: Line width, line count and minimum display time for the mode
    pub fn profile(self) -> LengthProfile {
        match self {
            Self::Compact => LengthProfile::new(12, 2, 1.8),
            Self::Standard | Self::Auto => LengthProfile::new(15, 2, 1.5),
            Self::Relaxed => LengthProfile::new(18, 2, 1.2),
        }
    }
}

/// Configuration for cue layout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleConfig {
    // @field: Density preset
    #[serde(default)]
    pub length_mode: LengthMode,

    // @field: Force every cue onto one display line
    #[serde(default = "default_true")]
    pub single_line: bool,

    // @field: Characters per line override
    #[serde(default)]
    pub chars_per_line: Option<usize>,

    // @field: Pieces shorter than this are merged into a neighbour
    #[serde(default = "default_min_segment_chars")]
    pub min_segment_chars: usize,

    // @field: Make consecutive cues contiguous
    #[serde(default = "default_true")]
    pub close_gaps: bool,

    // @field: Reading speed reported by the validator above this
    #[serde(default = "default_max_chars_per_second")]
    pub max_chars_per_second: f64,
}

impl SubtitleConfig {
    /// Effective layout limits after applying `single_line` and overrides
    pub fn profile(&self) -> LengthProfile {
        if self.single_line {
            return LengthProfile::new(
                self.chars_per_line.unwrap_or_else(default_single_line_chars),
                1,
                default_single_line_min_display(),
            );
        }

        let mut profile = self.length_mode.profile();
        if let Some(chars) = self.chars_per_line {
            profile.chars_per_line = chars;
        }
        profile
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            length_mode: LengthMode::default(),
            single_line: true,
            chars_per_line: None,
            min_segment_chars: default_min_segment_chars(),
            close_gaps: true,
            max_chars_per_second: default_max_chars_per_second(),
        }
    }
}

/// Configuration for timestamp generation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Which strategy produces cue timestamps
    #[serde(default)]
    pub strategy: TimingStrategy,

    /// Drift above which speech-rate timestamps are rescaled
    #[serde(default = "default_rescale_threshold_secs")]
    pub rescale_threshold_secs: f64,

    /// Lower bound of net speech time as a share of the audio duration
    #[serde(default = "default_min_net_speech_ratio")]
    pub min_net_speech_ratio: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            strategy: TimingStrategy::default(),
            rescale_threshold_secs: default_rescale_threshold_secs(),
            min_net_speech_ratio: default_min_net_speech_ratio(),
        }
    }
}

/// Speech recognition program family
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AsrBackend {
    // @backend: Python whisper CLI
    #[default]
    OpenaiWhisper,
    // @backend: whisper.cpp CLI
    WhisperCpp,
}

impl AsrBackend {
    // @returns: Program name looked up on PATH when none is configured
    pub fn default_program(self) -> &'static str {
        match self {
            Self::OpenaiWhisper => "whisper",
            Self::WhisperCpp => "whisper-cli",
        }
    }

    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(self) -> String {
        match self {
            Self::OpenaiWhisper => "openai_whisper".to_string(),
            Self::WhisperCpp => "whisper_cpp".to_string(),
        }
    }
}

impl std::fmt::Display for AsrBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Speech recognition configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AsrConfig {
    // @field: Program family
    #[serde(default)]
    pub backend: AsrBackend,

    // @field: Program path, looked up on PATH when absent
    #[serde(default)]
    pub program: Option<String>,

    // @field: Model name (whisper) or model file path (whisper.cpp)
    #[serde(default = "default_asr_model")]
    pub model: String,

    // @field: Language hint
    #[serde(default = "default_asr_language")]
    pub language: Option<String>,

    // @field: Base timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Extra timeout seconds per second of audio
    #[serde(default = "default_asr_timeout_per_audio_sec")]
    pub timeout_per_audio_sec: f64,
}

impl AsrConfig {
    // @returns: Configured program or the backend default
    pub fn program_name(&self) -> String {
        self.program
            .clone()
            .unwrap_or_else(|| self.backend.default_program().to_string())
    }
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            backend: AsrBackend::default(),
            program: None,
            model: default_asr_model(),
            language: default_asr_language(),
            timeout_secs: default_timeout_secs(),
            timeout_per_audio_sec: default_asr_timeout_per_audio_sec(),
        }
    }
}

/// Script conversion configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionConfig {
    // @field: Convert simplified characters to traditional
    #[serde(default = "default_true")]
    pub traditional_chinese: bool,

    // @field: OpenCC command line program
    #[serde(default = "default_opencc_program")]
    pub opencc_program: String,

    // @field: OpenCC conversion profile
    #[serde(default = "default_opencc_config")]
    pub opencc_config: String,

    // @field: Fall back to the bundled character table
    #[serde(default = "default_true")]
    pub use_builtin_table: bool,

    // @field: Longest wait for one OpenCC call, in seconds
    #[serde(default = "default_opencc_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            traditional_chinese: true,
            opencc_program: default_opencc_program(),
            opencc_config: default_opencc_config(),
            use_builtin_table: true,
            timeout_secs: default_opencc_timeout_secs(),
        }
    }
}

/// Burn-in rendering configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    // @field: ffmpeg program
    #[serde(default = "default_ffmpeg_program")]
    pub ffmpeg_program: String,

    // @field: ffprobe program
    #[serde(default = "default_ffprobe_program")]
    pub ffprobe_program: String,

    // @field: Style preset
    #[serde(default)]
    pub style: StylePreset,

    // @field: Font family, detected per platform when absent
    #[serde(default)]
    pub font_name: Option<String>,

    // @field: Font size
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    // @field: Outline width
    #[serde(default = "default_outline")]
    pub outline: u32,

    // @field: Base timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Extra timeout seconds per second of video
    #[serde(default = "default_render_timeout_per_video_sec")]
    pub timeout_per_video_sec: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_program: default_ffmpeg_program(),
            ffprobe_program: default_ffprobe_program(),
            style: StylePreset::default(),
            font_name: None,
            font_size: default_font_size(),
            outline: default_outline(),
            timeout_secs: default_timeout_secs(),
            timeout_per_video_sec: default_render_timeout_per_video_sec(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_min_segment_chars() -> usize {
    5
}

fn default_single_line_chars() -> usize {
    25
}

fn default_single_line_min_display() -> f64 {
    1.5
}

fn default_max_chars_per_second() -> f64 {
    12.0
}

fn default_rescale_threshold_secs() -> f64 {
    1.0
}

fn default_min_net_speech_ratio() -> f64 {
    0.8
}

fn default_asr_model() -> String {
    "base".to_string()
}

fn default_asr_language() -> Option<String> {
    Some("zh".to_string())
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_asr_timeout_per_audio_sec() -> f64 {
    2.0
}

fn default_render_timeout_per_video_sec() -> f64 {
    1.0
}

fn default_opencc_program() -> String {
    "opencc".to_string()
}

fn default_opencc_config() -> String {
    "s2t.json".to_string()
}

fn default_opencc_timeout_secs() -> u64 {
    30
}

fn default_ffmpeg_program() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_program() -> String {
    "ffprobe".to_string()
}

fn default_font_size() -> u32 {
    18
}

fn default_outline() -> u32 {
    2
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load a configuration file, writing the defaults first when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        log::info!("Created default configuration at {:?}", path);
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Platform configuration location, e.g. `~/.config/scriptcue/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scriptcue").join("config.json"))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.subtitle.chars_per_line == Some(0) {
            return Err(invalid("subtitle.chars_per_line", "must be greater than zero"));
        }

        let cps = self.subtitle.max_chars_per_second;
        if !cps.is_finite() || cps <= 0.0 {
            return Err(invalid("subtitle.max_chars_per_second", "must be a positive number"));
        }

        let threshold = self.timing.rescale_threshold_secs;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid("timing.rescale_threshold_secs", "must be zero or positive"));
        }

        let ratio = self.timing.min_net_speech_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(invalid("timing.min_net_speech_ratio", "must be in (0, 1]"));
        }

        if self.asr.timeout_secs == 0 {
            return Err(invalid("asr.timeout_secs", "must be greater than zero"));
        }

        for (field, scale) in [
            ("asr.timeout_per_audio_sec", self.asr.timeout_per_audio_sec),
            ("render.timeout_per_video_sec", self.render.timeout_per_video_sec),
        ] {
            if !scale.is_finite() || scale < 0.0 {
                return Err(invalid(field, "must be zero or a positive number"));
            }
        }

        if self.conversion.timeout_secs == 0 {
            return Err(invalid("conversion.timeout_secs", "must be greater than zero"));
        }

        if let Some(language) = &self.asr.language {
            crate::language_utils::normalize_to_part1(language)
                .map_err(|e| invalid("asr.language", e.to_string()))?;
        }

        if self.render.timeout_secs == 0 {
            return Err(invalid("render.timeout_secs", "must be greater than zero"));
        }

        if self.render.font_size == 0 {
            return Err(invalid("render.font_size", "must be greater than zero"));
        }

        Ok(())
    }
}
