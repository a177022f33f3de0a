/*!
 * Tests for application configuration
 */

use anyhow::Result;
use scriptcue::app_config::{AsrBackend, Config, LengthMode, LogLevel};
use scriptcue::errors::ConfigError;
use scriptcue::render::StylePreset;
use scriptcue::timing::TimingStrategy;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert!(config.subtitle.single_line);
    assert!(config.subtitle.close_gaps);
    assert_eq!(config.subtitle.min_segment_chars, 5);
    assert_eq!(config.timing.strategy, TimingStrategy::SpeechRateSynthesis);
    assert_eq!(config.asr.language.as_deref(), Some("zh"));
    assert_eq!(config.asr.timeout_secs, 300);
    assert!(config.conversion.traditional_chinese);
    assert_eq!(config.conversion.opencc_config, "s2t.json");
    assert_eq!(config.conversion.timeout_secs, 30);
    assert_eq!(config.render.font_size, 18);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Missing sections and fields fall back to their defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "subtitle": { "length_mode": "compact", "single_line": false },
        "timing": { "strategy": "asr_mapping" },
        "asr": { "backend": "whisper_cpp", "model": "/models/ggml-base.bin" },
        "render": { "style": "white_box" },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.subtitle.length_mode, LengthMode::Compact);
    assert!(!config.subtitle.single_line);
    assert_eq!(config.subtitle.profile().chars_per_line, 12);
    assert_eq!(config.timing.strategy, TimingStrategy::AsrMapping);
    assert!((config.timing.rescale_threshold_secs - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.asr.backend, AsrBackend::WhisperCpp);
    assert_eq!(config.asr.program_name(), "whisper-cli");
    assert_eq!(config.render.style, StylePreset::WhiteBox);
    assert_eq!(config.render.ffmpeg_program, "ffmpeg");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_saveAndLoad_withCustomValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.subtitle.chars_per_line = Some(20);
    config.render.font_name = Some("Noto Sans CJK TC".to_string());
    config.save(&path)?;

    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("config.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    assert_eq!(Config::load(&path)?, config);
    Ok(())
}

#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "config.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withZeroCharsPerLine_shouldNameField() {
    let mut config = Config::default();
    config.subtitle.chars_per_line = Some(0);

    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "subtitle.chars_per_line"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = Config::default();
    config.asr.language = Some("xx".to_string());
    assert!(config.validate().is_err());

    config.asr.language = None;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withZeroTimeout_shouldFail() {
    let mut config = Config::default();
    config.render.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNonFiniteTimeoutScale_shouldFail() {
    for scale in [f64::INFINITY, f64::NAN, -1.0] {
        let mut config = Config::default();
        config.asr.timeout_per_audio_sec = scale;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "asr.timeout_per_audio_sec"),
            other => panic!("unexpected result for {}: {:?}", scale, other),
        }

        let mut config = Config::default();
        config.render.timeout_per_video_sec = scale;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "render.timeout_per_video_sec"),
            other => panic!("unexpected result for {}: {:?}", scale, other),
        }
    }
}

#[test]
fn test_validate_withZeroConversionTimeout_shouldFail() {
    let mut config = Config::default();
    config.conversion.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_defaultPath_shouldEndWithConfigFile() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with("scriptcue/config.json"));
    }
}
