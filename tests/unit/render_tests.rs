/*!
 * Tests for the render dispatcher and subtitle styles
 */

use anyhow::Result;

use scriptcue::app_config::RenderConfig;
use scriptcue::errors::RenderError;
use scriptcue::render::{RenderAttempt, RenderDispatcher, StylePreset, SubtitleStyle};
use crate::common;

fn missing_tools_config() -> RenderConfig {
    RenderConfig {
        ffmpeg_program: "scriptcue-no-such-ffmpeg".to_string(),
        ffprobe_program: "scriptcue-no-such-ffprobe".to_string(),
        timeout_secs: 5,
        ..RenderConfig::default()
    }
}

#[test]
fn test_simplifiedForceStyle_shouldDropFont() {
    let style = SubtitleStyle::preset(StylePreset::Yellow).with_font("Noto Sans CJK SC");
    let simplified = style.simplified_force_style();

    assert!(!simplified.contains("FontName"));
    assert!(simplified.contains("FontSize=18"));
    assert!(style.force_style().contains("PrimaryColour=&H00ffff"));
}

#[test]
fn test_fromConfig_withFontName_shouldUseIt() {
    let config = RenderConfig {
        font_name: Some("Microsoft YaHei".to_string()),
        font_size: 24,
        style: StylePreset::WhiteBox,
        ..RenderConfig::default()
    };
    let style = SubtitleStyle::from_config(&config);

    assert_eq!(style.font_name.as_deref(), Some("Microsoft YaHei"));
    assert_eq!(style.font_size, 24);
    assert!(style.force_style().contains("BorderStyle=3"));
}

#[tokio::test]
async fn test_burnIn_withMissingVideo_shouldRejectInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", common::sample_srt())?;
    let dispatcher = RenderDispatcher::new(&missing_tools_config());

    let result = dispatcher
        .burn_in(
            &temp_dir.path().join("missing.mp4"),
            &srt,
            &temp_dir.path().join("out.mp4"),
            dispatcher.default_style(),
        )
        .await;

    assert!(matches!(result, Err(RenderError::InvalidInput(_))));
    Ok(())
}

#[tokio::test]
async fn test_burnIn_withEmptySubtitleFile_shouldRejectInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "in.mp4", "video bytes")?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", "")?;
    let dispatcher = RenderDispatcher::new(&missing_tools_config());

    let result = dispatcher
        .burn_in(&video, &srt, &temp_dir.path().join("out.mp4"), dispatcher.default_style())
        .await;

    assert!(matches!(result, Err(RenderError::InvalidInput(_))));
    Ok(())
}

/// Every rung fails without ffmpeg; nothing is left behind
#[tokio::test]
async fn test_burnIn_withMissingFfmpeg_shouldExhaustLadderAndLeaveNoOutput() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "in.mp4", "video bytes")?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", common::sample_srt())?;
    let output = temp_dir.path().join("out.mp4");

    let dispatcher = RenderDispatcher::new(&missing_tools_config());
    let style = SubtitleStyle::preset(StylePreset::Default).with_font("Noto Sans CJK SC");
    let result = dispatcher.burn_in(&video, &srt, &output, &style).await;

    match result {
        Err(RenderError::Exhausted { attempts, .. }) => assert_eq!(attempts, 4),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_burnIn_withoutFont_shouldSkipFullStyleRung() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "in.mkv", "video bytes")?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", common::sample_srt())?;

    let dispatcher = RenderDispatcher::new(&missing_tools_config());
    let style = SubtitleStyle::preset(StylePreset::Default);
    let result = dispatcher
        .burn_in(&video, &srt, &temp_dir.path().join("out.mkv"), &style)
        .await;

    match result {
        Err(RenderError::Exhausted { attempts, last_error }) => {
            assert_eq!(attempts, 3);
            assert!(last_error.starts_with("soft subtitle track"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

/// Stand-in ffmpeg that fails on filter arguments matching `pattern`
/// and otherwise writes its last argument
#[cfg(unix)]
fn fake_ffmpeg_config(dir: &std::path::Path, pattern: &str) -> Result<RenderConfig> {
    let body = format!(
        r#"for arg in "$@"; do
  case "$arg" in {}) exit 1 ;; esac
  last="$arg"
done
printf 'rendered video' > "$last""#,
        pattern
    );
    let ffmpeg = common::create_tool_script(dir, "ffmpeg", &body)?;
    Ok(RenderConfig {
        ffmpeg_program: ffmpeg.to_string_lossy().into_owned(),
        ..missing_tools_config()
    })
}

fn staging_files_in(dir: &std::path::Path) -> Result<Vec<String>> {
    Ok(std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".scriptcue-render-"))
        .collect())
}

/// Styled rungs fail, plain burn-in succeeds and is persisted
#[cfg(unix)]
#[tokio::test]
async fn test_burnIn_withStyledRungsFailing_shouldSucceedWithPlainBurnIn() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "in.mp4", "video bytes")?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", common::sample_srt())?;
    let output = temp_dir.path().join("out").join("final.mp4");

    let dispatcher = RenderDispatcher::new(&fake_ffmpeg_config(temp_dir.path(), "*force_style*")?);
    let style = SubtitleStyle::preset(StylePreset::Yellow).with_font("Noto Sans CJK SC");
    let report = dispatcher.burn_in(&video, &srt, &output, &style).await?;

    assert_eq!(report.attempt, RenderAttempt::PlainBurnIn);
    assert_eq!(report.attempts_made, 3);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].starts_with("full style"));
    assert!(report.failures[1].starts_with("simplified style"));
    assert_eq!(report.output, output);
    assert_eq!(std::fs::read_to_string(&output)?, "rendered video");
    assert!(staging_files_in(output.parent().unwrap())?.is_empty());
    Ok(())
}

/// With every burn-in refused the soft track is muxed instead
#[cfg(unix)]
#[tokio::test]
async fn test_burnIn_withBurnInRefused_shouldFallBackToSoftTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "in.mkv", "video bytes")?;
    let srt = common::create_test_file(temp_dir.path(), "subs.srt", common::sample_srt())?;
    let output = temp_dir.path().join("out.mkv");

    let dispatcher = RenderDispatcher::new(&fake_ffmpeg_config(temp_dir.path(), "-vf")?);
    let report = dispatcher
        .burn_in(&video, &srt, &output, &SubtitleStyle::preset(StylePreset::Default))
        .await?;

    assert_eq!(report.attempt, RenderAttempt::SoftTrackMux);
    assert_eq!(report.attempts_made, 3);
    assert!(output.is_file());
    assert!(staging_files_in(temp_dir.path())?.is_empty());
    Ok(())
}
