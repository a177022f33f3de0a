/*!
 * Integration tests for the subtitle generation workflow
 */

use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;

use scriptcue::asr::mock::MockRecognizer;
use scriptcue::asr::{AsrModelHandle, TimedSegment};
use scriptcue::subtitle_processor::SubtitleCollection;
use scriptcue::timing::TimingStrategy;
use scriptcue::{ScriptConverter, SubtitleEngine};
use crate::common;

/// Recognizer timing with narration wording, end to end
#[tokio::test]
async fn test_generateForAudio_withWorkingRecognizer_shouldUseAsrTiming() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 4.0)?;

    let recognizer = MockRecognizer::working();
    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(recognizer.clone())));
    let engine = common::test_engine(TimingStrategy::AsrMapping).with_asr_handle(handle);

    let generated = engine
        .generate_for_audio(&["大家好。", "欢迎收看。"], &audio, Some(4.0))
        .await?;

    assert_eq!(generated.strategy, TimingStrategy::AsrMapping);
    assert_eq!(generated.cues.len(), 2);
    assert_eq!(generated.cues[0].text, "大家好。");
    assert_eq!(generated.cues[1].text, "歡迎收看。");
    assert_eq!((generated.cues[1].start, generated.cues[1].end), (2.0, 4.0));
    assert_eq!(recognizer.call_count(), 1);
    assert!(generated.report.passed());
    Ok(())
}

/// A failing recognizer falls back to speech-rate timing
#[tokio::test]
async fn test_generateForAudio_withFailingRecognizer_shouldFallBackToSpeechRate() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 4.0)?;

    let recognizer = MockRecognizer::failing();
    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(recognizer.clone())));
    let engine = common::test_engine(TimingStrategy::AsrMapping).with_asr_handle(handle);

    let generated = engine
        .generate_for_audio(&["大家好。歡迎收看。"], &audio, Some(4.0))
        .await?;

    assert_eq!(recognizer.call_count(), 1);
    assert_eq!(generated.strategy, TimingStrategy::SpeechRateSynthesis);
    assert_eq!(generated.cues.len(), 2);
    assert!((generated.cues[1].end - 4.0).abs() < 0.01);
    Ok(())
}

#[tokio::test]
async fn test_generateForAudio_withEmptyRecognizerOutput_shouldFallBackToSpeechRate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 4.0)?;

    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(MockRecognizer::empty())));
    let engine = common::test_engine(TimingStrategy::AsrMapping).with_asr_handle(handle);

    let generated = engine.generate_for_audio(&["大家好。"], &audio, Some(4.0)).await?;

    assert_eq!(generated.strategy, TimingStrategy::SpeechRateSynthesis);
    assert_eq!(generated.cues.len(), 1);
    Ok(())
}

/// A recognizer that overruns the engine's bound is cut off
#[tokio::test]
async fn test_generateForAudio_withRecognizerIgnoringTimeout_shouldFallBackWithinBound() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 4.0)?;

    let mut config = common::test_config(TimingStrategy::AsrMapping);
    config.asr.timeout_secs = 1;
    config.asr.timeout_per_audio_sec = 0.0;
    let recognizer = MockRecognizer::ignoring_timeout(4_000);
    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(recognizer.clone())));
    let engine = SubtitleEngine::with_converter(config, ScriptConverter::builtin())?.with_asr_handle(handle);

    let started = Instant::now();
    let generated = engine
        .generate_for_audio(&["大家好。歡迎收看。"], &audio, Some(4.0))
        .await?;

    assert!(started.elapsed() < Duration::from_secs(3), "took {:?}", started.elapsed());
    assert_eq!(recognizer.call_count(), 1);
    assert_eq!(generated.strategy, TimingStrategy::SpeechRateSynthesis);
    assert_eq!(generated.cues.len(), 2);
    Ok(())
}

/// Speech-rate strategy never asks the recognizer
#[tokio::test]
async fn test_generateForAudio_withSpeechRateStrategy_shouldNotCallRecognizer() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 3.0)?;

    let recognizer = MockRecognizer::working();
    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(recognizer.clone())));
    let engine = common::test_engine(TimingStrategy::SpeechRateSynthesis).with_asr_handle(handle);

    // Duration read from the WAV file
    let generated = engine.generate_for_audio(&common::sample_pages(), &audio, None).await?;

    assert_eq!(recognizer.call_count(), 0);
    assert!((generated.cues.last().map(|c| c.end).unwrap_or_default() - 3.0).abs() < 0.01);
    Ok(())
}

/// Three sentences, two segments: the third sentence is dropped
#[tokio::test]
async fn test_generateForAudio_withFewerSegmentsThanSentences_shouldDropTrailingSentence() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let audio = common::create_silent_wav(temp_dir.path(), "narration.wav", 4.0)?;

    let recognizer = MockRecognizer::working().with_segments(vec![
        TimedSegment::new(0.0, 2.0, "第一句"),
        TimedSegment::new(2.0, 4.0, "第二句"),
    ]);
    let handle = Arc::new(AsrModelHandle::with_recognizer(Arc::new(recognizer)));
    let engine = common::test_engine(TimingStrategy::AsrMapping).with_asr_handle(handle);

    let generated = engine
        .generate_for_audio(&["第一句。第二句。第三句。"], &audio, Some(4.0))
        .await?;

    assert_eq!(generated.cues.len(), 2);
    assert!(!generated.to_srt().contains("第三句"));
    Ok(())
}

/// Generated cues written to disk parse back identically
#[tokio::test]
async fn test_generatedSubtitles_writtenToSrt_shouldParseBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let engine = common::test_engine(TimingStrategy::SpeechRateSynthesis);

    let cues = engine.synthesize_cues(&common::sample_pages(), 12.0).await?;
    let path = temp_dir.path().join("video.srt");
    SubtitleCollection::from_cues(path.clone(), cues.clone()).write_to_srt(&path)?;

    let reparsed = SubtitleCollection::parse_srt_file(&path)?;
    assert_eq!(reparsed.entries.len(), cues.len());
    for (parsed, original) in reparsed.entries.iter().zip(&cues) {
        assert_eq!(parsed.text, original.text);
        assert!((parsed.start - original.start).abs() < 0.001);
        assert!((parsed.end - original.end).abs() < 0.001);
    }
    Ok(())
}

/// A video the media tools cannot read leaves no subtitle file behind
#[test]
fn test_generateForVideo_withMissingFfmpeg_shouldNotCreateSubtitleFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "clip.mp4", "not a video")?;
    let srt = temp_dir.path().join("clip.srt");

    let mut config = common::test_config(TimingStrategy::SpeechRateSynthesis);
    config.render.ffmpeg_program = "scriptcue-no-such-ffmpeg".to_string();
    let engine = SubtitleEngine::with_converter(config, ScriptConverter::builtin())?;

    let result = tokio_test::block_on(engine.generate_for_video(&common::sample_pages(), &video, &srt));

    assert!(result.is_err());
    assert!(!srt.exists());
    Ok(())
}
