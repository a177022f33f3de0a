/*!
 * Subtitle generation engine.
 *
 * One engine composes every stage of a job:
 * narration pages → sentences → timed cues (ASR mapping or speech rate)
 * → timeline normalization → length control → script conversion
 * → validation → SRT file → optional render.
 *
 * The timing strategy comes from the configuration. ASR mapping falls back
 * to speech-rate synthesis whenever the recognizer is unavailable, fails or
 * returns nothing usable.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::app_config::Config;
use crate::asr::{AsrModelHandle, SpeechRecognizer, TimedSegment, WhisperCli};
use crate::conversion::ScriptConverter;
use crate::errors::{AsrError, EngineError, InputError};
use crate::formatter::CueFormatter;
use crate::language_utils;
use crate::media;
use crate::render::{RenderDispatcher, RenderReport};
use crate::segmenter::{self, Sentence};
use crate::subtitle_processor::{Cue, SubtitleCollection, serialize};
use crate::timing::{self, SpeechRateSynthesizer, TimingStrategy};
use crate::validation::{TimelineReport, TimelineValidator, TimelineValidatorConfig};

/// Finished cues of one job
#[derive(Debug, Clone)]
pub struct GeneratedSubtitles {
    /// Final, numbered cues
    pub cues: Vec<Cue>,
    /// Strategy that actually produced the timing
    pub strategy: TimingStrategy,
    /// Validation findings (already logged)
    pub report: TimelineReport,
}

impl GeneratedSubtitles {
    /// SRT text of the cues
    pub fn to_srt(&self) -> String {
        serialize(&self.cues)
    }
}

/// Single engine for subtitle generation and rendering
#[derive(Debug)]
pub struct SubtitleEngine {
    // @field: Validated configuration
    config: Config,
    // @field: Strategy picked once at construction
    converter: ScriptConverter,
    formatter: CueFormatter,
    synthesizer: SpeechRateSynthesizer,
    validator: TimelineValidator,
    renderer: RenderDispatcher,
    // @field: Recognizer shared with other engines
    asr: Arc<AsrModelHandle>,
}

impl SubtitleEngine {
    /// Build an engine; the configuration is validated first
    pub async fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;

        let converter = ScriptConverter::initialize(&config.conversion).await;
        Ok(Self::from_parts(config, converter))
    }

    /// Build an engine with an explicit converter
    pub fn with_converter(config: Config, converter: ScriptConverter) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::from_parts(config, converter))
    }

    fn from_parts(config: Config, converter: ScriptConverter) -> Self {
        let formatter = CueFormatter::from_config(&config.subtitle);
        let profile = *formatter.profile();
        let synthesizer = SpeechRateSynthesizer::with_config(&config.timing, profile.min_display_secs);
        let validator =
            TimelineValidator::with_config(TimelineValidatorConfig::from_subtitle_config(&config.subtitle));
        let renderer = RenderDispatcher::new(&config.render);

        debug!(
            "Engine ready: strategy {}, {} chars x {} lines, conversion {}",
            config.timing.strategy,
            profile.chars_per_line,
            profile.max_lines,
            converter.strategy()
        );

        Self {
            config,
            converter,
            formatter,
            synthesizer,
            validator,
            renderer,
            asr: Arc::new(AsrModelHandle::new()),
        }
    }

    /// Share a recognizer handle, e.g. across engines of one process
    pub fn with_asr_handle(mut self, handle: Arc<AsrModelHandle>) -> Self {
        self.asr = handle;
        self
    }

    /// Recognizer handle used by this engine
    pub fn asr_handle(&self) -> &Arc<AsrModelHandle> {
        &self.asr
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment narration pages, rejecting narration without any text
    pub fn sentences<S: AsRef<str>>(&self, pages: &[S]) -> Result<Vec<Sentence>, InputError> {
        if pages.iter().all(|p| p.as_ref().trim().is_empty()) {
            return Err(InputError::EmptyNarration);
        }
        let sentences = segmenter::segment_pages(pages);
        if sentences.is_empty() {
            return Err(InputError::EmptyNarration);
        }
        Ok(sentences)
    }

    /// Cues timed from the speech rate of the narration
    pub async fn synthesize_cues<S: AsRef<str>>(
        &self,
        pages: &[S],
        audio_duration: f64,
    ) -> Result<Vec<Cue>, EngineError> {
        let sentences = self.sentences(pages)?;
        let cues = self.synthesizer.synthesize(&sentences, audio_duration)?;
        Ok(self.finalize(cues).await.cues)
    }

    /// Cues timed by recognizer segments and worded by the narration
    pub async fn map_cues<S: AsRef<str>>(
        &self,
        segments: &[TimedSegment],
        pages: &[S],
    ) -> Result<Vec<Cue>, EngineError> {
        let sentences = self.sentences(pages)?;
        let cues = timing::map_segments(segments, &sentences);
        if cues.is_empty() {
            return Err(AsrError::Output("no usable segments".to_string()).into());
        }
        Ok(self.finalize(cues).await.cues)
    }

    /// Normalize, split, convert and validate timed cues
    pub async fn finalize(&self, mut cues: Vec<Cue>) -> GeneratedSubtitles {
        timing::normalize_timeline(&mut cues, self.config.subtitle.close_gaps);
        let mut cues = self.formatter.format_all(&cues);

        let texts: Vec<String> = cues.iter().map(|c| c.text.clone()).collect();
        for (cue, text) in cues.iter_mut().zip(self.converter.convert_all(&texts).await) {
            cue.text = text;
        }

        let report = self.validator.validate(&cues);
        report.log_issues();

        GeneratedSubtitles {
            cues,
            strategy: self.config.timing.strategy,
            report,
        }
    }

    /// Generate cues for a narration audio file.
    ///
    /// `audio_duration` is probed when not given.
    pub async fn generate_for_audio<S: AsRef<str>>(
        &self,
        pages: &[S],
        audio: &Path,
        audio_duration: Option<f64>,
    ) -> Result<GeneratedSubtitles, EngineError> {
        let sentences = self.sentences(pages)?;
        if !audio.is_file() {
            return Err(InputError::MissingFile(audio.display().to_string()).into());
        }

        let duration = match audio_duration {
            Some(secs) => secs,
            None => {
                media::probe_duration(
                    &self.config.render.ffprobe_program,
                    audio,
                    self.renderer.timeout_for(None),
                )
                .await?
            }
        };
        if !duration.is_finite() || duration <= 0.0 {
            return Err(InputError::InvalidAudioDuration(duration).into());
        }

        let mut strategy = self.config.timing.strategy;
        let mut mapped = None;
        if strategy == TimingStrategy::AsrMapping {
            match self.transcribe(audio, duration).await {
                Ok(segments) if segments.iter().any(TimedSegment::is_valid) => {
                    mapped = Some(timing::map_segments(&segments, &sentences));
                }
                Ok(_) => warn!("ASR returned no usable segments, falling back to speech rate"),
                Err(e) => warn!("ASR failed ({}), falling back to speech rate", e),
            }
        }

        let cues = match mapped {
            Some(cues) if !cues.is_empty() => cues,
            _ => {
                strategy = TimingStrategy::SpeechRateSynthesis;
                self.synthesizer.synthesize(&sentences, duration)?
            }
        };

        let mut generated = self.finalize(cues).await;
        generated.strategy = strategy;
        info!(
            "Generated {} cues over {:.2}s using {}",
            generated.cues.len(),
            duration,
            strategy
        );
        Ok(generated)
    }

    async fn transcribe(&self, audio: &Path, duration: f64) -> Result<Vec<TimedSegment>, AsrError> {
        let recognizer = self.asr.get_or_load(|| {
            WhisperCli::from_config(&self.config.asr).map(|cli| Arc::new(cli) as Arc<dyn SpeechRecognizer>)
        })?;

        let language = self.config.asr.language.as_deref();
        if let Some(name) = language.and_then(|code| language_utils::get_language_name(code).ok()) {
            debug!("ASR language hint: {}", name);
        }

        let timeout = self.asr_timeout(duration);
        debug!("Transcribing {} with {} (timeout {:?})", audio.display(), recognizer.name(), timeout);

        // The bound holds even for recognizers that ignore their timeout argument
        tokio::time::timeout(timeout, recognizer.transcribe(audio, language, timeout))
            .await
            .map_err(|_| AsrError::Timeout(timeout.as_secs()))?
    }

    /// ASR time bound: base plus a multiple of the audio length
    pub fn asr_timeout(&self, audio_duration: f64) -> Duration {
        let extra = Duration::try_from_secs_f64(audio_duration * self.config.asr.timeout_per_audio_sec)
            .unwrap_or_default();
        Duration::from_secs(self.config.asr.timeout_secs).saturating_add(extra)
    }

    /// Generate the subtitle file for a narrated video.
    ///
    /// The extracted audio is removed on every path; the subtitle file is
    /// only created once all cues are ready.
    pub async fn generate_for_video<S: AsRef<str>>(
        &self,
        pages: &[S],
        video: &Path,
        subtitle_out: &Path,
    ) -> Result<GeneratedSubtitles, EngineError> {
        self.sentences(pages)?;
        if !video.is_file() {
            return Err(InputError::MissingFile(video.display().to_string()).into());
        }

        let timeout = self.renderer.timeout_for(None);
        let audio = media::extract_audio(&self.config.render.ffmpeg_program, video, timeout).await?;
        let duration =
            media::probe_duration(&self.config.render.ffprobe_program, audio.path(), timeout).await?;

        let generated = self.generate_for_audio(pages, audio.path(), Some(duration)).await?;

        SubtitleCollection::from_cues(PathBuf::from(subtitle_out), generated.cues.clone())
            .write_to_srt(subtitle_out)?;
        info!("Subtitles written to {}", subtitle_out.display());

        Ok(generated)
    }

    /// Burn a subtitle file into a video using the configured style
    pub async fn render(
        &self,
        video_in: &Path,
        subtitle_file: &Path,
        video_out: &Path,
    ) -> Result<RenderReport, EngineError> {
        let report = self
            .renderer
            .burn_in(video_in, subtitle_file, video_out, self.renderer.default_style())
            .await?;
        Ok(report)
    }
}
