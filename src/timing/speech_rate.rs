/*!
 * Speech-rate timestamp synthesis.
 *
 * Without a recognizer pass the only timing evidence is the audio duration.
 * A global rate in effective characters per second is estimated after
 * discounting punctuation pauses, each sentence gets speaking time plus the
 * pause of its closing mark, and the result is aligned to the audio length.
 */

use log::{debug, info};

use crate::app_config::TimingConfig;
use crate::errors::InputError;
use crate::segmenter::{self, DEFAULT_PAUSE_SECS, Sentence};
use crate::subtitle_processor::Cue;

/// Speaking time given to a sentence that has no word characters
const EMPTY_SPEECH_SECS: f64 = 0.1;

/// Assigns timestamps from a computed characters-per-second rate
#[derive(Debug, Clone)]
pub struct SpeechRateSynthesizer {
    min_display_secs: f64,
    rescale_threshold_secs: f64,
    min_net_speech_ratio: f64,
}

impl SpeechRateSynthesizer {
    /// Synthesizer with the default drift threshold (1 s) and net speech floor (80%)
    pub fn new(min_display_secs: f64) -> Self {
        Self::with_config(&TimingConfig::default(), min_display_secs)
    }

    /// Synthesizer using the timing section of the configuration
    pub fn with_config(timing: &TimingConfig, min_display_secs: f64) -> Self {
        Self {
            min_display_secs: min_display_secs.max(0.0),
            rescale_threshold_secs: timing.rescale_threshold_secs,
            min_net_speech_ratio: timing.min_net_speech_ratio,
        }
    }

    /// Effective characters per second of net speech
    pub fn speech_rate(&self, sentences: &[Sentence], audio_duration: f64) -> f64 {
        let effective_chars: usize = sentences.iter().map(Sentence::effective_chars).sum();
        let pause_time: f64 = sentences
            .iter()
            .map(|s| segmenter::pause_time(&s.text))
            .sum();

        let net_speech_time = (audio_duration - pause_time)
            .max(audio_duration * self.min_net_speech_ratio);

        if net_speech_time <= 0.0 {
            return 0.0;
        }

        debug!(
            "Speech rate inputs: {} chars, {:.2}s pauses, {:.2}s net speech",
            effective_chars, pause_time, net_speech_time
        );
        effective_chars as f64 / net_speech_time
    }

    /// Produce one cue per sentence covering `[0, audio_duration]`
    pub fn synthesize(
        &self,
        sentences: &[Sentence],
        audio_duration: f64,
    ) -> Result<Vec<Cue>, InputError> {
        if !audio_duration.is_finite() || audio_duration <= 0.0 {
            return Err(InputError::InvalidAudioDuration(audio_duration));
        }
        if sentences.is_empty() {
            return Err(InputError::EmptyNarration);
        }

        let rate = self.speech_rate(sentences, audio_duration);
        info!("Computed speech rate: {:.2} chars/s", rate);

        let mut cues = Vec::with_capacity(sentences.len());
        let mut current_time = 0.0;

        for (i, sentence) in sentences.iter().enumerate() {
            let effective_chars = sentence.effective_chars();
            let speech_time = if effective_chars > 0 && rate > 0.0 {
                effective_chars as f64 / rate
            } else {
                EMPTY_SPEECH_SECS
            };
            let pause_time = segmenter::trailing_pause(&sentence.text).unwrap_or(DEFAULT_PAUSE_SECS);
            let duration = (speech_time + pause_time).max(self.min_display_secs);

            cues.push(Cue::new(
                i + 1,
                current_time,
                current_time + duration,
                sentence.text.clone(),
            ));
            current_time += duration;
        }

        self.align_to_duration(&mut cues, audio_duration);
        Ok(cues)
    }

    /// Make the last cue end exactly at `audio_duration`.
    ///
    /// Drift above the threshold is corrected by scaling every timestamp;
    /// small drift only moves the final end.
    fn align_to_duration(&self, cues: &mut [Cue], audio_duration: f64) {
        let Some(last) = cues.last() else {
            return;
        };
        let computed_total = last.end;
        let drift = (computed_total - audio_duration).abs();

        if drift > self.rescale_threshold_secs || last.start >= audio_duration {
            let scale = audio_duration / computed_total;
            info!(
                "Scaling timestamps by {:.3} ({:.2}s computed vs {:.2}s audio)",
                scale, computed_total, audio_duration
            );
            for cue in cues.iter_mut() {
                cue.start *= scale;
                cue.end *= scale;
            }
        }

        if let Some(last) = cues.last_mut() {
            last.end = audio_duration;
        }
    }
}
