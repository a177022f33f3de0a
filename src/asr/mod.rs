/*!
 * Speech recognition boundary.
 *
 * The recognizer only contributes timing. Its text is advisory and is shown
 * to viewers only when it outnumbers the narration sentences.
 *
 * - `whisper`: whisper command line programs (Python whisper, whisper.cpp)
 * - `mock`: scripted recognizer for tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::errors::AsrError;

pub mod mock;
pub mod whisper;

pub use whisper::WhisperCli;

/// A recognizer hypothesis with its time range
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    /// Start in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
    /// Recognized text (advisory)
    pub text: String,
}

impl TimedSegment {
    /// Create a segment
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Finite, non-empty range with non-blank text
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.end > self.start
            && !self.text.trim().is_empty()
    }
}

/// Common trait for speech recognizers
///
/// Implementations turn an audio file into ordered time-coded segments.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    /// Transcribe an audio file
    ///
    /// # Arguments
    /// * `audio` - Mono WAV file
    /// * `language` - Optional ISO 639-1 hint
    /// * `timeout` - Bound on the whole call
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
        timeout: Duration,
    ) -> Result<Vec<TimedSegment>, AsrError>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Lazily loaded recognizer shared across jobs.
///
/// The first successful load is kept until `release` is called; a failed
/// load is not cached so a later job may try again.
#[derive(Debug, Default)]
pub struct AsrModelHandle {
    recognizer: Mutex<Option<Arc<dyn SpeechRecognizer>>>,
}

impl AsrModelHandle {
    /// Empty handle; the recognizer is loaded on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle pre-loaded with a recognizer
    pub fn with_recognizer(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer: Mutex::new(Some(recognizer)),
        }
    }

    /// Return the loaded recognizer, running `loader` if none is loaded yet
    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<dyn SpeechRecognizer>, AsrError>
    where
        F: FnOnce() -> Result<Arc<dyn SpeechRecognizer>, AsrError>,
    {
        let mut guard = self.recognizer.lock();
        if let Some(recognizer) = guard.as_ref() {
            return Ok(Arc::clone(recognizer));
        }

        let recognizer = loader()?;
        info!("Loaded ASR engine: {}", recognizer.name());
        *guard = Some(Arc::clone(&recognizer));
        Ok(recognizer)
    }

    /// Drop the loaded recognizer, returning whether one was loaded
    pub fn release(&self) -> bool {
        let released = self.recognizer.lock().take();
        if let Some(recognizer) = &released {
            info!("Released ASR engine: {}", recognizer.name());
        }
        released.is_some()
    }

    /// Whether a recognizer is currently loaded
    pub fn is_loaded(&self) -> bool {
        self.recognizer.lock().is_some()
    }
}
