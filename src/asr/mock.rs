/*!
 * Mock recognizer implementations for testing.
 *
 * This module provides recognizers that simulate different behaviors:
 * - `MockRecognizer::working()` - Returns the configured segments
 * - `MockRecognizer::failing()` - Always fails with an error
 * - `MockRecognizer::slow()` - Waits before answering (for timeout testing)
 * - `MockRecognizer::empty()` - Succeeds with no segments
 * - `MockRecognizer::ignoring_timeout()` - Answers late, whatever its timeout
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::asr::{SpeechRecognizer, TimedSegment};
use crate::errors::AsrError;

/// Behavior mode for the mock recognizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with the configured segments
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds with no segments
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
    /// Succeeds after a delay without looking at its timeout
    IgnoresTimeout { delay_ms: u64 },
}

/// Mock recognizer for testing timing behavior
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    behavior: MockBehavior,
    segments: Vec<TimedSegment>,
    call_count: Arc<AtomicUsize>,
}

impl MockRecognizer {
    /// Create a new mock recognizer with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            segments: vec![
                TimedSegment::new(0.0, 2.0, "大家好"),
                TimedSegment::new(2.0, 4.0, "歡迎收看"),
            ],
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock recognizer
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock recognizer
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns no segments
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Create a mock that answers after `delay_ms` even past its timeout
    pub fn ignoring_timeout(delay_ms: u64) -> Self {
        Self::new(MockBehavior::IgnoresTimeout { delay_ms })
    }

    /// Replace the segments returned on success
    pub fn with_segments(mut self, segments: Vec<TimedSegment>) -> Self {
        self.segments = segments;
        self
    }

    /// Number of transcribe calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(
        &self,
        _audio: &Path,
        _language: Option<&str>,
        timeout: Duration,
    ) -> Result<Vec<TimedSegment>, AsrError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.segments.clone()),
            MockBehavior::Failing => Err(AsrError::Failed("simulated recognizer failure".to_string())),
            MockBehavior::Empty => Ok(Vec::new()),
            MockBehavior::Slow { delay_ms } => {
                let delay = tokio::time::sleep(Duration::from_millis(delay_ms));
                match tokio::time::timeout(timeout, delay).await {
                    Ok(()) => Ok(self.segments.clone()),
                    Err(_) => Err(AsrError::Timeout(timeout.as_secs())),
                }
            }
            MockBehavior::IgnoresTimeout { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(self.segments.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
