/*!
 * # scriptcue - Subtitles from narration scripts
 *
 * A Rust library that turns the finalized narration script of a video into
 * a timed subtitle file and burns it into the video.
 *
 * ## Features
 *
 * - Punctuation-aware sentence segmentation of narration pages
 * - Two timing strategies:
 *   - ASR mapping: recognizer timing, narration wording
 *   - Speech-rate synthesis: timing from characters per second
 * - Length control with minimum display time and optional line wrapping
 * - Simplified to traditional Chinese conversion (OpenCC or bundled table)
 * - SRT serialization with atomic file writes
 * - ffmpeg rendering with a fallback ladder down to a soft subtitle track
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `engine`: `SubtitleEngine`, composing all stages of a job
 * - `segmenter`: Sentence segmentation and pause accounting
 * - `timing`: Timing strategies and timeline normalization:
 *   - `timing::speech_rate`: Speech-rate timestamp synthesis
 *   - `timing::asr_mapping`: ASR timestamp mapping
 * - `formatter`: Cue splitting and line wrapping
 * - `conversion`: Script conversion
 * - `subtitle_processor`: Cue model, SRT serialization and parsing
 * - `validation`: Timeline checks of finished cues
 * - `asr`: Speech recognizer boundary and whisper backends
 * - `media`: Audio extraction, duration probing, bounded subprocesses
 * - `render`: Burn-in with style presets and fallbacks
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `logging`: Log output
 * - `errors`: Custom error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod asr;
pub mod conversion;
pub mod engine;
pub mod errors;
pub mod file_utils;
pub mod formatter;
pub mod language_utils;
pub mod logging;
pub mod media;
pub mod render;
pub mod segmenter;
pub mod subtitle_processor;
pub mod timing;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use asr::{AsrModelHandle, SpeechRecognizer, TimedSegment};
pub use conversion::ScriptConverter;
pub use engine::{GeneratedSubtitles, SubtitleEngine};
pub use errors::{AsrError, ConfigError, EngineError, InputError, MediaError, RenderError};
pub use formatter::{CueFormatter, LengthProfile};
pub use render::{RenderDispatcher, SubtitleStyle};
pub use segmenter::{Sentence, segment, segment_pages};
pub use subtitle_processor::{Cue, SubtitleCollection, serialize};
pub use timing::TimingStrategy;
