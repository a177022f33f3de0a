/*!
 * Error types for the scriptcue engine.
 *
 * This module contains custom error types for the different stages of the
 * subtitle pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors caused by unusable job input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// No narration text at all (or only whitespace)
    #[error("Narration text is empty")]
    EmptyNarration,

    /// Audio duration is zero, negative or not a number
    #[error("Invalid audio duration: {0} seconds")]
    InvalidAudioDuration(f64),

    /// Referenced file does not exist
    #[error("Input file not found: {0}")]
    MissingFile(String),
}

/// Errors raised by the speech recognition boundary
#[derive(Error, Debug)]
pub enum AsrError {
    /// No recognizer program could be located
    #[error("ASR engine unavailable: {0}")]
    Unavailable(String),

    /// The model could not be loaded or located
    #[error("Failed to load ASR model: {0}")]
    ModelLoad(String),

    /// The recognizer ran but reported a failure
    #[error("Transcription failed: {0}")]
    Failed(String),

    /// The recognizer did not finish within the allowed time
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),

    /// The recognizer output could not be read or parsed
    #[error("Unreadable ASR output: {0}")]
    Output(String),
}

/// Errors from external media tools (ffmpeg, ffprobe)
#[derive(Error, Debug)]
pub enum MediaError {
    /// Tool binary not found on PATH
    #[error("Media tool not found: {0}")]
    ToolMissing(String),

    /// Tool exited with a non-zero status
    #[error("{tool} failed: {message}")]
    CommandFailed {
        /// Program name
        tool: String,
        /// Filtered stderr
        message: String,
    },

    /// Tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Program name
        tool: String,
        /// Allowed wait in seconds
        secs: u64,
    },

    /// Duration or stream information could not be determined
    #[error("Probe failed: {0}")]
    Probe(String),

    /// Filesystem error around the tool invocation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the render dispatcher
#[derive(Error, Debug)]
pub enum RenderError {
    /// Source video or subtitle file unusable
    #[error("Invalid render input: {0}")]
    InvalidInput(String),

    /// Every rung of the fallback ladder failed
    #[error("All {attempts} render attempts failed, last error: {last_error}")]
    Exhausted {
        /// Number of attempts made
        attempts: usize,
        /// Message of the final failure
        last_error: String,
    },

    /// Filesystem error while preparing or persisting the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value the engine cannot work with
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Field path, e.g. `subtitle.chars_per_line`
        field: String,
        /// Why it is rejected
        reason: String,
    },
}

/// Main engine error type that wraps all other errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Unusable input
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Speech recognition failure
    #[error("ASR error: {0}")]
    Asr(#[from] AsrError),

    /// Media tool failure
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Render failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for EngineError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
