/*!
 * Whisper command line recognizers.
 *
 * Both programs are asked for SRT output in a temporary directory, which is
 * parsed back into timed segments:
 * - Python whisper: `whisper <audio> --model M --output_format srt --output_dir D`
 * - whisper.cpp: `whisper-cli -m <model file> -f <audio> -osrt -of D/transcript`
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::app_config::{AsrBackend, AsrConfig};
use crate::asr::{SpeechRecognizer, TimedSegment};
use crate::errors::{AsrError, MediaError};
use crate::language_utils;
use crate::media;
use crate::subtitle_processor::SubtitleCollection;

/// Recognizer backed by a whisper command line program
#[derive(Debug, Clone)]
pub struct WhisperCli {
    backend: AsrBackend,
    program: PathBuf,
    model: String,
    name: String,
}

impl WhisperCli {
    /// Locate the configured program and check the model setting
    pub fn from_config(config: &AsrConfig) -> Result<Self, AsrError> {
        let program_name = config.program_name();
        let program = which::which(&program_name)
            .map_err(|e| AsrError::Unavailable(format!("{}: {}", program_name, e)))?;

        if config.model.trim().is_empty() {
            return Err(AsrError::ModelLoad("no model configured".to_string()));
        }
        if config.backend == AsrBackend::WhisperCpp && !Path::new(&config.model).is_file() {
            return Err(AsrError::ModelLoad(format!(
                "whisper.cpp model file not found: {}",
                config.model
            )));
        }

        debug!("Using {} at {}", config.backend, program.display());
        Ok(Self {
            backend: config.backend,
            program,
            model: config.model.clone(),
            name: format!("{} ({})", config.backend, config.model),
        })
    }

    fn build_command(&self, audio: &Path, output_dir: &Path, language: Option<&str>) -> (Command, PathBuf) {
        let mut command = Command::new(&self.program);

        let srt_path = match self.backend {
            AsrBackend::OpenaiWhisper => {
                command
                    .arg(audio)
                    .args(["--model", self.model.as_str(), "--output_format", "srt", "--output_dir"])
                    .arg(output_dir)
                    .args(["--verbose", "False"]);
                if let Some(lang) = language {
                    command.args(["--language", lang]);
                }
                let stem = audio
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "audio".to_string());
                output_dir.join(format!("{}.srt", stem))
            }
            AsrBackend::WhisperCpp => {
                let prefix = output_dir.join("transcript");
                command
                    .args(["-m", self.model.as_str(), "-f"])
                    .arg(audio)
                    .arg("-osrt")
                    .arg("-of")
                    .arg(&prefix);
                if let Some(lang) = language {
                    command.args(["-l", lang]);
                }
                output_dir.join("transcript.srt")
            }
        };

        (command, srt_path)
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperCli {
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
        timeout: Duration,
    ) -> Result<Vec<TimedSegment>, AsrError> {
        if !audio.is_file() {
            return Err(AsrError::Failed(format!("audio file not found: {}", audio.display())));
        }

        let language = language.and_then(|hint| match language_utils::normalize_to_part1(hint) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!("Ignoring language hint: {}", e);
                None
            }
        });

        let output_dir = tempfile::Builder::new()
            .prefix("scriptcue-asr-")
            .tempdir()
            .map_err(|e| AsrError::Output(e.to_string()))?;
        let (command, srt_path) = self.build_command(audio, output_dir.path(), language.as_deref());

        media::run_with_timeout(command, &self.name, timeout)
            .await
            .map_err(|e| match e {
                MediaError::Timeout { secs, .. } => AsrError::Timeout(secs),
                MediaError::ToolMissing(tool) => AsrError::Unavailable(tool),
                other => AsrError::Failed(other.to_string()),
            })?;

        let collection = SubtitleCollection::parse_srt_file(&srt_path)
            .map_err(|e| AsrError::Output(e.to_string()))?;

        let segments: Vec<TimedSegment> = collection
            .entries
            .into_iter()
            .map(|cue| TimedSegment::new(cue.start, cue.end, cue.text.replace('\n', " ")))
            .collect();

        debug!("{} returned {} segments", self.name, segments.len());
        Ok(segments)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
