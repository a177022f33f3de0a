/*!
 * Simplified to traditional Chinese conversion of cue text.
 *
 * The strategy is chosen once at initialization:
 * - `External`: the OpenCC command line tool, when it is installed and works
 * - `BuiltinTable`: the bundled character table in `table`
 * - `Passthrough`: text is returned unchanged
 *
 * Conversion never fails. An external call that errors or outlives its
 * timeout falls back to the table (or passthrough) for that call.
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use tokio::process::Command;

use crate::app_config::ConversionConfig;
use crate::media;

pub mod table;

/// OpenCC invocation settings
#[derive(Debug, Clone, PartialEq)]
pub struct OpenCcCommand {
    /// Resolved program path
    pub program: PathBuf,
    /// Conversion profile, e.g. `s2t.json`
    pub config: String,
    /// Longest wait for one call
    pub timeout: Duration,
}

impl OpenCcCommand {
    /// Convert text through the program using input and output files
    async fn run(&self, text: &str) -> Result<String> {
        let work_dir = tempfile::Builder::new()
            .prefix("scriptcue-opencc-")
            .tempdir()
            .context("Failed to create opencc work directory")?;
        let input = work_dir.path().join("input.txt");
        let output = work_dir.path().join("output.txt");
        tokio::fs::write(&input, text)
            .await
            .context("Failed to write opencc input")?;

        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg(&self.config)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output);
        media::run_with_timeout(command, "opencc", self.timeout).await?;

        let mut converted = tokio::fs::read_to_string(&output)
            .await
            .context("Failed to read opencc output")?;
        // opencc appends a newline the input may not have had
        if !text.ends_with('\n') && converted.ends_with('\n') {
            converted.pop();
        }
        Ok(converted)
    }
}

/// Selected conversion strategy
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionStrategy {
    /// OpenCC command line tool
    External(OpenCcCommand),
    /// Bundled character table
    BuiltinTable,
    /// No conversion
    Passthrough,
}

impl std::fmt::Display for ConversionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::External(cmd) => write!(f, "opencc ({})", cmd.config),
            Self::BuiltinTable => write!(f, "builtin table"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Converts cue text using the strategy picked at initialization
#[derive(Debug)]
pub struct ScriptConverter {
    strategy: ConversionStrategy,
    table_fallback: bool,
    runtime_failure_logged: AtomicBool,
}

impl ScriptConverter {
    /// Pick the first available strategy for the configuration
    pub async fn initialize(config: &ConversionConfig) -> Self {
        if !config.traditional_chinese {
            info!("Traditional Chinese conversion disabled");
            return Self::with_strategy(ConversionStrategy::Passthrough, false);
        }

        if let Some(command) = Self::detect_opencc(config).await {
            info!("Using OpenCC for script conversion: {}", command.program.display());
            return Self::with_strategy(ConversionStrategy::External(command), config.use_builtin_table);
        }

        if config.use_builtin_table {
            info!(
                "OpenCC not available, using builtin table ({} characters)",
                table::TABLE.len()
            );
            return Self::with_strategy(ConversionStrategy::BuiltinTable, false);
        }

        warn!("No script conversion available; cue text will be left unchanged");
        Self::with_strategy(ConversionStrategy::Passthrough, false)
    }

    /// Converter with an explicit strategy
    pub fn with_strategy(strategy: ConversionStrategy, table_fallback: bool) -> Self {
        Self {
            strategy,
            table_fallback,
            runtime_failure_logged: AtomicBool::new(false),
        }
    }

    /// Converter that never changes text
    pub fn passthrough() -> Self {
        Self::with_strategy(ConversionStrategy::Passthrough, false)
    }

    /// Converter using only the bundled table
    pub fn builtin() -> Self {
        Self::with_strategy(ConversionStrategy::BuiltinTable, false)
    }

    /// Strategy chosen at initialization
    pub fn strategy(&self) -> &ConversionStrategy {
        &self.strategy
    }

    async fn detect_opencc(config: &ConversionConfig) -> Option<OpenCcCommand> {
        let program = which::which(&config.opencc_program).ok()?;
        let command = OpenCcCommand {
            program,
            config: config.opencc_config.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        };

        // A broken install or a missing profile shows up on the first call
        match command.run("简体").await {
            Ok(_) => Some(command),
            Err(e) => {
                debug!("OpenCC found but unusable: {}", e);
                None
            }
        }
    }

    /// Convert text; unmapped characters pass through unchanged
    pub async fn convert(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match &self.strategy {
            ConversionStrategy::External(command) => match command.run(text).await {
                Ok(converted) => converted,
                Err(e) => self.after_external_failure(text, e),
            },
            ConversionStrategy::BuiltinTable => convert_with_table(text),
            ConversionStrategy::Passthrough => text.to_string(),
        }
    }

    /// Convert a batch of single-line texts with at most one external call
    pub async fn convert_all(&self, texts: &[String]) -> Vec<String> {
        let command = match &self.strategy {
            ConversionStrategy::External(command) if !texts.iter().any(|t| t.contains('\n')) => command,
            _ => return self.convert_each(texts).await,
        };

        let joined = texts.join("\n");
        match command.run(&joined).await {
            Ok(converted) => {
                let lines: Vec<String> = converted.split('\n').map(str::to_string).collect();
                if lines.len() == texts.len() {
                    lines
                } else {
                    debug!(
                        "OpenCC returned {} lines for {} inputs, converting one by one",
                        lines.len(),
                        texts.len()
                    );
                    self.convert_each(texts).await
                }
            }
            Err(e) => texts
                .iter()
                .map(|t| self.after_external_failure(t, anyhow!("{}", e)))
                .collect(),
        }
    }

    async fn convert_each(&self, texts: &[String]) -> Vec<String> {
        let mut converted = Vec::with_capacity(texts.len());
        for text in texts {
            converted.push(self.convert(text).await);
        }
        converted
    }

    fn after_external_failure(&self, text: &str, error: anyhow::Error) -> String {
        if !self.runtime_failure_logged.swap(true, Ordering::Relaxed) {
            warn!("OpenCC conversion failed ({}), falling back", error);
        }
        if self.table_fallback {
            convert_with_table(text)
        } else {
            text.to_string()
        }
    }
}

/// Character-by-character conversion with the bundled table
pub fn convert_with_table(text: &str) -> String {
    text.chars().map(table::lookup).collect()
}
