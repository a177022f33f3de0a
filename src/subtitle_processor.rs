use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;

// @module: Cue model, SRT serialization and parsing

// @const: SRT timestamp regex (whisper.cpp may emit '.' before the millis)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Display text, lines joined with '\n'
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(index: usize, start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start,
            end,
            text: text.into(),
        }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start: f64, end: f64, text: &str) -> Result<Self> {
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end, start
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for cue {}", index));
        }

        Ok(Cue::new(index, start, end, trimmed_text))
    }

    /// Length of the cue in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Number of characters in the text (line breaks excluded)
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| *c != '\n').count()
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
        Ok(total_ms as f64 / 1000.0)
    }

    /// Format seconds as an SRT timestamp (HH:MM:SS,mmm), rounded to the millisecond
    pub fn format_timestamp(secs: f64) -> String {
        let ms = if secs.is_finite() && secs > 0.0 {
            (secs * 1000.0).round() as u64
        } else {
            0
        };
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start),
            Self::format_timestamp(self.end)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Render cues as SRT text, renumbering from 1 regardless of their indices
pub fn serialize(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            Cue::format_timestamp(cue.start),
            Cue::format_timestamp(cue.end),
            cue.text
        ));
    }
    out
}

/// Renumber cues in place so indices are 1-based and contiguous
pub fn renumber(cues: &mut [Cue]) {
    for (i, cue) in cues.iter_mut().enumerate() {
        cue.index = i + 1;
    }
}

/// Collection of cues bound to an output file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Subtitle file path (target or source)
    pub source_file: PathBuf,

    /// Ordered cues
    pub entries: Vec<Cue>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Create a collection from finished cues
    pub fn from_cues(source_file: PathBuf, entries: Vec<Cue>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
        }
    }

    /// SRT text of the collection
    pub fn to_srt_string(&self) -> String {
        serialize(&self.entries)
    }

    /// Write subtitles to an SRT file.
    ///
    /// The content goes to a temporary file in the destination directory which
    /// replaces `path` only once fully written.
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_atomic(path, self.to_srt_string().as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        debug!("Wrote {} cues to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Read and parse an SRT file
    pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let entries = Self::parse_srt_string(&content)?;
        Ok(Self::from_cues(path.to_path_buf(), entries))
    }

    /// Parse SRT format string into cues
    pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_index: Option<usize> = None;
        let mut current_times: Option<(f64, f64)> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |index: usize, (start, end): (f64, f64), text: &str| {
            match Cue::new_validated(index, start, end, text) {
                Ok(cue) => entries.push(cue),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", index, e),
            }
        };

        // A BOM would hide the first sequence number
        let content = content.trim_start_matches('\u{feff}');

        for (line_number, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(index), Some(times)) = (current_index, current_times) {
                    if !current_text.is_empty() {
                        add_current_entry(index, times, &current_text);
                        current_index = None;
                        current_times = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if current_index.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
            }

            if current_index.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    current_times = Some((Self::captured_secs(&caps, 1), Self::captured_secs(&caps, 5)));
                    continue;
                }
            }

            if current_index.is_some() && current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!(
                    "Unexpected text at line {} before sequence number or timestamp: {}",
                    line_number + 1,
                    trimmed
                );
            }
        }

        if let (Some(index), Some(times)) = (current_index, current_times) {
            if !current_text.is_empty() {
                add_current_entry(index, times, &current_text);
            }
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        entries.sort_by(|a, b| a.start.total_cmp(&b.start));

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end > pair[1].start)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        renumber(&mut entries);
        Ok(entries)
    }

    fn captured_secs(caps: &regex::Captures, start_idx: usize) -> f64 {
        let field = |offset: usize| -> u64 {
            caps.get(start_idx + offset)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        let ms = (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3);
        ms as f64 / 1000.0
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "File: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.entries.len())?;
        Ok(())
    }
}
