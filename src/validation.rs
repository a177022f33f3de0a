/*!
 * Timeline validation for finished cue lists.
 *
 * This module checks that cues are:
 * - Logically consistent (start < end, non-empty text)
 * - Ordered and non-overlapping beyond a millisecond of rounding
 * - Within reading speed and duration limits
 *
 * Issues are reported, never fixed here.
 */

use log::{debug, warn};

use crate::app_config::SubtitleConfig;
use crate::subtitle_processor::Cue;

/// Overlap tolerated between neighbours, in seconds (SRT resolution)
const OVERLAP_TOLERANCE_SECS: f64 = 0.001;

/// Maximum duration for a single cue in seconds
const MAX_CUE_DURATION_SECS: f64 = 30.0;

/// Types of timeline issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineIssue {
    /// End is not after start
    InvalidTimeRange { start: f64, end: f64 },
    /// Text is blank
    EmptyText,
    /// Shorter than the minimum display time
    DurationTooShort { duration: f64, min_duration: f64 },
    /// Longer than any cue should stay on screen
    DurationTooLong { duration: f64, max_duration: f64 },
    /// Reading speed exceeds limit
    ReadingSpeedTooHigh { cps: f64, max_cps: f64 },
    /// Starts before the previous cue ends
    OverlapsWithCue { other_index: usize, overlap: f64 },
    /// Starts before the previous cue starts
    OutOfOrder { previous_index: usize },
}

impl std::fmt::Display for TimelineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s >= end {:.3}s", start, end)
            }
            TimelineIssue::EmptyText => write!(f, "Empty cue text"),
            TimelineIssue::DurationTooShort { duration, min_duration } => {
                write!(f, "Duration too short: {:.3}s (min: {:.3}s)", duration, min_duration)
            }
            TimelineIssue::DurationTooLong { duration, max_duration } => {
                write!(f, "Duration too long: {:.3}s (max: {:.3}s)", duration, max_duration)
            }
            TimelineIssue::ReadingSpeedTooHigh { cps, max_cps } => {
                write!(f, "Reading speed too high: {:.1} CPS (max: {:.1})", cps, max_cps)
            }
            TimelineIssue::OverlapsWithCue { other_index, overlap } => {
                write!(f, "Overlaps with cue {} by {:.3}s", other_index, overlap)
            }
            TimelineIssue::OutOfOrder { previous_index } => {
                write!(f, "Starts before cue {}", previous_index)
            }
        }
    }
}

/// Issues found for one cue
#[derive(Debug, Clone)]
pub struct CueIssues {
    /// Cue index
    pub index: usize,
    /// Issues found
    pub issues: Vec<TimelineIssue>,
}

/// Result of validating a cue list
#[derive(Debug, Clone, Default)]
pub struct TimelineReport {
    /// Cues with at least one issue
    pub flagged: Vec<CueIssues>,
    /// Number of overlapping neighbours
    pub overlap_count: usize,
}

impl TimelineReport {
    /// No issues at all
    pub fn passed(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Total issue count
    pub fn total_issues(&self) -> usize {
        self.flagged.iter().map(|c| c.issues.len()).sum()
    }

    /// Log every issue at warning level
    pub fn log_issues(&self) {
        for cue in &self.flagged {
            for issue in &cue.issues {
                warn!("Cue {}: {}", cue.index, issue);
            }
        }
    }
}

/// Configuration for timeline validation
#[derive(Debug, Clone)]
pub struct TimelineValidatorConfig {
    /// Maximum characters per second
    pub max_cps: f64,
    /// Minimum cue duration in seconds
    pub min_duration: f64,
    /// Maximum cue duration in seconds
    pub max_duration: f64,
}

impl Default for TimelineValidatorConfig {
    fn default() -> Self {
        Self {
            max_cps: 12.0,
            min_duration: 0.5,
            max_duration: MAX_CUE_DURATION_SECS,
        }
    }
}

impl TimelineValidatorConfig {
    /// Limits matching the subtitle configuration
    pub fn from_subtitle_config(config: &SubtitleConfig) -> Self {
        Self {
            max_cps: config.max_chars_per_second,
            min_duration: config.profile().min_display_secs,
            max_duration: MAX_CUE_DURATION_SECS,
        }
    }
}

/// Timeline validator for cue lists
#[derive(Debug, Clone, Default)]
pub struct TimelineValidator {
    config: TimelineValidatorConfig,
}

impl TimelineValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimelineValidatorConfig) -> Self {
        Self { config }
    }

    /// Issues of a single cue, ignoring its neighbours
    pub fn validate_cue(&self, cue: &Cue) -> Vec<TimelineIssue> {
        let mut issues = Vec::new();

        if cue.text.trim().is_empty() {
            issues.push(TimelineIssue::EmptyText);
        }

        if !(cue.end > cue.start) {
            issues.push(TimelineIssue::InvalidTimeRange {
                start: cue.start,
                end: cue.end,
            });
            return issues;
        }

        let duration = cue.duration();
        // Compare at millisecond resolution, as written to the file
        if duration + OVERLAP_TOLERANCE_SECS < self.config.min_duration {
            issues.push(TimelineIssue::DurationTooShort {
                duration,
                min_duration: self.config.min_duration,
            });
        }
        if duration > self.config.max_duration {
            issues.push(TimelineIssue::DurationTooLong {
                duration,
                max_duration: self.config.max_duration,
            });
        }

        let cps = Self::calculate_cps(cue);
        if cps > self.config.max_cps {
            issues.push(TimelineIssue::ReadingSpeedTooHigh {
                cps,
                max_cps: self.config.max_cps,
            });
        }

        issues
    }

    /// Validate a whole cue list in order
    pub fn validate(&self, cues: &[Cue]) -> TimelineReport {
        let mut report = TimelineReport::default();

        for (i, cue) in cues.iter().enumerate() {
            let mut issues = self.validate_cue(cue);

            if let Some(prev) = i.checked_sub(1).map(|p| &cues[p]) {
                if cue.start < prev.start {
                    issues.push(TimelineIssue::OutOfOrder {
                        previous_index: prev.index,
                    });
                }
                let overlap = prev.end - cue.start;
                if overlap > OVERLAP_TOLERANCE_SECS {
                    report.overlap_count += 1;
                    issues.push(TimelineIssue::OverlapsWithCue {
                        other_index: prev.index,
                        overlap,
                    });
                }
            }

            if !issues.is_empty() {
                report.flagged.push(CueIssues {
                    index: cue.index,
                    issues,
                });
            }
        }

        debug!(
            "Timeline validation: {} cues, {} issues, {} overlaps",
            cues.len(),
            report.total_issues(),
            report.overlap_count
        );
        report
    }

    /// Characters (line breaks excluded) per second of a cue
    pub fn calculate_cps(cue: &Cue) -> f64 {
        let duration = cue.duration();
        if duration > 0.0 {
            cue.char_count() as f64 / duration
        } else {
            f64::INFINITY
        }
    }
}
