/*!
 * Cue length control.
 *
 * Over-long cues are cut at the strongest break available near the limit
 * (sentence terminators, then semicolons and colons, then commas, then
 * whitespace, then a forced cut). The parent time range is shared out by
 * character count, short pieces are merged into a neighbour, and each piece
 * is optionally wrapped onto several display lines.
 */

use log::debug;

use crate::app_config::SubtitleConfig;
use crate::segmenter::{PunctuationClass, is_cjk, is_closing_mark};
use crate::subtitle_processor::{Cue, renumber};

/// Display limits for one cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthProfile {
    /// Characters per display line
    pub chars_per_line: usize,
    /// Display lines per cue
    pub max_lines: usize,
    /// Minimum time a cue stays on screen, in seconds
    pub min_display_secs: f64,
}

impl LengthProfile {
    /// Create a profile
    pub fn new(chars_per_line: usize, max_lines: usize, min_display_secs: f64) -> Self {
        Self {
            chars_per_line,
            max_lines,
            min_display_secs,
        }
    }

    /// Characters allowed in a whole cue
    pub fn max_chars_per_cue(&self) -> usize {
        (self.chars_per_line * self.max_lines.max(1)).max(1)
    }
}

/// Splits and wraps cues to fit a length profile
#[derive(Debug, Clone)]
pub struct CueFormatter {
    profile: LengthProfile,
    min_segment_chars: usize,
}

impl CueFormatter {
    /// Formatter for a profile; pieces below `min_segment_chars` are merged
    pub fn new(profile: LengthProfile, min_segment_chars: usize) -> Self {
        Self {
            profile,
            min_segment_chars,
        }
    }

    /// Formatter for the subtitle section of the configuration
    pub fn from_config(config: &SubtitleConfig) -> Self {
        Self::new(config.profile(), config.min_segment_chars)
    }

    /// Active profile
    pub fn profile(&self) -> &LengthProfile {
        &self.profile
    }

    /// Split, wrap and renumber a cue list
    pub fn format_all(&self, cues: &[Cue]) -> Vec<Cue> {
        let max_chars = self.profile.max_chars_per_cue();
        let mut formatted: Vec<Cue> = cues
            .iter()
            .flat_map(|cue| self.split_if_needed(cue, max_chars))
            .collect();

        if self.profile.max_lines > 1 {
            for cue in formatted.iter_mut() {
                cue.text = self.wrap_lines(&cue.text);
            }
        }

        renumber(&mut formatted);
        formatted
    }

    /// Split a cue longer than `max_chars_per_cue` into timed pieces.
    ///
    /// A cue within the limit comes back unchanged. Otherwise the pieces'
    /// durations add up to the parent's and the last piece ends exactly at
    /// the parent's end.
    pub fn split_if_needed(&self, cue: &Cue, max_chars_per_cue: usize) -> Vec<Cue> {
        let max_chars = max_chars_per_cue.max(1);
        if cue.char_count() <= max_chars {
            return vec![cue.clone()];
        }

        let flat = join_wrapped_lines(&cue.text);
        let raw_pieces = split_text(&flat, max_chars);
        let raw_pieces = merge_short_pieces(raw_pieces, self.min_segment_chars, max_chars);

        let weights: Vec<usize> = raw_pieces.iter().map(|p| p.chars().count()).collect();
        let durations = self.distribute(cue.duration(), &weights);

        let last = raw_pieces.len() - 1;
        let mut start = cue.start;
        let pieces: Vec<Cue> = raw_pieces
            .iter()
            .zip(durations)
            .enumerate()
            .map(|(i, (text, duration))| {
                let end = if i == last { cue.end } else { start + duration };
                let piece = Cue::new(cue.index, start, end, text.trim());
                start = end;
                piece
            })
            .collect();

        debug!(
            "Split cue {} ({} chars) into {} pieces",
            cue.index,
            cue.char_count(),
            pieces.len()
        );
        pieces
    }

    /// Share `total` out by weight, lifting short pieces to the minimum
    /// display time when the total is large enough for every piece to get it
    fn distribute(&self, total: f64, weights: &[usize]) -> Vec<f64> {
        let weight_sum: usize = weights.iter().sum();
        let n = weights.len();
        if weight_sum == 0 || n == 0 {
            return vec![total / n.max(1) as f64; n];
        }

        let proportional = |fixed: &[bool], budget: f64| -> Vec<f64> {
            let free_weight: usize = weights
                .iter()
                .zip(fixed)
                .filter(|(_, f)| !**f)
                .map(|(w, _)| *w)
                .sum();
            weights
                .iter()
                .zip(fixed)
                .map(|(w, f)| {
                    if *f {
                        self.profile.min_display_secs
                    } else if free_weight == 0 {
                        0.0
                    } else {
                        budget * *w as f64 / free_weight as f64
                    }
                })
                .collect()
        };

        let min = self.profile.min_display_secs;
        let mut fixed = vec![false; n];
        let mut durations = proportional(&fixed, total);

        if min <= 0.0 || total < min * n as f64 {
            return durations;
        }

        loop {
            let mut changed = false;
            for (i, d) in durations.iter().enumerate() {
                if !fixed[i] && *d < min {
                    fixed[i] = true;
                    changed = true;
                }
            }
            if !changed {
                return durations;
            }
            let budget = total - min * fixed.iter().filter(|f| **f).count() as f64;
            durations = proportional(&fixed, budget);
        }
    }

    /// Wrap text onto at most `max_lines` balanced lines.
    ///
    /// Lines break at whitespace near the balanced length when possible.
    pub fn wrap_lines(&self, text: &str) -> String {
        wrap_lines(text, self.profile.chars_per_line, self.profile.max_lines)
    }
}

/// Split priority of a cut placed after `chars[len - 1]`
fn break_priority(chars: &[char], len: usize) -> u8 {
    let last = chars[len - 1];
    if let Some(class) = PunctuationClass::of(last) {
        return class.split_priority();
    }
    if is_closing_mark(last) && len >= 2 {
        if let Some(class) = PunctuationClass::of(chars[len - 2]) {
            return class.split_priority();
        }
    }
    if last.is_whitespace() {
        return 1;
    }
    0
}

/// Length of the next piece: best break in the back half of the window
fn best_cut(chars: &[char], max_chars: usize) -> usize {
    let window_start = (max_chars / 2).max(1);
    let mut best = (0u8, max_chars);

    for len in window_start..=max_chars {
        let priority = break_priority(chars, len);
        if priority > 0 && priority >= best.0 {
            best = (priority, len);
        }
    }

    best.1
}

/// Cut text into raw (untrimmed) pieces of at most `max_chars` characters
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut rest: &[char] = &chars;

    while rest.len() > max_chars {
        let cut = best_cut(rest, max_chars);
        pieces.push(rest[..cut].iter().collect::<String>());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        pieces.push(rest.iter().collect());
    }

    pieces
}

/// Merge pieces shorter than `min_chars` into a neighbour that has room
fn merge_short_pieces(pieces: Vec<String>, min_chars: usize, max_chars: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(pieces.len());
    let mut pending = pieces.into_iter().peekable();

    while let Some(piece) = pending.next() {
        let len = piece.chars().count();
        if piece.trim().chars().count() >= min_chars {
            merged.push(piece);
            continue;
        }

        if let Some(prev) = merged.last_mut() {
            if prev.chars().count() + len <= max_chars {
                prev.push_str(&piece);
                continue;
            }
        }

        if let Some(next) = pending.peek_mut() {
            if next.chars().count() + len <= max_chars {
                next.insert_str(0, &piece);
                continue;
            }
        }

        merged.push(piece);
    }

    // Whitespace-only pieces cannot be displayed
    let mut result: Vec<String> = Vec::with_capacity(merged.len());
    for piece in merged {
        if piece.trim().is_empty() {
            if let Some(prev) = result.last_mut() {
                prev.push_str(&piece);
                continue;
            }
        }
        result.push(piece);
    }
    if result.len() > 1 && result[0].trim().is_empty() {
        let head = result.remove(0);
        result[0].insert_str(0, &head);
    }

    result
}

/// Undo line wrapping: a space between Latin words, nothing between CJK characters
fn join_wrapped_lines(text: &str) -> String {
    let mut joined = String::with_capacity(text.len());
    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        let needs_space = match (joined.chars().last(), line.chars().next()) {
            (Some(prev), Some(next)) => !is_cjk(prev) && !is_cjk(next),
            _ => false,
        };
        if needs_space {
            joined.push(' ');
        }
        joined.push_str(line);
    }
    joined
}

/// Wrap text onto at most `max_lines` lines of about `chars_per_line` characters
pub fn wrap_lines(text: &str, chars_per_line: usize, max_lines: usize) -> String {
    let chars: Vec<char> = join_wrapped_lines(text).trim().chars().collect();
    let per_line = chars_per_line.max(1);
    if max_lines <= 1 || chars.len() <= per_line {
        return chars.iter().collect();
    }

    let line_count = chars.len().div_ceil(per_line).min(max_lines);
    let mut lines: Vec<String> = Vec::with_capacity(line_count);
    let mut rest: &[char] = &chars;

    for remaining_lines in (2..=line_count).rev() {
        let target = rest.len().div_ceil(remaining_lines);
        let upper = per_line.min(rest.len());
        let lower = (target / 2).max(1);

        let space = (lower..=upper)
            .filter(|&p| p < rest.len() && rest[p].is_whitespace())
            .min_by_key(|&p| p.abs_diff(target));

        let (line_end, next_start) = match space {
            Some(p) => (p, p + 1),
            None => {
                let cut = target.min(upper);
                (cut, cut)
            }
        };

        lines.push(rest[..line_end].iter().collect::<String>().trim().to_string());
        rest = &rest[next_start..];
    }
    lines.push(rest.iter().collect::<String>().trim().to_string());

    lines.retain(|line| !line.is_empty());
    lines.join("\n")
}
