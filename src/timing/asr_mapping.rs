/*!
 * Recognizer timestamp mapping.
 *
 * Recognizer segments are split along punctuation into sub-segments, then
 * narration sentences are substituted onto them one-to-one in order. The
 * narration audio is synthesized from the script, so order is shared and no
 * fuzzy matching is attempted.
 */

use log::{debug, warn};

use crate::asr::TimedSegment;
use crate::segmenter::{self, Sentence};
use crate::subtitle_processor::Cue;

/// Split each recognizer segment at its internal sentence boundaries.
///
/// Sub-segment durations are proportional to character count; the final
/// sub-segment ends exactly where its parent ends. Segments with an empty
/// text or a non-positive range are skipped.
pub fn resegment(segments: &[TimedSegment]) -> Vec<TimedSegment> {
    let mut result = Vec::with_capacity(segments.len());

    for segment in segments {
        if !segment.is_valid() {
            debug!(
                "Skipping unusable ASR segment {:.3}-{:.3}: {:?}",
                segment.start, segment.end, segment.text
            );
            continue;
        }

        let pieces = segmenter::segment(&segment.text);
        if pieces.len() <= 1 {
            if let Some(piece) = pieces.into_iter().next() {
                result.push(TimedSegment::new(segment.start, segment.end, piece.text));
            }
            continue;
        }

        let total_chars: usize = pieces.iter().map(Sentence::char_count).sum();
        let duration = segment.end - segment.start;
        let last = pieces.len() - 1;
        let mut consumed = 0usize;
        let mut start = segment.start;

        for (i, piece) in pieces.into_iter().enumerate() {
            consumed += piece.char_count();
            let end = if i == last {
                segment.end
            } else {
                segment.start + duration * consumed as f64 / total_chars as f64
            };
            result.push(TimedSegment::new(start, end, piece.text));
            start = end;
        }
    }

    result
}

/// Map narration sentences onto recognizer timing.
///
/// Sentence `i` takes the range of sub-segment `i`. Sentences left over when
/// the recognizer found fewer sub-segments are dropped; sub-segments left
/// over keep their own recognized text. Both cases are logged as warnings.
pub fn map_segments(segments: &[TimedSegment], sentences: &[Sentence]) -> Vec<Cue> {
    let sub_segments = resegment(segments);
    let paired = sub_segments.len().min(sentences.len());

    let mut cues: Vec<Cue> = sub_segments
        .iter()
        .zip(sentences)
        .enumerate()
        .map(|(i, (timing, sentence))| {
            Cue::new(i + 1, timing.start, timing.end, sentence.text.clone())
        })
        .collect();

    if sentences.len() > sub_segments.len() {
        let dropped = &sentences[paired..];
        warn!(
            "ASR produced {} segments for {} sentences; dropping {} narration sentences starting with {:?}",
            sub_segments.len(),
            sentences.len(),
            dropped.len(),
            dropped[0].text
        );
    } else if sub_segments.len() > sentences.len() {
        let extra = &sub_segments[paired..];
        warn!(
            "ASR produced {} segments for {} sentences; keeping recognized text for {} trailing segments",
            sub_segments.len(),
            sentences.len(),
            extra.len()
        );
        cues.extend(
            extra
                .iter()
                .enumerate()
                .map(|(i, seg)| Cue::new(paired + i + 1, seg.start, seg.end, seg.text.clone())),
        );
    }

    debug!("Mapped {} cues from ASR timing", cues.len());
    cues
}
