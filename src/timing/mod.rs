/*!
 * Timestamp strategies.
 *
 * - `speech_rate`: synthesizes timestamps from a global speech rate
 * - `asr_mapping`: takes timestamps from recognizer segments and substitutes
 *   the narration text
 *
 * Both produce cue lists that pass through `normalize_timeline` before
 * formatting.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::Cue;

pub mod asr_mapping;
pub mod speech_rate;

pub use asr_mapping::{map_segments, resegment};
pub use speech_rate::SpeechRateSynthesizer;

/// Duration given to a cue whose range collapsed while removing overlaps
const MIN_CUE_SECS: f64 = 0.01;

/// How cue timestamps are produced
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingStrategy {
    /// Recognizer timing with narration text substituted in order
    #[serde(rename = "asr_mapping")]
    AsrMapping,

    /// Timing derived from characters per second over the audio duration
    #[default]
    #[serde(rename = "speech_rate")]
    SpeechRateSynthesis,
}

impl std::fmt::Display for TimingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AsrMapping => write!(f, "asr_mapping"),
            Self::SpeechRateSynthesis => write!(f, "speech_rate"),
        }
    }
}

/// Remove overlaps and, when `close_gaps` is set, gaps between consecutive cues.
///
/// An overlap is resolved by ending the earlier cue where the later one
/// starts; if that would empty the earlier cue the later one is pushed back
/// instead. A gap is closed by extending the earlier cue. The first start and
/// the last end are never moved except to keep a range non-empty.
pub fn normalize_timeline(cues: &mut [Cue], close_gaps: bool) {
    let mut adjusted = 0usize;

    for i in 1..cues.len() {
        let (head, tail) = cues.split_at_mut(i);
        let prev = &mut head[i - 1];
        let cur = &mut tail[0];

        if cur.start < prev.end {
            if cur.start > prev.start {
                prev.end = cur.start;
            } else {
                cur.start = prev.end;
                if cur.end <= cur.start {
                    cur.end = cur.start + MIN_CUE_SECS;
                }
            }
            adjusted += 1;
        } else if close_gaps && cur.start > prev.end {
            prev.end = cur.start;
            adjusted += 1;
        }
    }

    if adjusted > 0 {
        debug!("Adjusted {} cue boundaries while normalizing timeline", adjusted);
    }
}
