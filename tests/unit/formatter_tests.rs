/*!
 * Tests for cue length control
 */

use scriptcue::app_config::{LengthMode, SubtitleConfig};
use scriptcue::formatter::{wrap_lines, CueFormatter, LengthProfile};
use scriptcue::Cue;

fn formatter(chars_per_line: usize, max_lines: usize) -> CueFormatter {
    CueFormatter::new(LengthProfile::new(chars_per_line, max_lines, 1.5), 5)
}

/// A 40 character cue with a 20 character limit becomes two pieces
#[test]
fn test_splitIfNeeded_withFortyCharsAndLimitTwenty_shouldSplitInTwo() {
    let cue = Cue::new(1, 10.0, 18.0, "字".repeat(40));
    let pieces = formatter(20, 1).split_if_needed(&cue, 20);

    assert_eq!(pieces.len(), 2);
    let total: f64 = pieces.iter().map(Cue::duration).sum();
    assert!((total - 8.0).abs() < 1e-9);
    assert_eq!(pieces[0].start, 10.0);
    assert_eq!(pieces[1].end, 18.0);
    assert!(pieces.iter().all(|p| p.char_count() <= 20));
}

#[test]
fn test_splitIfNeeded_withCueUnderLimit_shouldReturnItUnchanged() {
    let cue = Cue::new(3, 1.25, 2.5, "短句。");
    let pieces = formatter(20, 1).split_if_needed(&cue, 20);
    assert_eq!(pieces, vec![cue]);
}

#[test]
fn test_splitIfNeeded_withPunctuation_shouldCutAfterMark() {
    let cue = Cue::new(1, 0.0, 6.0, "今天我們要談談字幕的生成，還有它背後的時間計算方法與原理");
    let pieces = formatter(15, 1).split_if_needed(&cue, 15);

    assert_eq!(pieces[0].text, "今天我們要談談字幕的生成，");
    let total: f64 = pieces.iter().map(Cue::duration).sum();
    assert!((total - 6.0).abs() < 1e-9);
}

#[test]
fn test_splitIfNeeded_shouldShareTimeByCharacterCount() {
    let cue = Cue::new(1, 0.0, 9.0, format!("{}。{}", "甲".repeat(11), "乙".repeat(5)));
    let pieces = CueFormatter::new(LengthProfile::new(12, 1, 0.0), 1).split_if_needed(&cue, 12);

    assert_eq!(pieces.len(), 2);
    // 12 of 17 characters
    assert!((pieces[0].duration() - 9.0 * 12.0 / 17.0).abs() < 1e-9);
}

#[test]
fn test_formatAll_shouldRenumberPieces() {
    let cues = vec![
        Cue::new(1, 0.0, 4.0, "字".repeat(30)),
        Cue::new(2, 4.0, 6.0, "結束。"),
    ];
    let formatted = formatter(20, 1).format_all(&cues);

    let indices: Vec<usize> = formatted.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(formatted[2].text, "結束。");
}

#[test]
fn test_formatAll_withTwoLineProfile_shouldWrapLongCue() {
    let cues = vec![Cue::new(1, 0.0, 4.0, "字".repeat(20))];
    let formatted = formatter(12, 2).format_all(&cues);

    assert_eq!(formatted.len(), 1);
    assert_eq!(formatted[0].text.lines().count(), 2);
    assert_eq!(formatted[0].char_count(), 20);
}

#[test]
fn test_fromConfig_withSingleLineDefault_shouldAllowTwentyFiveChars() {
    let f = CueFormatter::from_config(&SubtitleConfig::default());
    assert_eq!(f.profile().max_chars_per_cue(), 25);
}

#[test]
fn test_fromConfig_withRelaxedMultiLine_shouldUsePreset() {
    let config = SubtitleConfig {
        single_line: false,
        length_mode: LengthMode::Relaxed,
        ..SubtitleConfig::default()
    };
    let f = CueFormatter::from_config(&config);
    assert_eq!(*f.profile(), LengthProfile::new(18, 2, 1.2));
}

#[test]
fn test_wrapLines_withShortText_shouldStayOnOneLine() {
    assert_eq!(wrap_lines("短句", 10, 2), "短句");
}

/// Re-splitting a wrapped Latin cue keeps its words apart
#[test]
fn test_splitIfNeeded_withWrappedLatinCue_shouldKeepWordBoundaries() {
    let cue = Cue::new(1, 0.0, 8.0, "the quick brown fox\njumps over the lazy dog again");
    let pieces = formatter(20, 1).split_if_needed(&cue, 20);

    assert!(pieces.len() >= 2);
    let rejoined: Vec<String> = pieces.iter().map(|p| p.text.clone()).collect();
    let rejoined = rejoined.join(" ");
    assert_eq!(rejoined, "the quick brown fox jumps over the lazy dog again");
    assert!(!rejoined.contains("foxjumps"));
    assert_eq!(pieces.last().map(|p| p.end), Some(8.0));
}

#[test]
fn test_wrapLines_withWrappedCjkText_shouldNotInsertSpaces() {
    let wrapped = wrap_lines("大家好\n歡迎收看本期節目", 20, 1);
    assert_eq!(wrapped, "大家好歡迎收看本期節目");
}
