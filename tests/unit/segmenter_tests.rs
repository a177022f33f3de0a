/*!
 * Tests for sentence segmentation and pause accounting
 */

use scriptcue::segmenter::{
    effective_char_count, pause_time, segment, segment_pages, trailing_pause, PunctuationClass,
};

/// Concatenated sentences reproduce the source apart from whitespace
#[test]
fn test_segment_withMixedText_shouldReconstructSource() {
    let text = "第一句話。第二句話！Third one? 最後沒有標點";
    let joined: String = segment(text).iter().map(|s| s.text.as_str()).collect();

    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(strip(&joined), strip(text));
}

#[test]
fn test_segment_withTrailingTextWithoutPunctuation_shouldKeepFinalSentence() {
    let sentences = segment("大家好。最後一句");
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[1].text, "最後一句");
}

#[test]
fn test_segment_withClosingQuote_shouldAttachQuoteToSentence() {
    let sentences = segment("他說：「好。」然後走了。");
    assert_eq!(sentences[0].text, "他說：「好。」");
    assert_eq!(sentences[1].text, "然後走了。");
}

#[test]
fn test_segment_withAnyInput_shouldNeverEmitEmptySentences() {
    for text in ["", "。", "！？。", " 。 好 ", "a. b. c."] {
        assert!(segment(text).iter().all(|s| !s.text.trim().is_empty()), "input {:?}", text);
    }
}

#[test]
fn test_segmentPages_withSentenceSpanningPages_shouldAttributeFirstPage() {
    let pages = ["第一頁結束。這句話跨越", "兩頁。第二頁"];
    let sentences = segment_pages(&pages);

    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0].page_index, 1);
    assert_eq!(sentences[1].text, "這句話跨越兩頁。");
    assert_eq!(sentences[1].page_index, 1);
    assert_eq!(sentences[2].page_index, 2);
}

#[test]
fn test_segmentPages_withBlankPage_shouldSkipIt() {
    let pages = ["", "  ", "只有這一句。"];
    let sentences = segment_pages(&pages);
    assert_eq!(sentences.len(), 1);
    assert_eq!(sentences[0].page_index, 3);
}

#[test]
fn test_effectiveCharCount_shouldIgnorePunctuationAndSpaces() {
    assert_eq!(effective_char_count("大家好，歡迎！"), 5);
    assert_eq!(effective_char_count("Hi, AI 2024."), 8);
    assert_eq!(effective_char_count("。，！"), 0);
}

#[test]
fn test_pauseTime_shouldSumEveryMark() {
    let pause = pause_time("你好，今天；好嗎？");
    assert!((pause - (0.2 + 0.3 + 0.5)).abs() < 1e-9);
}

#[test]
fn test_pauseTime_withDecimalPoint_shouldNotCountIt() {
    assert!((pause_time("版本 3.14 發布。") - 0.5).abs() < 1e-9);
}

#[test]
fn test_trailingPause_shouldLookPastClosingMarks() {
    assert_eq!(trailing_pause("好。」"), Some(0.5));
    assert_eq!(trailing_pause("然後，"), Some(0.2));
    assert_eq!(trailing_pause("沒有標點"), None);
}

#[test]
fn test_punctuationClass_shouldOrderByStrength() {
    assert!(PunctuationClass::Strong > PunctuationClass::Medium);
    assert!(PunctuationClass::Medium > PunctuationClass::Weak);
    assert_eq!(PunctuationClass::of('、'), Some(PunctuationClass::Weak));
    assert_eq!(PunctuationClass::of('字'), None);
}
