/*!
 * Sentence segmentation for narration text.
 *
 * Splits narration into atomic caption candidates along sentence-ending
 * punctuation and provides the character and pause accounting shared by the
 * timestamp strategies and the cue formatter.
 */

use log::debug;

/// Pause assumed after a sentence that carries no trailing punctuation
pub const DEFAULT_PAUSE_SECS: f64 = 0.1;

/// A unit of narration closed by sentence-ending punctuation or end of input
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Trimmed text including its closing punctuation
    pub text: String,

    /// 1-based page where the first character of the sentence occurs
    pub page_index: usize,
}

impl Sentence {
    /// Create a sentence attributed to the given page
    pub fn new(text: impl Into<String>, page_index: usize) -> Self {
        Self {
            text: text.into(),
            page_index,
        }
    }

    /// Number of characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of word/ideograph characters
    pub fn effective_chars(&self) -> usize {
        effective_char_count(&self.text)
    }
}

/// Strength of a punctuation mark as a break point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PunctuationClass {
    /// Commas and enumeration marks
    Weak,
    /// Semicolons and colons
    Medium,
    /// Sentence terminators
    Strong,
}

impl PunctuationClass {
    /// Classify a character, `None` when it is not a break mark
    pub fn of(c: char) -> Option<Self> {
        match c {
            '。' | '！' | '？' | '!' | '?' | '.' | '…' => Some(Self::Strong),
            '；' | '：' | ';' | ':' => Some(Self::Medium),
            '，' | '、' | ',' => Some(Self::Weak),
            _ => None,
        }
    }

    /// Split priority used by the cue formatter (whitespace is 1, nothing is 0)
    pub fn split_priority(self) -> u8 {
        match self {
            Self::Strong => 4,
            Self::Medium => 3,
            Self::Weak => 2,
        }
    }
}

/// Pause in seconds a narrator takes after the given mark
pub fn pause_for(c: char) -> Option<f64> {
    match c {
        '。' | '！' | '？' | '.' | '!' | '?' => Some(0.5),
        '…' => Some(0.4),
        '；' | ';' => Some(0.3),
        '：' | ':' => Some(0.25),
        '，' | ',' => Some(0.2),
        '、' => Some(0.15),
        _ => None,
    }
}

/// Word or ideograph character (letters, digits, CJK, underscore)
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count of characters that take speaking time
pub fn effective_char_count(text: &str) -> usize {
    text.chars().filter(|c| is_word_char(*c)).count()
}

/// Sum of pauses over every punctuation mark in the text
pub fn pause_time(text: &str) -> f64 {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            // A period inside a number or abbreviation is not a pause
            if *c == '.' && !period_ends_sentence(chars.get(i + 1).copied()) {
                return None;
            }
            pause_for(*c)
        })
        .sum()
}

/// Pause implied by the last punctuation mark of a sentence
pub fn trailing_pause(text: &str) -> Option<f64> {
    text.trim_end()
        .trim_end_matches(is_closing_mark)
        .chars()
        .last()
        .and_then(pause_for)
}

/// Closing quotes and brackets that belong to the sentence before them
pub fn is_closing_mark(c: char) -> bool {
    matches!(
        c,
        '」' | '』' | '"' | '”' | '’' | '\'' | '）' | ')' | '》' | '】' | ']'
    )
}

fn period_ends_sentence(next: Option<char>) -> bool {
    match next {
        None => true,
        Some(n) => n.is_whitespace() || is_closing_mark(n),
    }
}

/// Whether `c` closes a sentence given the character that follows it
pub fn is_sentence_terminator(c: char, next: Option<char>) -> bool {
    match c {
        '。' | '！' | '？' | '；' | '…' | '!' | '?' | ';' => true,
        '.' => period_ends_sentence(next),
        _ => false,
    }
}

/// CJK ideographs, kana, hangul and full-width forms
pub fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x2E80..=0x9FFF | 0xAC00..=0xD7AF | 0xF900..=0xFAFF | 0xFE30..=0xFE4F | 0xFF00..=0xFFEF | 0x20000..=0x2FA1F
    )
}

/// Trim and collapse internal whitespace; runs next to CJK text are removed
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let prev_is_cjk = out.chars().last().map(is_cjk).unwrap_or(true);
            if !prev_is_cjk && !is_cjk(c) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// Split a block of narration text into sentences
pub fn segment(text: &str) -> Vec<Sentence> {
    let chars: Vec<(char, usize)> = text.chars().map(|c| (c, 1)).collect();
    segment_chars(&chars)
}

/// Split ordered narration pages into sentences.
///
/// Pages are joined with a line separator, so a page boundary only ends a
/// sentence when the page itself ends with terminal punctuation.
pub fn segment_pages<S: AsRef<str>>(pages: &[S]) -> Vec<Sentence> {
    let mut chars: Vec<(char, usize)> = Vec::new();
    for (i, page) in pages.iter().enumerate() {
        let page_index = i + 1;
        if i > 0 {
            chars.push(('\n', page_index));
        }
        chars.extend(page.as_ref().chars().map(|c| (c, page_index)));
    }

    let sentences = segment_chars(&chars);
    debug!(
        "Segmented {} pages into {} sentences",
        pages.len(),
        sentences.len()
    );
    sentences
}

fn segment_chars(chars: &[(char, usize)]) -> Vec<Sentence> {
    let mut builder = SentenceBuilder::default();
    let mut i = 0;

    while i < chars.len() {
        let (c, page) = chars[i];
        builder.push(c, page);
        i += 1;

        let next = chars.get(i).map(|(n, _)| *n);
        if !is_sentence_terminator(c, next) {
            continue;
        }

        // Keep runs like "？！" or "……" and closing quotes with this sentence
        while i < chars.len() {
            let (n, n_page) = chars[i];
            let after = chars.get(i + 1).map(|(a, _)| *a);
            if is_sentence_terminator(n, after) || is_closing_mark(n) {
                builder.push(n, n_page);
                i += 1;
            } else {
                break;
            }
        }
        builder.close();
    }

    builder.finish()
}

#[derive(Default)]
struct SentenceBuilder {
    sentences: Vec<Sentence>,
    buffer: String,
    first_page: Option<usize>,
    // Punctuation-only text seen before any sentence exists
    orphan_prefix: String,
}

impl SentenceBuilder {
    fn push(&mut self, c: char, page: usize) {
        if self.first_page.is_none() && !c.is_whitespace() {
            self.first_page = Some(page);
        }
        self.buffer.push(c);
    }

    fn close(&mut self) {
        let text = normalize_whitespace(&self.buffer);
        let page = self.first_page.take().unwrap_or(1);
        self.buffer.clear();

        if text.is_empty() {
            return;
        }

        if effective_char_count(&text) == 0 {
            match self.sentences.last_mut() {
                Some(last) => last.text.push_str(&text),
                None => self.orphan_prefix.push_str(&text),
            }
            return;
        }

        let text = if self.orphan_prefix.is_empty() {
            text
        } else {
            let mut prefixed = std::mem::take(&mut self.orphan_prefix);
            prefixed.push_str(&text);
            prefixed
        };

        self.sentences.push(Sentence::new(text, page));
    }

    fn finish(mut self) -> Vec<Sentence> {
        self.close();
        if !self.orphan_prefix.is_empty() {
            // Input made of punctuation only
            self.sentences.push(Sentence::new(self.orphan_prefix, 1));
        }
        self.sentences
    }
}
