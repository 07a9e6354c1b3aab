//! Text normalization and term tokenization

use crate::processing::stopwords::is_stop_word;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Normalizes raw extracted text and splits it into vectorizer terms.
pub struct TextProcessor {
    whitespace_regex: Regex,
    punct_regex: Regex,
    min_token_len: usize,
    remove_stop_words: bool,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(2, true)
    }
}

impl TextProcessor {
    pub fn new(min_token_len: usize, remove_stop_words: bool) -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        let punct_regex = Regex::new(r"[.!?]{2,}").expect("Invalid punctuation regex");

        Self {
            whitespace_regex,
            punct_regex,
            min_token_len: min_token_len.max(1),
            remove_stop_words,
        }
    }

    /// Normalize unicode punctuation, collapse whitespace and repeated sentence marks
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = Self::normalize_unicode(text);
        let collapsed = self.whitespace_regex.replace_all(&normalized, " ");
        self.punct_regex.replace_all(collapsed.trim(), ".").to_string()
    }

    /// Lowercased Unicode words, at least `min_token_len` characters, stop words removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|word| word.chars().count() >= self.min_token_len)
            .filter(|word| !(self.remove_stop_words && is_stop_word(word)))
            .collect()
    }

    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2022}' | '\u{25CF}' => ' ', // bullets
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }
}
