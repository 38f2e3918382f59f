//! Text normalization for transcript comparison
//!
//! Korean-friendly: anything that counts as a word character (Hangul
//! included) survives, punctuation becomes whitespace, whitespace runs
//! collapse to a single space.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Everything that is neither a word character nor whitespace
    static ref PUNCT: Regex = Regex::new(r"[^\w\s]+").expect("punctuation regex");
    /// Whitespace runs
    static ref SPACES: Regex = Regex::new(r"\s+").expect("whitespace regex");
}

/// Normalize text for comparison: lowercase, strip punctuation, collapse
/// whitespace, trim. Idempotent and never fails.
pub fn normalize(text: &str) -> String {
    let t = text.trim().to_lowercase();
    let t = PUNCT.replace_all(&t, " ");
    let t = SPACES.replace_all(&t, " ");
    t.trim().to_string()
}

/// Whitespace-delimited word count of the normalized text
pub fn count_words(text: &str) -> usize {
    let t = normalize(text);
    if t.is_empty() {
        0
    } else {
        t.split(' ').count()
    }
}

/// Normalized tokens for word-level comparison
pub fn tokenize(text: &str) -> Vec<String> {
    let t = normalize(text);
    if t.is_empty() {
        return Vec::new();
    }
    t.split(' ').map(|w| w.to_string()).collect()
}
