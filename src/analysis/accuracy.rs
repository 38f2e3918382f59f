//! Word error rate and accuracy policies
//!
//! Token-level Levenshtein distance over normalized text, plus the two
//! accuracy rules the coaching paths use: strict string equality for the
//! waveform path and a WER ceiling for the segment path.

use serde::{Deserialize, Serialize};

use super::text::{normalize, tokenize};

/// Word-level Levenshtein edit distance (insert/delete/substitute, cost 1)
pub fn levenshtein_words(reference: &[String], hypothesis: &[String]) -> usize {
    let r = reference.len();
    let h = hypothesis.len();
    if r == 0 {
        return h;
    }
    if h == 0 {
        return r;
    }

    // Two-row DP keeps memory at O(h)
    let mut prev: Vec<usize> = (0..=h).collect();
    let mut curr = vec![0usize; h + 1];

    for i in 1..=r {
        curr[0] = i;
        for j in 1..=h {
            let cost = if reference[i - 1] == hypothesis[j - 1] {
                0
            } else {
                1
            };
            let del = prev[j] + 1;
            let ins = curr[j - 1] + 1;
            let sub = prev[j - 1] + cost;
            curr[j] = del.min(ins).min(sub);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[h]
}

/// Word Error Rate between a reference and a hypothesis.
///
/// Both sides are normalized and tokenized on whitespace before the edit
/// distance runs. The distance is divided by the reference word count
/// (floored at 1, so a hypothesis against an empty reference still yields
/// a finite rate). Both empty returns 0.0.
pub fn wer(reference: &str, hypothesis: &str) -> f64 {
    let r = tokenize(reference);
    let h = tokenize(hypothesis);
    if r.is_empty() && h.is_empty() {
        return 0.0;
    }
    let distance = levenshtein_words(&r, &h);
    distance as f64 / r.len().max(1) as f64
}

/// How a coaching path decides whether the transcript is "accurate enough"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyPolicy {
    /// Normalized strings must match exactly
    ExactMatch,
    /// WER must stay at or below the given ceiling
    WerThreshold(f64),
}

impl AccuracyPolicy {
    /// Apply the policy to a reference/hypothesis pair
    pub fn check(&self, reference: &str, hypothesis: &str) -> bool {
        match *self {
            AccuracyPolicy::ExactMatch => normalize(reference) == normalize(hypothesis),
            AccuracyPolicy::WerThreshold(max_wer) => wer(reference, hypothesis) <= max_wer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wer_identical() {
        assert_eq!(wer("오늘 날씨가 좋네요", "오늘 날씨가 좋네요"), 0.0);
        assert_eq!(wer("", ""), 0.0);
    }

    #[test]
    fn test_wer_normalizes_case_and_punctuation() {
        assert_eq!(wer("Hello, world!", "hello world"), 0.0);
    }

    #[test]
    fn test_wer_substitution() {
        // one of two reference words wrong
        let w = wer("hello world", "hello earth");
        assert!((w - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_wer_insert_delete() {
        let w = wer("버스를 타고 갑니다", "버스를 갑니다");
        assert!((w - 1.0 / 3.0).abs() < 1e-9);
        let w = wer("버스를 갑니다", "버스를 타고 갑니다");
        assert!((w - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_wer_empty_reference() {
        // distance over the floored reference count, not an error
        assert_eq!(wer("", "two words"), 2.0);
        assert_eq!(wer("two words", ""), 1.0);
    }

    #[test]
    fn test_exact_match_policy() {
        let p = AccuracyPolicy::ExactMatch;
        assert!(p.check("안녕하세요!", "안녕하세요"));
        assert!(!p.check("안녕하세요", "안녕히 가세요"));
    }

    #[test]
    fn test_wer_threshold_policy() {
        let p = AccuracyPolicy::WerThreshold(0.20);
        // 1 error in 5 words is exactly at the ceiling
        assert!(p.check("a b c d e", "a b c d x"));
        // 2 errors in 5 words is over
        assert!(!p.check("a b c d e", "a b x x e"));
    }
}
