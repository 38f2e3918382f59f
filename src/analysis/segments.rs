//! Word-timestamp segments and derived timing metrics
//!
//! STT engines report recognized phrases as segments of time-stamped
//! words. Clients send words either as objects or as positional
//! `[start, end, "token"]` arrays; both deserialize to the same
//! [`WordSpan`]. All times are milliseconds.

use serde::{Deserialize, Serialize};

/// One recognized word with its time span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WordSpanWire")]
pub struct WordSpan {
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    pub token: String,
}

impl WordSpan {
    pub fn new(start_ms: i64, end_ms: i64, token: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            token: token.into(),
        }
    }

    /// Word duration; spans with `end < start` count as zero
    pub fn duration_ms(&self) -> i64 {
        (self.end_ms - self.start_ms).max(0)
    }
}

/// Accepted wire shapes for a word entry
#[derive(Deserialize)]
#[serde(untagged)]
enum WordSpanWire {
    Object {
        start: i64,
        #[serde(default)]
        end: Option<i64>,
        #[serde(default)]
        token: String,
    },
    Triple(i64, i64, String),
    Pair(i64, i64),
}

impl From<WordSpanWire> for WordSpan {
    fn from(wire: WordSpanWire) -> Self {
        match wire {
            WordSpanWire::Object { start, end, token } => {
                WordSpan::new(start, end.unwrap_or(start), token)
            }
            WordSpanWire::Triple(start, end, token) => WordSpan::new(start, end, token),
            WordSpanWire::Pair(start, end) => WordSpan::new(start, end, ""),
        }
    }
}

/// One STT segment: a phrase-level span with its word timestamps.
///
/// Extra fields the recognizer attaches (text, confidence, ...) are
/// ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "start")]
    pub start_ms: i64,
    #[serde(rename = "end")]
    pub end_ms: i64,
    #[serde(default)]
    pub words: Vec<WordSpan>,
}

/// Timing metrics derived from a merged segment list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentMetrics {
    /// Full span of the utterance
    pub total_ms: i64,
    /// Sum of word durations
    pub speech_ms: i64,
    /// Sum of inter-word gaps
    pub pause_ms: i64,
    pub longest_pause_ms: i64,
    pub n_words: usize,
    /// Words per second over the full span
    pub wps_total: f64,
    /// Words per second while actually speaking (articulation rate)
    pub wps_art: f64,
}

struct MergedSpan {
    start_ms: i64,
    end_ms: i64,
    words: Vec<WordSpan>,
}

/// Collapse a segment list into one logical span: earliest start, latest
/// end, all words sorted by start time.
fn merge_segments(segments: &[Segment]) -> MergedSpan {
    if segments.is_empty() {
        return MergedSpan {
            start_ms: 0,
            end_ms: 0,
            words: Vec::new(),
        };
    }

    let start_ms = segments.iter().map(|s| s.start_ms).min().unwrap_or(0);
    let end_ms = segments.iter().map(|s| s.end_ms).max().unwrap_or(start_ms);

    let mut words: Vec<WordSpan> = segments.iter().flat_map(|s| s.words.clone()).collect();
    words.sort_by_key(|w| w.start_ms);

    MergedSpan {
        start_ms,
        end_ms,
        words,
    }
}

/// Extract timing metrics from a segment list.
///
/// An empty list degrades to all-zero metrics rather than an error; the
/// per-second rates clamp their denominators so nothing divides by zero.
pub fn metrics_from_segments(segments: &[Segment]) -> SegmentMetrics {
    let merged = merge_segments(segments);
    let total_ms = (merged.end_ms - merged.start_ms).max(0);

    let n_words = merged.words.len();
    let speech_ms: i64 = merged.words.iter().map(|w| w.duration_ms()).sum();

    let mut pause_ms = 0i64;
    let mut longest_pause_ms = 0i64;
    for pair in merged.words.windows(2) {
        let gap = (pair[1].start_ms - pair[0].end_ms).max(0);
        pause_ms += gap;
        longest_pause_ms = longest_pause_ms.max(gap);
    }

    let total_sec = (total_ms as f64 / 1000.0).max(1e-3);
    let speech_sec = (speech_ms as f64 / 1000.0).max(1e-3);

    SegmentMetrics {
        total_ms,
        speech_ms,
        pause_ms,
        longest_pause_ms,
        n_words,
        wps_total: round2(n_words as f64 / total_sec),
        wps_art: round2(n_words as f64 / speech_sec),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
