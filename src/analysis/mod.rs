//! Pronunciation analysis engine
//!
//! Deterministic scoring pipeline: given a reference sentence, a recognized
//! transcript and timing evidence (an amplitude waveform or per-word
//! timestamp segments), produce one prioritized issue label with supporting
//! metrics. Everything here is synchronous, stateless and side-effect free;
//! the only inputs besides the request data are the [`engine::Tuning`]
//! thresholds.

pub mod accuracy;
pub mod engine;
pub mod pace;
pub mod segments;
pub mod text;
pub mod waveform;

pub use accuracy::{wer, AccuracyPolicy};
pub use engine::{
    analyze_segments, analyze_waveform, resolve_issue, Issue, SegmentAnalysis, Tuning,
    WaveformAnalysis,
};
pub use pace::SpeedLabel;
pub use segments::{Segment, SegmentMetrics, WordSpan};
pub use waveform::{SilenceEstimator, SilenceMode};
