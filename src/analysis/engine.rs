//! Analysis orchestration
//!
//! Wires the normalizer, accuracy policies, timing extractors and
//! speed/gap judges into the two supported analysis paths and collapses
//! their findings into a single prioritized issue.
//!
//! The two paths judge speed and gaps with deliberately different rules:
//! the waveform path only knows coarse durations, so it compares the
//! learner against the reference take, while the segment path has real
//! word timestamps and can apply absolute rate thresholds. Both sets of
//! thresholds live in [`Tuning`].

use serde::{Deserialize, Serialize};

use super::accuracy::{self, AccuracyPolicy};
use super::pace::{self, SpeedLabel};
use super::segments::{metrics_from_segments, Segment, SegmentMetrics};
use super::waveform::SilenceEstimator;

/// The one thing the learner should fix first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    Accuracy,
    SpeedFast,
    SpeedSlow,
    Gaps,
    Good,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::Accuracy => write!(f, "accuracy"),
            Issue::SpeedFast => write!(f, "speed_fast"),
            Issue::SpeedSlow => write!(f, "speed_slow"),
            Issue::Gaps => write!(f, "gaps"),
            Issue::Good => write!(f, "good"),
        }
    }
}

/// Tunable thresholds for both analysis paths.
///
/// Defaults are the production values; alternate tunings can be loaded
/// from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// WER ceiling for the segment path's accuracy check
    pub max_wer: f64,

    // Absolute speed thresholds (segment path)
    /// Words/sec over the full span at or above which speech is fast
    pub fast_wps_total: f64,
    /// Articulation words/sec at or above which speech is fast
    pub fast_wps_articulation: f64,
    /// Words/sec over the full span at or below which speech may be slow
    pub slow_wps_total: f64,
    /// Slow verdicts require at least this much actual speech
    pub slow_min_speech_ms: i64,
    /// Many words crammed under this span is always fast
    pub extreme_fast_max_total_ms: i64,
    pub extreme_fast_min_words: usize,

    // Absolute gap thresholds (segment path)
    /// Pause share of the full span at or above which gaps flag
    pub pause_ratio_threshold: f64,
    pub longest_pause_ms_threshold: i64,

    // Relative speed band (waveform path)
    pub slow_factor: f64,
    pub fast_factor: f64,

    // Relative gap rule (waveform path)
    /// User silence below this never flags
    pub min_gap_seconds: f64,
    /// User silence must exceed reference silence by this factor
    pub gap_ratio_vs_reference: f64,

    /// Waveform silence estimation parameters
    pub silence: SilenceEstimator,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_wer: 0.20,
            fast_wps_total: 1.90,
            fast_wps_articulation: 2.60,
            slow_wps_total: 1.00,
            slow_min_speech_ms: 2000,
            extreme_fast_max_total_ms: 1000,
            extreme_fast_min_words: 5,
            pause_ratio_threshold: 0.35,
            longest_pause_ms_threshold: 500,
            slow_factor: 0.75,
            fast_factor: 1.25,
            min_gap_seconds: 0.15,
            gap_ratio_vs_reference: 1.3,
            silence: SilenceEstimator::default(),
        }
    }
}

/// Pick the single issue to coach on. Accuracy outranks speed, speed
/// outranks gaps.
pub fn resolve_issue(accuracy_ok: bool, speed: SpeedLabel, gaps: bool) -> Issue {
    if !accuracy_ok {
        return Issue::Accuracy;
    }
    match speed {
        SpeedLabel::Fast => Issue::SpeedFast,
        SpeedLabel::Slow => Issue::SpeedSlow,
        SpeedLabel::Ok => {
            if gaps {
                Issue::Gaps
            } else {
                Issue::Good
            }
        }
    }
}

/// Absolute speed judgment from segment metrics, first match wins
fn speed_from_metrics(tuning: &Tuning, m: &SegmentMetrics) -> SpeedLabel {
    // many words in a very short take: fast no matter what the rates say
    if m.total_ms < tuning.extreme_fast_max_total_ms && m.n_words >= tuning.extreme_fast_min_words
    {
        return SpeedLabel::Fast;
    }

    if m.wps_total >= tuning.fast_wps_total || m.wps_art >= tuning.fast_wps_articulation {
        return SpeedLabel::Fast;
    }

    // a slow verdict needs enough actual speech to be meaningful
    if m.wps_total <= tuning.slow_wps_total && m.speech_ms >= tuning.slow_min_speech_ms {
        return SpeedLabel::Slow;
    }

    SpeedLabel::Ok
}

/// Absolute gap judgment from segment metrics
fn gaps_from_metrics(tuning: &Tuning, m: &SegmentMetrics) -> bool {
    if m.total_ms <= 0 {
        return false;
    }
    let pause_ratio = m.pause_ms as f64 / m.total_ms as f64;
    pause_ratio >= tuning.pause_ratio_threshold
        || m.longest_pause_ms >= tuning.longest_pause_ms_threshold
}

/// Relative gap judgment: the learner paused noticeably more than the
/// reference take did
fn gaps_vs_reference(tuning: &Tuning, reference_silence: f64, user_silence: f64) -> bool {
    user_silence >= tuning.min_gap_seconds
        && (reference_silence == 0.0
            || user_silence >= reference_silence * tuning.gap_ratio_vs_reference)
}

/// Result of the segment analysis path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentAnalysis {
    pub issue: Issue,
    pub accuracy_ok: bool,
    pub speed: SpeedLabel,
    pub gaps: bool,
    pub wpm_user: f64,

    // diagnostic metrics, kept for threshold tuning
    pub wer: f64,
    pub wps_total: f64,
    pub wps_art: f64,
    pub pause_ms: i64,
    pub longest_pause_ms: i64,
    pub total_ms: i64,
    pub speech_ms: i64,
    pub n_words: usize,
}

/// Result of the waveform analysis path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformAnalysis {
    pub issue: Issue,
    pub accuracy_ok: bool,
    pub speed: SpeedLabel,
    pub gaps: bool,
    pub wpm_target: f64,
    pub wpm_user: f64,
}

/// Analyze a round using per-word timestamp segments.
///
/// Accuracy is WER against `tuning.max_wer`; speed and gaps use the
/// absolute thresholds. Empty segment lists produce zero metrics and a
/// `good`/`ok` verdict rather than an error.
pub fn analyze_segments(
    tuning: &Tuning,
    target_text: &str,
    result_text: &str,
    user_segments: &[Segment],
) -> SegmentAnalysis {
    let wer_val = accuracy::wer(target_text, result_text);
    let accuracy_ok = AccuracyPolicy::WerThreshold(tuning.max_wer).check(target_text, result_text);

    let m = metrics_from_segments(user_segments);
    let speed = speed_from_metrics(tuning, &m);
    let gaps = gaps_from_metrics(tuning, &m);

    SegmentAnalysis {
        issue: resolve_issue(accuracy_ok, speed, gaps),
        accuracy_ok,
        speed,
        gaps,
        wpm_user: round1(m.wps_total * 60.0),
        wer: round3(wer_val),
        wps_total: m.wps_total,
        wps_art: m.wps_art,
        pause_ms: m.pause_ms,
        longest_pause_ms: m.longest_pause_ms,
        total_ms: m.total_ms,
        speech_ms: m.speech_ms,
        n_words: m.n_words,
    }
}

/// Analyze a round using durations and amplitude graphs.
///
/// Accuracy is exact match after normalization; speed compares the
/// learner's WPM against the reference take, gaps compare estimated
/// silence. Empty graphs degrade to zero silence on both sides.
#[allow(clippy::too_many_arguments)]
pub fn analyze_waveform(
    tuning: &Tuning,
    target_text: &str,
    result_text: &str,
    target_duration_sec: f64,
    user_duration_sec: f64,
    ref_graph: &[u32],
    usr_graph: &[u32],
) -> WaveformAnalysis {
    let accuracy_ok = AccuracyPolicy::ExactMatch.check(target_text, result_text);

    let (wpm_target, wpm_user) = pace::wpm_pair(
        target_text,
        result_text,
        target_duration_sec,
        user_duration_sec,
    );
    let speed = pace::judge_relative(wpm_user, wpm_target, tuning.slow_factor, tuning.fast_factor);

    let reference_silence = tuning.silence.estimate_silence_seconds(ref_graph);
    let user_silence = tuning.silence.estimate_silence_seconds(usr_graph);
    let gaps = gaps_vs_reference(tuning, reference_silence, user_silence);

    WaveformAnalysis {
        issue: resolve_issue(accuracy_ok, speed, gaps),
        accuracy_ok,
        speed,
        gaps,
        wpm_target,
        wpm_user,
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::segments::WordSpan;

    fn seg(start: i64, end: i64, words: Vec<WordSpan>) -> Segment {
        Segment {
            start_ms: start,
            end_ms: end,
            words,
        }
    }

    /// Evenly spread `n` back-to-back words over `span_ms`
    fn packed_words(n: usize, span_ms: i64) -> Vec<WordSpan> {
        let step = span_ms / n as i64;
        (0..n as i64)
            .map(|i| WordSpan::new(i * step, (i + 1) * step, format!("w{i}")))
            .collect()
    }

    #[test]
    fn test_issue_priority() {
        assert_eq!(
            resolve_issue(false, SpeedLabel::Fast, true),
            Issue::Accuracy
        );
        assert_eq!(
            resolve_issue(true, SpeedLabel::Fast, true),
            Issue::SpeedFast
        );
        assert_eq!(
            resolve_issue(true, SpeedLabel::Slow, true),
            Issue::SpeedSlow
        );
        assert_eq!(resolve_issue(true, SpeedLabel::Ok, true), Issue::Gaps);
        assert_eq!(resolve_issue(true, SpeedLabel::Ok, false), Issue::Good);
    }

    #[test]
    fn test_extreme_fast_guard() {
        // 5 back-to-back words inside 800 ms: fast regardless of rates
        let tuning = Tuning::default();
        let a = analyze_segments(
            &tuning,
            "하나 둘 셋 넷 다섯",
            "하나 둘 셋 넷 다섯",
            &[seg(0, 800, packed_words(5, 800))],
        );
        assert_eq!(a.speed, SpeedLabel::Fast);
        assert_eq!(a.issue, Issue::SpeedFast);
    }

    #[test]
    fn test_slow_needs_enough_speech() {
        // 0.5 wps but only 500 ms of actual speech: not judged slow
        let tuning = Tuning::default();
        let a = analyze_segments(
            &tuning,
            "하나",
            "하나",
            &[seg(0, 2000, vec![WordSpan::new(0, 500, "하나")])],
        );
        assert_eq!(a.wps_total, 0.5);
        assert_eq!(a.speed, SpeedLabel::Ok);
    }

    #[test]
    fn test_slow_with_enough_speech() {
        // 3 words over 6 s with 3 s spoken: wps_total 0.5, speech 3000 ms
        let tuning = Tuning::default();
        let a = analyze_segments(
            &tuning,
            "하나 둘 셋",
            "하나 둘 셋",
            &[seg(
                0,
                6000,
                vec![
                    WordSpan::new(0, 1000, "하나"),
                    WordSpan::new(2500, 3500, "둘"),
                    WordSpan::new(5000, 6000, "셋"),
                ],
            )],
        );
        assert_eq!(a.speed, SpeedLabel::Slow);
        assert_eq!(a.issue, Issue::SpeedSlow);
    }

    #[test]
    fn test_gap_ratio_flags() {
        // 400 ms of pause in a 1000 ms span crosses the 0.35 ratio
        let tuning = Tuning::default();
        let m = metrics_from_segments(&[seg(
            0,
            1000,
            vec![WordSpan::new(0, 300, "a"), WordSpan::new(700, 1000, "b")],
        )]);
        assert_eq!(m.pause_ms, 400);
        assert!(gaps_from_metrics(&tuning, &m));
    }

    #[test]
    fn test_longest_pause_flags() {
        let tuning = Tuning::default();
        let m = metrics_from_segments(&[seg(
            0,
            3000,
            vec![WordSpan::new(0, 1200, "a"), WordSpan::new(1800, 3000, "b")],
        )]);
        // ratio 600/3000 = 0.2 stays under, the 600 ms single pause flags
        assert!(gaps_from_metrics(&tuning, &m));
    }

    #[test]
    fn test_empty_segments_good() {
        let tuning = Tuning::default();
        let a = analyze_segments(&tuning, "", "", &[]);
        assert_eq!(a.issue, Issue::Good);
        assert_eq!(a.total_ms, 0);
        assert_eq!(a.n_words, 0);
        assert_eq!(a.wps_total, 0.0);
        assert!(!a.gaps);
        assert_eq!(a.speed, SpeedLabel::Ok);
    }

    #[test]
    fn test_segment_accuracy_threshold() {
        let tuning = Tuning::default();
        // 1 substitution across 5 words: wer 0.2, still accurate
        let a = analyze_segments(
            &tuning,
            "a b c d e",
            "a b c d x",
            &[seg(0, 3000, packed_words(5, 3000))],
        );
        assert!(a.accuracy_ok);
        assert_eq!(a.wer, 0.2);

        // 2 substitutions: wer 0.4, accuracy wins the issue cascade
        let a = analyze_segments(
            &tuning,
            "a b c d e",
            "a b x x e",
            &[seg(0, 3000, packed_words(5, 3000))],
        );
        assert!(!a.accuracy_ok);
        assert_eq!(a.issue, Issue::Accuracy);
    }

    #[test]
    fn test_wpm_user_follows_wps_total() {
        let tuning = Tuning::default();
        let a = analyze_segments(
            &tuning,
            "하나 둘",
            "하나 둘",
            &[seg(
                0,
                1000,
                vec![WordSpan::new(0, 200, "하나"), WordSpan::new(400, 600, "둘")],
            )],
        );
        assert_eq!(a.wps_total, 2.0);
        assert_eq!(a.wpm_user, 120.0);
    }

    #[test]
    fn test_waveform_exact_match_accuracy() {
        let tuning = Tuning::default();
        let a = analyze_waveform(
            &tuning,
            "안녕하세요!",
            "안녕하세요",
            2.0,
            2.0,
            &[100; 100],
            &[100; 100],
        );
        assert!(a.accuracy_ok);

        let a = analyze_waveform(
            &tuning,
            "안녕하세요",
            "안녕히 가세요",
            2.0,
            2.0,
            &[100; 100],
            &[100; 100],
        );
        assert!(!a.accuracy_ok);
        assert_eq!(a.issue, Issue::Accuracy);
    }

    #[test]
    fn test_waveform_relative_speed() {
        let tuning = Tuning::default();
        // same 4-word text, learner takes twice as long: 50% of target wpm
        let a = analyze_waveform(
            &tuning,
            "하나 둘 셋 넷",
            "하나 둘 셋 넷",
            2.0,
            4.0,
            &[],
            &[],
        );
        assert_eq!(a.wpm_target, 120.0);
        assert_eq!(a.wpm_user, 60.0);
        assert_eq!(a.speed, SpeedLabel::Slow);
        assert_eq!(a.issue, Issue::SpeedSlow);
    }

    /// Amplitude cycles that look like continuous speech: the low samples
    /// are isolated, so no run ever reaches the silence minimum
    fn speech_pattern(cycles: usize) -> Vec<u32> {
        [10u32, 80, 90, 100].repeat(cycles)
    }

    #[test]
    fn test_waveform_gaps_relative_to_reference() {
        let tuning = Tuning::default();

        // reference is continuous speech, learner pauses 400 ms mid-take
        let ref_graph = speech_pattern(25);
        let mut usr_graph = speech_pattern(10);
        usr_graph.extend(vec![0u32; 20]);
        usr_graph.extend(speech_pattern(10));

        let a = analyze_waveform(
            &tuning,
            "하나 둘 셋 넷",
            "하나 둘 셋 넷",
            2.0,
            2.0,
            &ref_graph,
            &usr_graph,
        );
        assert!(a.gaps);
        assert_eq!(a.issue, Issue::Gaps);
    }

    #[test]
    fn test_waveform_empty_graphs() {
        let tuning = Tuning::default();
        let a = analyze_waveform(&tuning, "하나 둘", "하나 둘", 1.0, 1.0, &[], &[]);
        assert!(!a.gaps);
        assert_eq!(a.issue, Issue::Good);
    }

    #[test]
    fn test_tuning_serde_default() {
        let t: Tuning = serde_json::from_str("{}").unwrap();
        assert_eq!(t, Tuning::default());

        let t: Tuning = serde_json::from_str(r#"{"max_wer": 0.5}"#).unwrap();
        assert_eq!(t.max_wer, 0.5);
        assert_eq!(t.fast_wps_total, 1.90);
    }
}
